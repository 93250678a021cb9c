//! In-memory fixtures: Helm release archives and GitHub release payloads.

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};

/// One entry of a fixture archive.
pub struct ArchiveEntry {
    name: String,
    data: Vec<u8>,
    mode: u32,
    link_target: Option<String>,
}

impl ArchiveEntry {
    /// A regular file. `name` is written verbatim, so unsafe paths are possible.
    pub fn file(name: &str, data: &[u8], mode: u32) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            mode,
            link_target: None,
        }
    }

    /// A symbolic link pointing at `target`.
    pub fn symlink(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            data: Vec::new(),
            mode: 0o777,
            link_target: Some(target.to_string()),
        }
    }
}

/// Builds a gzip-compressed tar from `entries`.
///
/// Names are copied into the header bytes directly instead of going through
/// `tar::Header::set_path`, which refuses `..` and absolute paths.
pub fn build_tar_gz(entries: &[ArchiveEntry]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        let mut header = tar::Header::new_gnu();
        let name = entry.name.as_bytes();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_mode(entry.mode);
        header.set_mtime(0);

        match &entry.link_target {
            Some(target) => {
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_size(0);
                header.set_link_name(target).expect("valid link name");
            }
            None => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(entry.data.len() as u64);
            }
        }

        header.set_cksum();
        builder.append(&header, entry.data.as_slice()).expect("append entry");
    }

    builder.into_inner().expect("finish tar").finish().expect("finish gzip")
}

/// A release archive shaped like the ones on get.helm.sh.
///
/// Contains `<os_arch>/` with an executable `helm`, plus `LICENSE` and
/// `README.md`.
pub fn helm_archive(os_arch: &str, binary: &[u8]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    dir.set_cksum();
    builder
        .append_data(&mut dir, format!("{os_arch}/"), std::io::empty())
        .expect("append dir");

    for (name, data, mode) in [
        ("helm", binary, 0o755),
        ("LICENSE", b"Apache License 2.0".as_slice(), 0o644),
        ("README.md", b"Helm".as_slice(), 0o644),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{os_arch}/{name}"), data)
            .expect("append file");
    }

    builder.into_inner().expect("finish tar").finish().expect("finish gzip")
}

/// Lowercase hex SHA-256 of `data`, as published in `.sha256` sidecars.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// A GitHub releases API page listing `tags`, each with the given asset names.
pub fn releases_json(releases: &[(&str, &[&str])]) -> String {
    let items: Vec<serde_json::Value> = releases
        .iter()
        .map(|(tag, assets)| {
            serde_json::json!({
                "tag_name": tag,
                "prerelease": tag.contains('-'),
                "assets": assets
                    .iter()
                    .map(|name| serde_json::json!({
                        "name": name,
                        "browser_download_url": format!("https://github.com/helm/helm/releases/download/{tag}/{name}"),
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
