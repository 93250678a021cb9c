//! Host platform detection and Helm asset naming.
//!
//! Helm release archives follow one template:
//! `helm-v<version>-<os>-<arch>.tar.gz`, unpacking to `<os>-<arch>/helm`.
//! [`Platform`] maps the host onto the `<os>` and `<arch>` tokens of that
//! template so asset lookup is an exact name comparison.

use std::fmt;

use crate::constants::BINARY_NAME;
use crate::core::HelmSwitchError;
use crate::version::to_release_tag;

/// Operating systems Helm publishes tarballs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
}

impl Os {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
        }
    }

    fn from_std(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::Darwin),
            _ => None,
        }
    }
}

/// CPU architectures in Helm's naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
    Arm,
    I386,
    Ppc64le,
    S390x,
    Riscv64,
}

impl Arch {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::Arm => "arm",
            Self::I386 => "386",
            Self::Ppc64le => "ppc64le",
            Self::S390x => "s390x",
            Self::Riscv64 => "riscv64",
        }
    }

    fn from_std(arch: &str, little_endian: bool) -> Option<Self> {
        match arch {
            "x86_64" => Some(Self::Amd64),
            "aarch64" => Some(Self::Arm64),
            "arm" => Some(Self::Arm),
            "x86" => Some(Self::I386),
            "powerpc64" if little_endian => Some(Self::Ppc64le),
            "s390x" => Some(Self::S390x),
            "riscv64" => Some(Self::Riscv64),
            _ => None,
        }
    }
}

/// An `(Os, Arch)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self {
            os,
            arch,
        }
    }

    /// Detects the running host.
    pub fn detect() -> Result<Self, HelmSwitchError> {
        Self::from_std(std::env::consts::OS, std::env::consts::ARCH, cfg!(target_endian = "little"))
    }

    /// Maps `std::env::consts` style names onto a [`Platform`].
    pub fn from_std(os: &str, arch: &str, little_endian: bool) -> Result<Self, HelmSwitchError> {
        match (Os::from_std(os), Arch::from_std(arch, little_endian)) {
            (Some(os), Some(arch)) => Ok(Self::new(os, arch)),
            _ => Err(HelmSwitchError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }),
        }
    }

    /// Archive file name for `version`, e.g. `helm-v3.14.0-linux-amd64.tar.gz`.
    #[must_use]
    pub fn asset_name(&self, version: &str) -> String {
        format!("{BINARY_NAME}-{}-{self}.tar.gz", to_release_tag(version))
    }

    /// Path of the binary inside an extracted archive, e.g. `linux-amd64/helm`.
    #[must_use]
    pub fn binary_path_in_archive(&self) -> String {
        format!("{self}/{BINARY_NAME}")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
