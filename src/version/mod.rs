//! Helm version strings
//!
//! Two textual forms are in play: the bare tag (`3.14.0`) used on the command
//! line, in the RECENT file and in installed file names, and the release tag
//! (`v3.14.0`) used by GitHub. [`to_release_tag`] and [`from_release_tag`]
//! convert between them.
//!
//! Two validators exist:
//!
//! - [`is_bare_version`] accepts only `MAJOR.MINOR.PATCH`. It guards the
//!   RECENT file and direct command-line selection.
//! - [`valid_version_format`] also accepts a short pre-release suffix such as
//!   `3.0.0-beta1` and is used to filter the remote release list.

use semver::Version;
use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

fn bare_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("static regex is valid"))
}

fn format_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+(-[A-Za-z]+[0-9]*)?$").expect("static regex is valid")
    })
}

/// Returns `true` for a bare `MAJOR.MINOR.PATCH` string.
///
/// # Examples
///
/// ```rust
/// use helmswitch::version::is_bare_version;
///
/// assert!(is_bare_version("3.14.0"));
/// assert!(!is_bare_version("v3.14.0"));
/// assert!(!is_bare_version("3.0.0-beta1"));
/// ```
#[must_use]
pub fn is_bare_version(version: &str) -> bool {
    bare_regex().is_match(version)
}

/// Returns `true` for `MAJOR.MINOR.PATCH` with an optional `-word[digits]` suffix.
///
/// # Examples
///
/// ```rust
/// use helmswitch::version::valid_version_format;
///
/// assert!(valid_version_format("0.1.2"));
/// assert!(valid_version_format("0.1.2-beta1"));
/// assert!(valid_version_format("0.1.2-alpha"));
/// assert!(!valid_version_format("a.1.2"));
/// assert!(!valid_version_format("0.1. 2"));
/// ```
#[must_use]
pub fn valid_version_format(version: &str) -> bool {
    format_regex().is_match(version)
}

/// `3.14.0` -> `v3.14.0`
#[must_use]
pub fn to_release_tag(version: &str) -> String {
    format!("v{version}")
}

/// `v3.14.0` -> `Some("3.14.0")`; tags without the `v` prefix yield `None`.
#[must_use]
pub fn from_release_tag(tag: &str) -> Option<&str> {
    tag.strip_prefix('v')
}

/// Orders two version strings newest first by semver precedence.
///
/// Strings that do not parse as semver sort after all parsable ones and
/// keep their relative order.
#[must_use]
pub fn newest_first(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}
