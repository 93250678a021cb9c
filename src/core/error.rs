//! Error handling for helmswitch
//!
//! Library code returns [`anyhow::Result`] and attaches context to every
//! failing filesystem or network operation. Failures the user can act on are
//! raised as a typed [`HelmSwitchError`] so that the entry point can turn them
//! into an [`ErrorContext`] carrying a suggestion.
//!
//! # Error Categories
//!
//! - **Environment**: [`BinDirMissing`], [`HomeDirUnavailable`], [`NotASymlink`]
//! - **Network and integrity**: [`DownloadFailed`], [`NetworkError`], [`ChecksumMismatch`]
//! - **Release lookup**: [`VersionNotFound`], [`NoMatchingAsset`], [`UnsupportedPlatform`]
//! - **Archive**: [`UnsafeArchivePath`], [`ExtractedBinaryMissing`]
//!
//! # Example
//!
//! ```rust,no_run
//! use helmswitch::core::{HelmSwitchError, user_friendly_error};
//!
//! let err = anyhow::Error::new(HelmSwitchError::BinDirMissing {
//!     path: "/opt/bin".to_string(),
//! });
//! let ctx = user_friendly_error(err);
//! ctx.display();
//! ```
//!
//! [`BinDirMissing`]: HelmSwitchError::BinDirMissing
//! [`HomeDirUnavailable`]: HelmSwitchError::HomeDirUnavailable
//! [`NotASymlink`]: HelmSwitchError::NotASymlink
//! [`DownloadFailed`]: HelmSwitchError::DownloadFailed
//! [`NetworkError`]: HelmSwitchError::NetworkError
//! [`ChecksumMismatch`]: HelmSwitchError::ChecksumMismatch
//! [`VersionNotFound`]: HelmSwitchError::VersionNotFound
//! [`NoMatchingAsset`]: HelmSwitchError::NoMatchingAsset
//! [`UnsupportedPlatform`]: HelmSwitchError::UnsupportedPlatform
//! [`UnsafeArchivePath`]: HelmSwitchError::UnsafeArchivePath
//! [`ExtractedBinaryMissing`]: HelmSwitchError::ExtractedBinaryMissing

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Typed failures raised by the install pipeline and the CLI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HelmSwitchError {
    /// The directory that should contain the active symlink does not exist.
    ///
    /// helmswitch never creates directories outside its own version store.
    #[error("Binary path does not exist: {path}")]
    BinDirMissing {
        /// Parent directory of the configured bin path
        path: String,
    },

    /// The current user's home directory could not be resolved.
    #[error("Unable to determine the home directory of the current user")]
    HomeDirUnavailable,

    /// A version string did not have the expected `X.Y.Z` shape.
    #[error("Invalid helm version: '{version}'")]
    InvalidVersion {
        /// The rejected input
        version: String,
    },

    /// No release with tag `v{version}` was published.
    #[error("Helm version {version} was not found in the release list")]
    VersionNotFound {
        /// Bare version that was requested
        version: String,
    },

    /// The release exists but carries no asset for this host.
    #[error("Release v{version} has no asset named '{asset}'")]
    NoMatchingAsset {
        /// Bare version of the release
        version: String,
        /// Asset file name expected for this host
        asset: String,
    },

    /// The host OS or architecture has no Helm build.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform {
        /// Value of `std::env::consts::OS`
        os: String,
        /// Value of `std::env::consts::ARCH`
        arch: String,
    },

    /// The server answered a download with a non-success status.
    #[error("Download failed with HTTP {status}: {url}")]
    DownloadFailed {
        /// URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// A request could not be completed at the transport level.
    #[error("Network error during {operation}: {reason}")]
    NetworkError {
        /// What was being attempted
        operation: String,
        /// Underlying error message
        reason: String,
    },

    /// The artifact digest differs from the published digest.
    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Artifact file name
        file: String,
        /// Digest read from the sidecar
        expected: String,
        /// Digest computed locally
        actual: String,
    },

    /// The checksum sidecar contained no digest token.
    #[error("Checksum file is empty or malformed: {path}")]
    MalformedChecksumFile {
        /// Path of the sidecar
        path: String,
    },

    /// An archive entry would be written outside the extraction root.
    #[error("Refusing to extract unsafe archive path: {path}")]
    UnsafeArchivePath {
        /// Path as stored in the archive
        path: String,
    },

    /// The archive did not contain `<os>-<arch>/helm`.
    #[error("Extracted archive does not contain the helm binary at {path}")]
    ExtractedBinaryMissing {
        /// Expected location inside the staging directory
        path: String,
    },

    /// The bin path is occupied by something other than a symlink.
    #[error("Refusing to replace {path}: it exists and is not a symlink")]
    NotASymlink {
        /// Configured bin path
        path: String,
    },

    /// The interactive menu was closed without a choice.
    #[error("Version selection cancelled")]
    SelectionCancelled,

    /// There were no versions to choose from.
    #[error("No helm versions available to choose from")]
    EmptyVersionList,

    /// The configuration file could not be used.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Catch-all carrying a preformatted message.
    #[error("{message}")]
    Other {
        /// Full error message
        message: String,
    },
}

/// A [`HelmSwitchError`] decorated with optional details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: HelmSwitchError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Extra explanation
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: HelmSwitchError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colored labels.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] suitable for display.
///
/// Typed [`HelmSwitchError`]s anywhere in the chain get a tailored
/// suggestion. Common I/O failures are mapped to generic advice. Everything
/// else is reported with its full `Caused by:` chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(typed) = error.chain().find_map(|e| e.downcast_ref::<HelmSwitchError>()) {
        return create_error_context(typed.clone());
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(HelmSwitchError::Other {
                    message: format_chain(&error),
                })
                .with_suggestion(
                    "Check ownership of the bin directory, run with sudo, or pass --bin with a writable location",
                )
                .with_details("helmswitch needs write access to the directory holding the helm symlink");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(HelmSwitchError::Other {
                    message: format_chain(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if error.chain().any(|e| e.downcast_ref::<toml::de::Error>().is_some()) {
        return ErrorContext::new(HelmSwitchError::ConfigError {
            message: format_chain(&error),
        })
        .with_suggestion("Check the TOML syntax of your helmswitch config file");
    }

    ErrorContext::new(HelmSwitchError::Other {
        message: format_chain(&error),
    })
}

fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: HelmSwitchError) -> ErrorContext {
    match &error {
        HelmSwitchError::BinDirMissing { path } => {
            let suggestion = format!(
                "Create the directory first (e.g. 'sudo mkdir -p {path}') or pass --bin with an existing directory"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("helmswitch only creates its own version store, never system directories")
        }
        HelmSwitchError::HomeDirUnavailable => ErrorContext::new(error)
            .with_suggestion("Check that the HOME environment variable is set"),
        HelmSwitchError::InvalidVersion { .. } => ErrorContext::new(error)
            .with_suggestion("Supply the helm version as MAJOR.MINOR.PATCH (ex: helmswitch 3.14.0)"),
        HelmSwitchError::VersionNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run helmswitch without arguments to choose from the available versions"),
        HelmSwitchError::NoMatchingAsset { .. } | HelmSwitchError::UnsupportedPlatform { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Check https://github.com/helm/helm/releases for the platforms built for this version")
        }
        HelmSwitchError::DownloadFailed { status, .. } => {
            let suggestion = if *status == 404 {
                "The archive does not exist on the download host. Check the version number"
            } else {
                "Check your internet connection and try again"
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        HelmSwitchError::NetworkError { .. } => ErrorContext::new(error).with_suggestion(
            "Check your internet connection. Set GITHUB_TOKEN if the GitHub API rate limit was reached",
        ),
        HelmSwitchError::ChecksumMismatch { .. } | HelmSwitchError::MalformedChecksumFile { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Retry the install. If the problem persists the download may have been tampered with")
                .with_details("The active helm symlink was left unchanged")
        }
        HelmSwitchError::UnsafeArchivePath { .. } | HelmSwitchError::ExtractedBinaryMissing { .. } => {
            ErrorContext::new(error)
                .with_details("The release archive does not have the expected layout. Nothing was installed")
        }
        HelmSwitchError::NotASymlink { path } => {
            let suggestion =
                format!("Move {path} out of the way or pass --bin with a different location");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        HelmSwitchError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the helmswitch config file (see --config)"),
        HelmSwitchError::SelectionCancelled
        | HelmSwitchError::EmptyVersionList
        | HelmSwitchError::Other { .. } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = HelmSwitchError::BinDirMissing {
            path: "/opt/bin".to_string(),
        };
        assert_eq!(error.to_string(), "Binary path does not exist: /opt/bin");

        let error = HelmSwitchError::NoMatchingAsset {
            version: "3.14.0".to_string(),
            asset: "helm-v3.14.0-plan9-amd64.tar.gz".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Release v3.14.0 has no asset named 'helm-v3.14.0-plan9-amd64.tar.gz'"
        );
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(HelmSwitchError::SelectionCancelled)
            .with_suggestion("Pick a version")
            .with_details("Input closed");

        let rendered = ctx.to_string();
        assert!(rendered.contains("Version selection cancelled"));
        assert!(rendered.contains("Details: Input closed"));
        assert!(rendered.contains("Suggestion: Pick a version"));
    }

    #[test]
    fn test_user_friendly_error_finds_typed_error_in_chain() {
        let err = anyhow::Error::new(HelmSwitchError::BinDirMissing {
            path: "/nope".to_string(),
        })
        .context("Failed to install helm 3.14.0");

        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, HelmSwitchError::BinDirMissing { .. }));
        assert!(ctx.suggestion.unwrap().contains("--bin"));
    }

    #[test]
    fn test_user_friendly_error_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Err::<(), _>(io).context("Failed to create symlink").unwrap_err();

        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.unwrap().contains("sudo"));
    }

    #[test]
    fn test_user_friendly_error_includes_cause_chain() {
        let err = anyhow::anyhow!("root cause").context("outer");
        let ctx = user_friendly_error(err);
        let HelmSwitchError::Other { message } = ctx.error else {
            panic!("expected Other");
        };
        assert!(message.starts_with("outer"));
        assert!(message.contains("Caused by:"));
        assert!(message.contains("root cause"));
    }

    #[test]
    fn test_checksum_mismatch_mentions_symlink_untouched() {
        let ctx = user_friendly_error(anyhow::Error::new(HelmSwitchError::ChecksumMismatch {
            file: "helm.tar.gz".to_string(),
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        }));
        assert!(ctx.details.unwrap().contains("unchanged"));
    }
}
