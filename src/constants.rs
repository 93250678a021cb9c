//! Global constants used throughout the helmswitch codebase.
//!
//! Fixed names of the on-disk layout, the upstream endpoints and the
//! numeric limits shared by several modules live here.

use std::time::Duration;

/// Name of the managed binary, both inside release archives and on PATH.
pub const BINARY_NAME: &str = "helm";

/// Prefix of installed binaries in the version store (`helm_3.14.0`).
pub const INSTALL_PREFIX: &str = "helm_";

/// Directory under the user's home that holds installed versions.
pub const VERSION_STORE_DIR: &str = ".helm.versions";

/// File inside the version store listing recently used versions.
pub const RECENT_FILE: &str = "RECENT";

/// Upper bound on entries kept in the recent-versions file.
pub const MAX_RECENT_VERSIONS: usize = 3;

/// Symlink location used when no `helm` is found on PATH.
pub const DEFAULT_BIN_PATH: &str = "/usr/local/bin/helm";

/// GitHub API endpoint listing Helm releases.
pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/helm/helm/releases";

/// Host serving the Helm release tarballs and their `.sha256` sidecars.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://get.helm.sh";

/// Suffix appended to an artifact URL to obtain its checksum sidecar.
pub const CHECKSUM_SUFFIX: &str = ".sha256";

/// Releases requested per page from the GitHub API (the API maximum).
pub const RELEASES_PER_PAGE: u32 = 100;

/// Number of release pages fetched by default.
pub const DEFAULT_RELEASE_PAGES: u32 = 2;

/// Default overall timeout for a single HTTP request (5 minutes).
///
/// Helm archives are ~15 MB; this leaves room for slow links while
/// still preventing a stalled download from hanging forever.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for establishing a connection (30 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size used when hashing artifacts.
pub const HASH_BUFFER_SIZE: usize = 8192;

/// Environment variable pointing at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "HELMSWITCH_CONFIG";

/// Environment variable disabling progress bars when set.
pub const NO_PROGRESS_ENV: &str = "HELMSWITCH_NO_PROGRESS";

/// Environment variable carrying a GitHub token for API requests.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
