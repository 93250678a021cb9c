//! Test utilities for helmswitch
//!
//! Helpers shared by unit tests and the integration suite:
//!
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`fixtures`] builds Helm-shaped `.tar.gz` archives in memory
//! - [`server`] is a minimal HTTP server standing in for GitHub and the
//!   download host
//!
//! # Example
//!
//! ```rust,no_run
//! use helmswitch::test_utils::{TestServer, helm_archive, sha256_hex};
//!
//! # async fn example() {
//! let archive = helm_archive("linux-amd64", b"fake helm");
//! let server = TestServer::start().await;
//! server.route("/helm-v3.14.0-linux-amd64.tar.gz", 200, archive.clone());
//! server.route("/helm-v3.14.0-linux-amd64.tar.gz.sha256", 200, sha256_hex(&archive));
//! # }
//! ```

pub mod fixtures;
pub mod server;

pub use fixtures::{ArchiveEntry, build_tar_gz, helm_archive, releases_json, sha256_hex};
pub use server::TestServer;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG` if it is set. With neither,
/// logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
