//! helmswitch - switch between Helm versions
//!
//! Helm releases are downloaded from the Helm download host, verified against
//! their published SHA-256 digests and kept side by side in a version store
//! (`~/.helm.versions` by default) as `helm_<version>`. The active version is
//! a symlink, normally the `helm` already on PATH, pointing into the store.
//!
//! # Modules
//!
//! - [`cli`] - argument parsing, dispatch and the interactive menu
//! - [`config`] - config file loading and per-run settings
//! - [`core`] - error types and user-facing error formatting
//! - [`install`] - platform detection, download, verification, extraction
//!   and the two-phase stage/commit install
//! - [`recent`] - the bounded list of recently used versions
//! - [`release`] - the GitHub releases client and asset matching
//! - [`utils`] - filesystem, path and progress helpers
//! - [`version`] - version string validation and ordering
//!
//! # Version store layout
//!
//! ```text
//! ~/.helm.versions/
//! ├── RECENT          # up to three recently used versions
//! ├── helm_3.13.3
//! └── helm_3.14.0
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod install;
pub mod recent;
pub mod release;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
