//! Download progress indicators
//!
//! A thin wrapper over `indicatif` with one consistent style. Bars are hidden
//! when progress is disabled, either through `--no-progress` or by setting
//! `HELMSWITCH_NO_PROGRESS` to any value, so output stays clean in scripts.
//!
//! # Example
//!
//! ```rust
//! use helmswitch::utils::progress::ProgressBar;
//!
//! let bar = ProgressBar::for_download(Some(1024), false);
//! bar.set_message("helm-v3.14.0-linux-amd64.tar.gz");
//! bar.inc(512);
//! bar.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;

fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A progress bar with helmswitch styling.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a byte counter for a download.
    ///
    /// With a known length a bar with transfer rate is shown; otherwise a
    /// spinner with the running byte count.
    #[must_use]
    pub fn for_download(total: Option<u64>, hidden: bool) -> Self {
        if hidden || is_progress_disabled() {
            return Self {
                inner: IndicatifBar::hidden(),
            };
        }

        let inner = match total {
            Some(len) => {
                let bar = IndicatifBar::new(len);
                if let Ok(style) = IndicatifStyle::default_bar().template(
                    "{msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
                ) {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar
            }
            None => {
                let bar = IndicatifBar::new_spinner();
                if let Ok(style) = IndicatifStyle::default_spinner().template("{spinner} {msg} {bytes}") {
                    bar.set_style(style);
                }
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };

        Self {
            inner,
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}
