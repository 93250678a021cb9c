//! Core types shared by every helmswitch module.
//!
//! At the moment this is the error taxonomy: [`HelmSwitchError`] for failures
//! the user can act on and [`ErrorContext`] for rendering them with a
//! suggestion.

pub mod error;

pub use error::{ErrorContext, HelmSwitchError, user_friendly_error};
