//! Animation error types

use thiserror::Error;

/// Errors raised while parsing animation inputs
///
/// `Animator` entry points never surface these; they log and degrade.
#[derive(Error, Debug)]
pub enum AnimationError {
    /// Path data the morphing interpolator cannot represent
    #[error("invalid path data {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    /// Malformed animation configuration
    #[error("animation config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Easing name with no registered function
    #[error("unknown easing: {0}")]
    UnknownEasing(String),
}
