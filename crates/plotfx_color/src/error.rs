//! Color parsing errors

use thiserror::Error;

/// Errors that can occur when parsing a color or gradient string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// `#rgb`, `#rrggbb` or `#rrggbbaa` with bad digits or length
    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    /// Malformed `rgb()` / `rgba()` call
    #[error("invalid color function: {0}")]
    InvalidFunction(String),

    /// Neither a known color name nor any supported notation
    #[error("unrecognized color: {0}")]
    Unrecognized(String),

    /// Gradient with a malformed header or fewer than two stops
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),
}
