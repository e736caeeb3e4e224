//! plotfx color model
//!
//! Parses the color strings chart options carry and interpolates between
//! them for fill and stroke animations.
//!
//! # Features
//!
//! - **Solid colors**: hex (`#rgb`, `#rrggbb`, `#rrggbbaa`), `rgb()`, `rgba()`, names
//! - **Gradients**: `linear-gradient()` / `radial-gradient()` stop lists
//! - **Tweening**: channel-wise for solids, stop-wise for matching gradients
//! - **Graceful degradation**: unparseable input snaps to the end value
//!
//! # Example
//!
//! ```rust
//! let from = plotfx_color::parse("rgb(0,0,0)");
//! let to = plotfx_color::parse("#ffffff");
//! assert_eq!(plotfx_color::interpolate(&from, &to, 0.5).to_string(), "rgb(128,128,128)");
//! ```

mod error;
mod gradient;
mod parse;
mod rgba;
mod value;

pub use error::ColorError;
pub use gradient::{Gradient, GradientKind, GradientStop};
pub use rgba::Rgba;
pub use value::ColorValue;

/// Parse a color or gradient string into interpolable components
pub fn parse(input: &str) -> ColorValue {
    ColorValue::parse(input)
}

/// Interpolate between two parsed colors at `position` (0.0 to 1.0)
pub fn interpolate(from: &ColorValue, to: &ColorValue, position: f64) -> ColorValue {
    from.tween(to, position)
}
