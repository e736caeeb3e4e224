//! Solid RGBA colors
//!
//! Channels are stored in the 0-255 range chart options use, alpha in 0-1.
//! Channels are only rounded when a color is rendered or tweened, never on
//! construction.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;
use crate::parse;

/// RGBA color (sRGB channels 0-255, alpha 0-1)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255.0, 255.0, 255.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const RED: Rgba = Rgba::rgb(255.0, 0.0, 0.0);
    pub const GREEN: Rgba = Rgba::rgb(0.0, 128.0, 0.0);
    pub const BLUE: Rgba = Rgba::rgb(0.0, 0.0, 255.0);
    pub const YELLOW: Rgba = Rgba::rgb(255.0, 255.0, 0.0);
    pub const ORANGE: Rgba = Rgba::rgb(255.0, 165.0, 0.0);
    pub const PURPLE: Rgba = Rgba::rgb(128.0, 0.0, 128.0);
    pub const GRAY: Rgba = Rgba::rgb(128.0, 128.0, 128.0);
    pub const TRANSPARENT: Rgba = Rgba::rgba(255.0, 255.0, 255.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        let r = f64::from((hex >> 16) & 0xFF);
        let g = f64::from((hex >> 8) & 0xFF);
        let b = f64::from(hex & 0xFF);
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.a = alpha;
        self
    }

    /// Whether the color must be written with an alpha component
    pub fn has_alpha(&self) -> bool {
        self.a != 1.0
    }

    /// Linear interpolation between two colors
    ///
    /// `t` is clamped to 0..=1. Channels are not rounded.
    pub fn lerp(a: &Rgba, b: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// Tween toward `to`, rounding channels to whole numbers
    ///
    /// Alpha is kept fractional.
    pub fn tween(&self, to: &Rgba, t: f64) -> Rgba {
        let mixed = Rgba::lerp(self, to, t);
        Rgba {
            r: mixed.r.round(),
            g: mixed.g.round(),
            b: mixed.b.round(),
            a: mixed.a,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = (self.r.round(), self.g.round(), self.b.round());
        if self.has_alpha() {
            write!(f, "rgba({r},{g},{b},{})", self.a)
        } else {
            write!(f, "rgb({r},{g},{b})")
        }
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_solid(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_opaque_and_alpha() {
        assert_eq!(Rgba::rgb(12.0, 34.0, 56.0).to_string(), "rgb(12,34,56)");
        assert_eq!(
            Rgba::rgba(0.0, 0.0, 0.0, 0.25).to_string(),
            "rgba(0,0,0,0.25)"
        );
    }

    #[test]
    fn test_tween_rounds_channels_to_nearest() {
        let mid = Rgba::BLACK.tween(&Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::rgb(128.0, 128.0, 128.0));
        assert_eq!(mid.to_string(), "rgb(128,128,128)");
    }

    #[test]
    fn test_tween_keeps_fractional_alpha() {
        let from = Rgba::rgba(0.0, 0.0, 0.0, 0.0);
        let to = Rgba::rgba(0.0, 0.0, 0.0, 1.0);
        let quarter = from.tween(&to, 0.25);
        assert!((quarter.a - 0.25).abs() < 1e-12);
        assert_eq!(quarter.to_string(), "rgba(0,0,0,0.25)");
    }

    #[test]
    fn test_lerp_clamps_position() {
        assert_eq!(Rgba::lerp(&Rgba::BLACK, &Rgba::WHITE, 2.0), Rgba::WHITE);
        assert_eq!(Rgba::lerp(&Rgba::BLACK, &Rgba::WHITE, -1.0), Rgba::BLACK);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex(0x667eea), Rgba::rgb(102.0, 126.0, 234.0));
    }
}
