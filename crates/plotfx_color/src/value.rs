//! Interpolable color values

use std::fmt;

use crate::gradient::Gradient;
use crate::parse;
use crate::rgba::Rgba;

/// A parsed fill or stroke value
#[derive(Clone, Debug, PartialEq)]
pub enum ColorValue {
    Solid(Rgba),
    Gradient(Gradient),
    /// The `none` paint
    None,
    /// Input the model could not parse; kept verbatim so it can still be applied
    Unparsed(String),
}

impl ColorValue {
    /// Parse a color or gradient string
    ///
    /// Never fails: unrecognized input is kept as [`ColorValue::Unparsed`].
    pub fn parse(input: &str) -> ColorValue {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return ColorValue::None;
        }

        let parsed = if parse::is_gradient(trimmed) {
            parse::parse_gradient(trimmed).map(ColorValue::Gradient)
        } else {
            parse::parse_solid(trimmed).map(ColorValue::Solid)
        };

        parsed.unwrap_or_else(|err| {
            tracing::debug!("color model: keeping unparsed color {:?}: {}", input, err);
            ColorValue::Unparsed(input.to_string())
        })
    }

    /// Interpolate toward `to` at position `t`
    ///
    /// Solid colors mix channel-wise and gradients mix stop-wise. Any other
    /// pairing (unparsed input, `none`, solid against gradient, gradients
    /// of different shape) snaps to `to`.
    pub fn tween(&self, to: &ColorValue, t: f64) -> ColorValue {
        match (self, to) {
            (ColorValue::Solid(from), ColorValue::Solid(to)) => ColorValue::Solid(from.tween(to, t)),
            (ColorValue::Gradient(from), ColorValue::Gradient(to_gradient)) => from
                .tween(to_gradient, t)
                .map(ColorValue::Gradient)
                .unwrap_or_else(|| to.clone()),
            _ => to.clone(),
        }
    }
}

impl From<Rgba> for ColorValue {
    fn from(color: Rgba) -> Self {
        ColorValue::Solid(color)
    }
}

impl From<Gradient> for ColorValue {
    fn from(gradient: Gradient) -> Self {
        ColorValue::Gradient(gradient)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Solid(color) => fmt::Display::fmt(color, f),
            ColorValue::Gradient(gradient) => fmt::Display::fmt(gradient, f),
            ColorValue::None => f.write_str("none"),
            ColorValue::Unparsed(input) => f.write_str(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dispatch() {
        assert_eq!(ColorValue::parse("none"), ColorValue::None);
        assert_eq!(ColorValue::parse("#000"), ColorValue::Solid(Rgba::BLACK));
        assert!(matches!(
            ColorValue::parse("linear-gradient(red, blue)"),
            ColorValue::Gradient(_)
        ));
        assert_eq!(
            ColorValue::parse("url(#pattern)"),
            ColorValue::Unparsed("url(#pattern)".to_string())
        );
    }

    #[test]
    fn test_unparsed_snaps_to_end() {
        let from = ColorValue::parse("url(#pattern)");
        let to = ColorValue::parse("#ffffff");
        assert_eq!(from.tween(&to, 0.1), to);

        let from = ColorValue::parse("#000");
        let to = ColorValue::parse("bogus");
        assert_eq!(from.tween(&to, 0.5).to_string(), "bogus");
    }

    #[test]
    fn test_solid_against_gradient_snaps() {
        let from = ColorValue::parse("#000");
        let to = ColorValue::parse("linear-gradient(red, blue)");
        assert_eq!(from.tween(&to, 0.3), to);
    }
}
