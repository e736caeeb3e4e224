//! Property values
//!
//! Targets store and receive [`AttrValue`]s; [`PropertyKind`] decides how a
//! property is tweened.

use std::fmt;

use plotfx_color::ColorValue;

use crate::path::PathData;

/// A property value as read from or written to a target
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    /// Free-form text: lengths such as `"12px"`, color strings, path strings
    Text(String),
    Path(PathData),
    Color(ColorValue),
}

impl AttrValue {
    /// Numeric reading of the value, with a `px` suffix stripped
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(text) => parse_length(text),
            _ => None,
        }
    }

    /// Path reading of the value, parsing path strings
    pub fn to_path(&self) -> Option<PathData> {
        match self {
            AttrValue::Path(path) => Some(path.clone()),
            AttrValue::Text(text) => match text.parse::<PathData>() {
                Ok(path) => Some(path),
                Err(err) => {
                    tracing::debug!("path value not animatable: {}", err);
                    None
                }
            },
            _ => None,
        }
    }

    /// Color reading of the value through the color model
    pub fn to_color(&self) -> ColorValue {
        match self {
            AttrValue::Color(color) => color.clone(),
            AttrValue::Text(text) => plotfx_color::parse(text),
            AttrValue::Number(n) => ColorValue::Unparsed(n.to_string()),
            AttrValue::Path(path) => ColorValue::Unparsed(path.to_string()),
        }
    }
}

/// Parse a CSS length such as `"12"`, `"12.5px"` or `" -3px "`
pub fn parse_length(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::Text(text) => f.write_str(text),
            AttrValue::Path(path) => fmt::Display::fmt(path, f),
            AttrValue::Color(color) => fmt::Display::fmt(color, f),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(f64::from(n))
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::Text(text)
    }
}

impl From<PathData> for AttrValue {
    fn from(path: PathData) -> Self {
        AttrValue::Path(path)
    }
}

impl From<ColorValue> for AttrValue {
    fn from(color: ColorValue) -> Self {
        AttrValue::Color(color)
    }
}

/// How a property is interpolated and applied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Plain number, optionally with a unit suffix on style targets
    Numeric,
    /// Fill paint, tweened through the color model
    Fill,
    /// Stroke paint, tweened through the color model
    Stroke,
    /// SVG path geometry (`d`)
    Path,
}

impl PropertyKind {
    /// Default classification by property name
    pub fn for_property(name: &str) -> Self {
        match name {
            "d" => PropertyKind::Path,
            "fill" => PropertyKind::Fill,
            "stroke" => PropertyKind::Stroke,
            _ => PropertyKind::Numeric,
        }
    }
}
