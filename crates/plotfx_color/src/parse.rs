//! Color string parsing
//!
//! Supported notations:
//!
//! - hex: `#rgb`, `#rrggbb`, `#rrggbbaa`
//! - functional: `rgb(r, g, b)`, `rgba(r, g, b, a)` with 0-255 channels
//! - a handful of named colors
//! - `linear-gradient(...)` and `radial-gradient(...)` with color stops

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag_no_case, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, map_opt, opt, recognize},
    multi::{many0_count, many1_count, separated_list1},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult,
};

use crate::error::ColorError;
use crate::gradient::{Gradient, GradientKind, GradientStop};
use crate::rgba::Rgba;

type ParseResult<'a, O> = IResult<&'a str, O, nom::error::Error<&'a str>>;

// ============================================================================
// Combinators
// ============================================================================

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: FnMut(&'a str) -> ParseResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// `name(n, n, ...)` with any number of comma separated numbers
fn color_function<'a>(name: &'static str) -> impl FnMut(&'a str) -> ParseResult<'a, Vec<f64>> {
    preceded(
        tag_no_case(name),
        delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), double),
            ws(char(')')),
        ),
    )
}

fn hex_digits(input: &str) -> ParseResult<'_, &str> {
    preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit()))(input)
}

// ============================================================================
// Solid colors
// ============================================================================

/// Parse a solid color (hex, `rgb()`, `rgba()` or a named color)
pub(crate) fn parse_solid(input: &str) -> Result<Rgba, ColorError> {
    let input = input.trim();

    if input.starts_with('#') {
        return parse_hex(input);
    }

    if let Ok((_, channels)) = all_consuming(color_function("rgba"))(input).finish() {
        return match channels.as_slice() {
            &[r, g, b, a] => Ok(Rgba::rgba(r, g, b, a)),
            _ => Err(ColorError::InvalidFunction(input.to_string())),
        };
    }

    if let Ok((_, channels)) = all_consuming(color_function("rgb"))(input).finish() {
        return match channels.as_slice() {
            &[r, g, b] => Ok(Rgba::rgb(r, g, b)),
            _ => Err(ColorError::InvalidFunction(input.to_string())),
        };
    }

    if input.to_ascii_lowercase().starts_with("rgb") {
        return Err(ColorError::InvalidFunction(input.to_string()));
    }

    parse_named(input).ok_or_else(|| ColorError::Unrecognized(input.to_string()))
}

/// Parse hex color: #RGB, #RRGGBB, or #RRGGBBAA
fn parse_hex(input: &str) -> Result<Rgba, ColorError> {
    let invalid = || ColorError::InvalidHex(input.to_string());
    let (_, hex) = all_consuming(hex_digits)(input)
        .finish()
        .map_err(|_| invalid())?;

    let channel = |digits: &str| -> Result<f64, ColorError> {
        u8::from_str_radix(digits, 16)
            .map(f64::from)
            .map_err(|_| invalid())
    };
    let packed = |digits: &str| -> Result<Rgba, ColorError> {
        u32::from_str_radix(digits, 16)
            .map(Rgba::from_hex)
            .map_err(|_| invalid())
    };

    match hex.len() {
        3 => Ok(Rgba::rgb(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => packed(hex),
        8 => Ok(packed(&hex[0..6])?.with_alpha(channel(&hex[6..8])? / 255.0)),
        _ => Err(invalid()),
    }
}

fn parse_named(name: &str) -> Option<Rgba> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Rgba::BLACK),
        "white" => Some(Rgba::WHITE),
        "red" => Some(Rgba::RED),
        "green" => Some(Rgba::GREEN),
        "blue" => Some(Rgba::BLUE),
        "yellow" => Some(Rgba::YELLOW),
        "orange" => Some(Rgba::ORANGE),
        "purple" => Some(Rgba::PURPLE),
        "gray" | "grey" => Some(Rgba::GRAY),
        "transparent" => Some(Rgba::TRANSPARENT),
        _ => None,
    }
}

// ============================================================================
// Gradients
// ============================================================================

/// Whether the input looks like a gradient function
pub(crate) fn is_gradient(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("linear-gradient(") || lower.starts_with("radial-gradient(")
}

/// Text inside a parenthesised group, nesting allowed
fn balanced(input: &str) -> ParseResult<'_, &str> {
    recognize(many0_count(alt((
        is_not("()"),
        recognize(delimited(char('('), balanced, char(')'))),
    ))))(input)
}

/// One top-level gradient argument; commas inside `rgb(...)` do not split
fn gradient_part(input: &str) -> ParseResult<'_, &str> {
    map(
        recognize(many1_count(alt((
            is_not("(),"),
            recognize(delimited(char('('), balanced, char(')'))),
        )))),
        str::trim,
    )(input)
}

/// `linear-gradient(...)` or `radial-gradient(...)`: function name and arguments
fn gradient_function(input: &str) -> ParseResult<'_, (&str, Vec<&str>)> {
    pair(
        ws(alt((
            tag_no_case("linear-gradient"),
            tag_no_case("radial-gradient"),
        ))),
        delimited(
            char('('),
            separated_list1(char(','), gradient_part),
            pair(char(')'), multispace0),
        ),
    )(input)
}

fn side(input: &str) -> ParseResult<'_, &str> {
    alt((
        tag_no_case("top"),
        tag_no_case("right"),
        tag_no_case("bottom"),
        tag_no_case("left"),
    ))(input)
}

fn side_angle((first, second): (&str, Option<&str>)) -> Option<f64> {
    let first = first.to_ascii_lowercase();
    let second = second.map(str::to_ascii_lowercase);
    let angle = match (first.as_str(), second.as_deref()) {
        ("top", None) => 0.0,
        ("right", None) => 90.0,
        ("bottom", None) => 180.0,
        ("left", None) => 270.0,
        ("top", Some("right")) | ("right", Some("top")) => 45.0,
        ("bottom", Some("right")) | ("right", Some("bottom")) => 135.0,
        ("bottom", Some("left")) | ("left", Some("bottom")) => 225.0,
        ("top", Some("left")) | ("left", Some("top")) => 315.0,
        _ => return None,
    };
    Some(angle)
}

/// Linear gradient direction in degrees: `90deg`, `0.25turn` or `to <side>`
fn gradient_direction(input: &str) -> ParseResult<'_, f64> {
    alt((
        terminated(double, preceded(multispace0, tag_no_case("deg"))),
        map(
            terminated(double, preceded(multispace0, tag_no_case("turn"))),
            |turns| turns * 360.0,
        ),
        map_opt(
            preceded(
                pair(tag_no_case("to"), multispace1),
                pair(side, opt(preceded(multispace1, side))),
            ),
            side_angle,
        ),
    ))(input)
}

/// Parse `linear-gradient(...)` or `radial-gradient(...)`
pub(crate) fn parse_gradient(input: &str) -> Result<Gradient, ColorError> {
    let invalid = || ColorError::InvalidGradient(input.to_string());
    let (_, (name, parts)) = all_consuming(gradient_function)(input)
        .finish()
        .map_err(|_| invalid())?;
    let first = parts.first().ok_or_else(invalid)?;

    let (kind, color_start) = if name.eq_ignore_ascii_case("linear-gradient") {
        // Without a direction the first argument is already a color stop
        let (angle_deg, start) = match all_consuming(gradient_direction)(*first).finish() {
            Ok((_, angle)) => (angle, 1),
            Err(_) => (180.0, 0),
        };
        (GradientKind::Linear { angle_deg }, start)
    } else {
        let shape = first.to_ascii_lowercase();
        let start = usize::from(shape.starts_with("circle") || shape.starts_with("ellipse"));
        (GradientKind::Radial, start)
    };

    let color_parts = &parts[color_start..];
    let total = color_parts.len();
    let stops = color_parts
        .iter()
        .enumerate()
        .map(|(index, part)| parse_color_stop(part, index, total))
        .collect::<Result<Vec<_>, _>>()?;

    if stops.len() < 2 {
        return Err(invalid());
    }

    Ok(Gradient { kind, stops })
}

/// Parse a single color stop (e.g. "red", "#667eea 50%", "rgba(255,0,0,0.5) 25%")
fn parse_color_stop(part: &str, index: usize, total: usize) -> Result<GradientStop, ColorError> {
    let part = part.trim();

    if let Some((color, position)) = part.rsplit_once(' ') {
        if let Some(pct) = position.strip_suffix('%') {
            if let Ok(pct) = pct.parse::<f64>() {
                return Ok(GradientStop::new(pct / 100.0, parse_solid(color)?));
            }
        }
    }

    Ok(GradientStop::new(default_position(index, total), parse_solid(part)?))
}

fn default_position(index: usize, total: usize) -> f64 {
    if total <= 1 {
        0.0
    } else {
        index as f64 / (total - 1) as f64
    }
}
