//! Value interpolation
//!
//! A [`Tween`] holds the start and end of one property and produces the value
//! at any eased position.

use plotfx_color::ColorValue;

use crate::path::PathData;
use crate::path_normalize::{interpolate_path, normalize, NormalizedPaths, SlideMarkers};
use crate::value::AttrValue;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f64) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool;
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Path tween
// ============================================================================

/// Start and end geometry of a `d` animation
#[derive(Clone, Debug, PartialEq)]
pub struct PathTween {
    from: PathData,
    normalized: NormalizedPaths,
    literal_end: PathData,
}

impl PathTween {
    pub fn new(from: PathData, to: PathData, markers: Option<&SlideMarkers>, is_area: bool) -> Self {
        let normalized = normalize(&from, &to, markers, is_area);
        Self {
            from,
            normalized,
            literal_end: to,
        }
    }

    pub fn normalized(&self) -> &NormalizedPaths {
        &self.normalized
    }

    /// Geometry at `position`
    ///
    /// Unaligned pairs keep the start shape and cut to the end at position 1;
    /// with no start shape the end applies at once.
    pub fn value_at(&self, position: f64) -> Option<PathData> {
        if position >= 1.0 || self.from.is_empty() {
            return Some(self.literal_end.clone());
        }
        if self.normalized.is_aligned() {
            return interpolate_path(&self.normalized.start, &self.normalized.end, position);
        }
        None
    }
}

// ============================================================================
// Tween
// ============================================================================

/// The interpolation plan for one property
#[derive(Clone, Debug, PartialEq)]
pub enum Tween {
    /// Numbers and pixel lengths; `unit` is appended for style targets
    Numeric {
        start: f64,
        end: f64,
        unit: Option<&'static str>,
    },
    /// Fill or stroke paint through the color model
    Color { start: ColorValue, end: ColorValue },
    /// Path geometry
    Path(PathTween),
    /// Values with no interpolation, applied at the end
    Discrete {
        start: Option<AttrValue>,
        end: AttrValue,
    },
}

impl Tween {
    /// The value at `position`, or `None` to leave the target untouched
    pub fn value_at(&self, position: f64) -> Option<AttrValue> {
        match self {
            Tween::Numeric { start, end, .. } => {
                if position >= 1.0 {
                    Some(AttrValue::Number(*end))
                } else {
                    Some(AttrValue::Number(start.lerp(end, position)))
                }
            }
            Tween::Color { start, end } => {
                if position >= 1.0 {
                    Some(AttrValue::Color(end.clone()))
                } else {
                    Some(AttrValue::Color(plotfx_color::interpolate(
                        start, end, position,
                    )))
                }
            }
            Tween::Path(path) => path.value_at(position).map(AttrValue::Path),
            Tween::Discrete { end, .. } => (position >= 1.0).then(|| end.clone()),
        }
    }

    /// Whether start already equals end, so no task is needed
    ///
    /// Path tweens never settle.
    pub fn is_settled(&self) -> bool {
        match self {
            Tween::Numeric { start, end, .. } => start.approx_eq(end, f64::EPSILON),
            Tween::Color { start, end } => start == end,
            Tween::Path(_) => false,
            Tween::Discrete { start, end } => start.as_ref() == Some(end),
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Tween::Numeric { unit, .. } => *unit,
            _ => None,
        }
    }
}
