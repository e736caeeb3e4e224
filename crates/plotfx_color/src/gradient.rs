//! Gradient fills
//!
//! Gradients are kept as CSS-like stop lists so that two gradients of the
//! same shape can be tweened stop by stop.

use std::fmt;

use crate::rgba::Rgba;

/// Gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f64,
    /// Color at this stop
    pub color: Rgba,
}

impl GradientStop {
    pub fn new(offset: f64, color: Rgba) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Gradient geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientKind {
    /// Linear gradient; CSS angle in degrees (0deg = to top, 90deg = to right)
    Linear { angle_deg: f64 },
    /// Radial gradient from the center outward
    Radial,
}

/// A gradient fill
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    /// Color stops, sorted by offset
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Two-stop linear gradient
    pub fn linear(angle_deg: f64, from: Rgba, to: Rgba) -> Self {
        Self {
            kind: GradientKind::Linear { angle_deg },
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        }
    }

    /// Two-stop radial gradient
    pub fn radial(inner: Rgba, outer: Rgba) -> Self {
        Self {
            kind: GradientKind::Radial,
            stops: vec![GradientStop::new(0.0, inner), GradientStop::new(1.0, outer)],
        }
    }

    /// Whether `other` can be tweened against this gradient stop by stop
    pub fn is_compatible(&self, other: &Gradient) -> bool {
        let same_kind = matches!(
            (self.kind, other.kind),
            (GradientKind::Linear { .. }, GradientKind::Linear { .. })
                | (GradientKind::Radial, GradientKind::Radial)
        );
        same_kind && self.stops.len() == other.stops.len()
    }

    /// Tween every stop toward the matching stop of `to`
    ///
    /// Returns `None` when the gradients are not compatible.
    pub fn tween(&self, to: &Gradient, t: f64) -> Option<Gradient> {
        if !self.is_compatible(to) {
            return None;
        }

        let t = t.clamp(0.0, 1.0);
        let kind = match (self.kind, to.kind) {
            (GradientKind::Linear { angle_deg: a }, GradientKind::Linear { angle_deg: b }) => {
                GradientKind::Linear {
                    angle_deg: a + (b - a) * t,
                }
            }
            _ => to.kind,
        };
        let stops = self
            .stops
            .iter()
            .zip(&to.stops)
            .map(|(from, to)| GradientStop {
                offset: from.offset + (to.offset - from.offset) * t,
                color: from.color.tween(&to.color, t),
            })
            .collect();

        Some(Gradient { kind, stops })
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GradientKind::Linear { angle_deg } => write!(f, "linear-gradient({angle_deg}deg")?,
            GradientKind::Radial => write!(f, "radial-gradient(circle")?,
        }
        for stop in &self.stops {
            write!(f, ", {} {}%", stop.color, stop.offset * 100.0)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_stopwise() {
        let from = Gradient::linear(0.0, Rgba::BLACK, Rgba::BLACK);
        let to = Gradient::linear(90.0, Rgba::WHITE, Rgba::RED);
        let mid = from.tween(&to, 0.5).unwrap();

        assert_eq!(mid.kind, GradientKind::Linear { angle_deg: 45.0 });
        assert_eq!(mid.stops[0].color, Rgba::rgb(128.0, 128.0, 128.0));
        assert_eq!(mid.stops[1].color, Rgba::rgb(128.0, 0.0, 0.0));
    }

    #[test]
    fn test_incompatible_gradients_do_not_tween() {
        let linear = Gradient::linear(0.0, Rgba::BLACK, Rgba::WHITE);
        let radial = Gradient::radial(Rgba::BLACK, Rgba::WHITE);
        assert!(linear.tween(&radial, 0.5).is_none());

        let mut three = linear.clone();
        three.stops.push(GradientStop::new(1.0, Rgba::RED));
        assert!(linear.tween(&three, 0.5).is_none());
    }

    #[test]
    fn test_display() {
        let g = Gradient::linear(90.0, Rgba::BLACK, Rgba::WHITE);
        assert_eq!(
            g.to_string(),
            "linear-gradient(90deg, rgb(0,0,0) 0%, rgb(255,255,255) 100%)"
        );
    }
}
