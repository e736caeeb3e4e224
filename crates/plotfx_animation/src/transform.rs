//! Transform composition
//!
//! Nodes keep translation, rotation and scale as separate animatable
//! components and fold them into one `transform` attribute on every change.

use crate::value::AttrValue;

/// Property names that write transform components
pub const TRANSFORM_KEYS: [&str; 8] = [
    "translateX",
    "translateY",
    "rotation",
    "rotationOriginX",
    "rotationOriginY",
    "scaleX",
    "scaleY",
    "inverted",
];

/// Transform components of a node
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformState {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation: f64,
    pub rotation_origin_x: Option<f64>,
    pub rotation_origin_y: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    /// Swapped axes (inverted charts)
    pub inverted: bool,
}

impl TransformState {
    pub fn is_transform_key(name: &str) -> bool {
        TRANSFORM_KEYS.contains(&name)
    }

    /// Read a component
    pub fn get(&self, name: &str) -> Option<AttrValue> {
        let value = match name {
            "translateX" => Some(self.translate_x),
            "translateY" => Some(self.translate_y),
            "rotation" => Some(self.rotation),
            "rotationOriginX" => self.rotation_origin_x,
            "rotationOriginY" => self.rotation_origin_y,
            "scaleX" => self.scale_x,
            "scaleY" => self.scale_y,
            "inverted" => Some(if self.inverted { 1.0 } else { 0.0 }),
            _ => None,
        };
        value.map(AttrValue::Number)
    }

    /// Write a component; returns false for non-transform names
    pub fn set(&mut self, name: &str, value: &AttrValue) -> bool {
        let number = value.as_number();
        match name {
            "translateX" => self.translate_x = number.unwrap_or(0.0),
            "translateY" => self.translate_y = number.unwrap_or(0.0),
            "rotation" => self.rotation = number.unwrap_or(0.0),
            "rotationOriginX" => self.rotation_origin_x = number,
            "rotationOriginY" => self.rotation_origin_y = number,
            "scaleX" => self.scale_x = number,
            "scaleY" => self.scale_y = number,
            "inverted" => {
                self.inverted = match value {
                    AttrValue::Text(text) => text == "true",
                    _ => number.is_some_and(|n| n != 0.0),
                }
            }
            _ => return false,
        }
        true
    }

    /// Compose the `transform` attribute
    ///
    /// `x`/`y` are the node's own position, the default rotation origin;
    /// `width`/`height` shift an inverted node back into place.
    pub fn to_attribute(&self, x: Option<f64>, y: Option<f64>, width: f64, height: f64) -> String {
        let mut translate_x = self.translate_x;
        let mut translate_y = self.translate_y;
        if self.inverted {
            translate_x += width;
            translate_y += height;
        }

        let mut parts = vec![format!("translate({translate_x},{translate_y})")];

        if self.inverted {
            parts.push("rotate(90) scale(-1,1)".to_string());
        } else if self.rotation != 0.0 {
            let origin_x = self.rotation_origin_x.or(x).unwrap_or(0.0);
            let origin_y = self.rotation_origin_y.or(y).unwrap_or(0.0);
            parts.push(format!("rotate({} {origin_x} {origin_y})", self.rotation));
        }

        if self.scale_x.is_some() || self.scale_y.is_some() {
            parts.push(format!(
                "scale({} {})",
                self.scale_x.unwrap_or(1.0),
                self.scale_y.unwrap_or(1.0)
            ));
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_only() {
        let mut state = TransformState::default();
        state.set("translateX", &AttrValue::from(10));
        state.set("translateY", &AttrValue::from("20px"));
        assert_eq!(state.to_attribute(None, None, 0.0, 0.0), "translate(10,20)");
    }

    #[test]
    fn test_rotation_origin_defaults_to_position() {
        let mut state = TransformState::default();
        state.set("rotation", &AttrValue::from(45));
        assert_eq!(
            state.to_attribute(Some(5.0), Some(6.0), 0.0, 0.0),
            "translate(0,0) rotate(45 5 6)"
        );

        state.set("rotationOriginX", &AttrValue::from(1));
        assert_eq!(
            state.to_attribute(Some(5.0), None, 0.0, 0.0),
            "translate(0,0) rotate(45 1 0)"
        );
    }

    #[test]
    fn test_inverted_replaces_rotation() {
        let mut state = TransformState::default();
        state.set("rotation", &AttrValue::from(30));
        state.set("inverted", &AttrValue::from("true"));
        state.set("scaleY", &AttrValue::from(2));
        assert_eq!(
            state.to_attribute(None, None, 100.0, 50.0),
            "translate(100,50) rotate(90) scale(-1,1) scale(1 2)"
        );
    }

    #[test]
    fn test_component_access() {
        let mut state = TransformState::default();
        assert!(TransformState::is_transform_key("scaleX"));
        assert!(!TransformState::is_transform_key("x"));
        assert!(!state.set("x", &AttrValue::from(1)));
        assert_eq!(state.get("scaleX"), None);
        assert_eq!(state.get("translateX"), Some(AttrValue::Number(0.0)));
    }
}
