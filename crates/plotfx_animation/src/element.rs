//! In-memory scene node
//!
//! [`SceneNode`] is a plain attribute/style bag implementing
//! [`AnimationTarget`]. Renderers can mirror it into real SVG or HTML
//! elements, and tests use it to observe what the engine writes.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::path_normalize::SlideMarkers;
use crate::target::AnimationTarget;
use crate::transform::TransformState;
use crate::value::AttrValue;

/// An SVG-like (or, with [`SceneNode::html`], HTML-like) element
#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    tag: String,
    attributes: IndexMap<String, AttrValue>,
    styles: FxHashMap<String, String>,
    transform: TransformState,
    force_animate: FxHashSet<String>,
    slide_markers: Option<SlideMarkers>,
    area: bool,
    html: bool,
    destroyed: bool,
}

impl SceneNode {
    /// Create an attribute-backed node
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create a style-backed node
    pub fn html(tag: impl Into<String>) -> Self {
        Self {
            html: true,
            ..Self::new(tag)
        }
    }

    /// Wrap in the shared handle the animator works with
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Builder: set an attribute
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attribute(name, value.into());
        self
    }

    /// Builder: set a style
    pub fn with_style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.styles.insert(name.to_string(), value.into());
        self
    }

    /// Builder: mark the node's `d` as an area path
    pub fn with_area(mut self, area: bool) -> Self {
        self.area = area;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Attribute rendered as its string form
    pub fn attr_string(&self, name: &str) -> Option<String> {
        self.attributes.get(name).map(ToString::to_string)
    }

    /// Attribute names in first-write order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Animate `name` even when its value does not change
    pub fn set_force_animate(&mut self, name: &str, force: bool) {
        if force {
            self.force_animate.insert(name.to_string());
        } else {
            self.force_animate.remove(name);
        }
    }

    pub fn set_slide_markers(&mut self, markers: Option<SlideMarkers>) {
        self.slide_markers = markers;
    }

    /// Detach the node; later writes are ignored and running tasks stop
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn number_attr(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttrValue::as_number)
    }

    fn update_transform(&mut self) {
        let transform = self.transform.to_attribute(
            self.number_attr("x"),
            self.number_attr("y"),
            self.number_attr("width").unwrap_or(0.0),
            self.number_attr("height").unwrap_or(0.0),
        );
        self.attributes
            .insert("transform".to_string(), AttrValue::Text(transform));
    }
}

impl AnimationTarget for SceneNode {
    fn attribute(&self, name: &str) -> Option<AttrValue> {
        if TransformState::is_transform_key(name) {
            return self.transform.get(name);
        }
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: AttrValue) {
        if self.destroyed {
            return;
        }
        if self.transform.set(name, &value) {
            self.update_transform();
        } else {
            self.attributes.insert(name.to_string(), value);
        }
    }

    fn supports_attributes(&self) -> bool {
        !self.html
    }

    fn computed_style(&self, name: &str) -> Option<String> {
        self.styles.get(name).cloned()
    }

    fn set_style(&mut self, name: &str, value: String) {
        if self.destroyed {
            return;
        }
        self.styles.insert(name.to_string(), value);
    }

    fn force_animate(&self, name: &str) -> bool {
        self.force_animate.contains(name)
    }

    fn slide_markers(&self) -> Option<SlideMarkers> {
        self.slide_markers.clone()
    }

    fn is_area(&self) -> bool {
        self.area
    }

    fn is_alive(&self) -> bool {
        !self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_and_transform() {
        let mut node = SceneNode::new("rect")
            .with_attr("x", 5)
            .with_attr("y", 6)
            .with_attr("rotation", 90);

        assert_eq!(node.tag(), "rect");
        assert_eq!(
            node.attr_string("transform").as_deref(),
            Some("translate(0,0) rotate(90 5 6)")
        );
        assert_eq!(node.attribute("rotation"), Some(AttrValue::Number(90.0)));

        node.set_attribute("translateX", AttrValue::from(12.5));
        assert_eq!(
            node.attr_string("transform").as_deref(),
            Some("translate(12.5,0) rotate(90 5 6)")
        );
        assert_eq!(
            node.attribute_names().collect::<Vec<_>>(),
            vec!["x", "y", "transform"]
        );
    }

    #[test]
    fn test_html_node_uses_styles() {
        let mut node = SceneNode::html("div").with_style("left", "10px");
        assert!(!node.supports_attributes());
        assert_eq!(node.computed_style("left").as_deref(), Some("10px"));

        node.set_style("left", "20px".to_string());
        assert_eq!(node.style("left"), Some("20px"));
    }

    #[test]
    fn test_destroyed_node_ignores_writes() {
        let mut node = SceneNode::new("path").with_attr("opacity", 1);
        node.destroy();
        node.set_attribute("opacity", AttrValue::from(0));

        assert!(!node.is_alive());
        assert_eq!(node.attr("opacity"), Some(&AttrValue::Number(1.0)));
    }

    #[test]
    fn test_force_animate_flags() {
        let mut node = SceneNode::new("circle");
        node.set_force_animate("r", true);
        assert!(node.force_animate("r"));
        node.set_force_animate("r", false);
        assert!(!node.force_animate("r"));
    }
}
