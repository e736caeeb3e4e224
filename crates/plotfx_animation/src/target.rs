//! Animation targets
//!
//! Anything the engine animates implements [`AnimationTarget`]: SVG-like
//! elements read and write attributes, HTML-like elements go through computed
//! and inline style.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::path_normalize::SlideMarkers;
use crate::value::{AttrValue, PropertyKind};

/// A scene node whose properties can be tweened
pub trait AnimationTarget {
    /// Current attribute value
    fn attribute(&self, name: &str) -> Option<AttrValue>;

    /// Write an attribute
    fn set_attribute(&mut self, name: &str, value: AttrValue);

    /// Whether the node has attribute semantics; style-only nodes return false
    fn supports_attributes(&self) -> bool {
        true
    }

    /// Current computed style, for style-only nodes
    fn computed_style(&self, _name: &str) -> Option<String> {
        None
    }

    /// Write an inline style, for style-only nodes
    fn set_style(&mut self, _name: &str, _value: String) {}

    /// Animate `name` even when start and end are equal
    fn force_animate(&self, _name: &str) -> bool {
        false
    }

    /// How `name` is interpolated
    fn property_kind(&self, name: &str) -> PropertyKind {
        PropertyKind::for_property(name)
    }

    /// X positions before and after a data update, for sliding path morphs
    fn slide_markers(&self) -> Option<SlideMarkers> {
        None
    }

    /// Whether `d` holds an area (top contour plus baseline)
    fn is_area(&self) -> bool {
        false
    }

    /// Whether the backing element still exists
    fn is_alive(&self) -> bool {
        true
    }
}

/// Caller-owned handle to a target
pub type SharedTarget = Rc<RefCell<dyn AnimationTarget>>;

/// Task-side back reference to a target
pub type WeakTarget = Weak<RefCell<dyn AnimationTarget>>;

/// Identity of a target, independent of its concrete type
pub(crate) fn same_target(a: &WeakTarget, b: &WeakTarget) -> bool {
    Weak::ptr_eq(a, b)
}
