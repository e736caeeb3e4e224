//! Attribute reconciler
//!
//! [`Animator`] is the entry point renderers use to move a node from its
//! current state to a new set of property values, either immediately
//! ([`Animator::attr`]) or over time ([`Animator::animate`]).
//!
//! # Example
//!
//! ```rust
//! use plotfx_animation::{AnimationOptions, Animator, Scheduler, SceneNode};
//!
//! let (scheduler, clock, driver) = Scheduler::manual();
//! let animator = Animator::new(scheduler.clone());
//! let bar = SceneNode::new("rect").with_attr("height", 0).shared();
//!
//! animator.animate(&bar, [("height", 120)], AnimationOptions::new().duration_ms(200));
//! assert!(driver.take_request());
//!
//! clock.advance(std::time::Duration::from_millis(200));
//! scheduler.drive_one_frame();
//! assert_eq!(bar.borrow().attr_string("height").as_deref(), Some("120"));
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use plotfx_color::ColorValue;

use crate::easing::{Easing, EasingRegistry};
use crate::fx::{Completion, Fx};
use crate::interpolate::{PathTween, Tween};
use crate::options::Animation;
use crate::scheduler::Scheduler;
use crate::target::{AnimationTarget, SharedTarget, WeakTarget};
use crate::value::{AttrValue, PropertyKind};

/// Starts, stops and short-circuits property animations
///
/// Cloning yields another handle sharing the scheduler, easing registry and
/// global animation switch.
#[derive(Clone)]
pub struct Animator {
    scheduler: Scheduler,
    easings: Rc<RefCell<EasingRegistry>>,
    global_animation: Rc<Cell<bool>>,
}

impl Animator {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            easings: Rc::new(RefCell::new(EasingRegistry::new())),
            global_animation: Rc::new(Cell::new(true)),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Register or replace a named easing
    pub fn register_easing(&self, name: impl Into<String>, easing: Easing) {
        self.easings.borrow_mut().register(name, easing);
    }

    /// Renderer-wide switch; when off every `animate` applies immediately
    pub fn set_global_animation(&self, enabled: bool) {
        self.global_animation.set(enabled);
    }

    pub fn global_animation(&self) -> bool {
        self.global_animation.get()
    }

    // =========================================================================
    // Animate
    // =========================================================================

    /// Animate `properties` of `target` to new values
    ///
    /// Disabled animation (per call or globally) and zero durations apply
    /// the values at once and run the completion callback before returning.
    pub fn animate<T, I, K, V>(
        &self,
        target: &Rc<RefCell<T>>,
        properties: I,
        animation: impl Into<Animation>,
    ) where
        T: AnimationTarget + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let shared: SharedTarget = target.clone();
        self.animate_shared(&shared, properties, animation);
    }

    /// [`Animator::animate`] for an already type-erased target
    pub fn animate_shared<I, K, V>(
        &self,
        target: &SharedTarget,
        properties: I,
        animation: impl Into<Animation>,
    ) where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let properties = collect_properties(properties);

        let mut options = match animation.into() {
            Animation::Enabled(options)
                if self.global_animation.get() && !options.duration.is_zero() =>
            {
                options
            }
            Animation::Enabled(options) => {
                self.apply(target, &properties);
                if let Some(on_complete) = options.on_complete {
                    on_complete();
                }
                return;
            }
            Animation::Disabled { on_complete } => {
                self.apply(target, &properties);
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
                return;
            }
        };

        let easing = options.easing.resolve(&self.easings.borrow());
        let completion = Completion::new(properties.keys().cloned(), options.on_complete.take());
        if properties.is_empty() {
            completion.fire_if_finished();
            return;
        }

        let weak: WeakTarget = Rc::downgrade(target);
        let start_time = self.scheduler.now() + options.defer;

        for (property, end) in properties {
            self.scheduler.stop(&weak, Some(property.as_str()));

            let tween = build_tween(target, &property, end);
            let forced = target
                .try_borrow()
                .map_or(false, |node| node.force_animate(&property));
            if tween.is_settled() && !forced {
                completion.forget(&property);
                continue;
            }

            let mut fx = Fx::new(weak.clone(), property, tween, completion.clone())
                .starting_at(start_time)
                .with_duration(options.duration)
                .with_easing(easing.clone())
                .on_step(options.on_step.clone());

            if fx.step(self.scheduler.now(), false) {
                self.scheduler.push(fx);
            }
        }
    }

    // =========================================================================
    // Immediate set / stop
    // =========================================================================

    /// Set `properties` immediately, stopping their running animations
    pub fn attr<T, I, K, V>(&self, target: &Rc<RefCell<T>>, properties: I)
    where
        T: AnimationTarget + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let shared: SharedTarget = target.clone();
        self.attr_shared(&shared, properties);
    }

    /// [`Animator::attr`] for an already type-erased target
    pub fn attr_shared<I, K, V>(&self, target: &SharedTarget, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let properties = collect_properties(properties);
        self.apply(target, &properties);
    }

    /// Stop running animations of `target`; all of them when `property` is `None`
    pub fn stop<T>(&self, target: &Rc<RefCell<T>>, property: Option<&str>)
    where
        T: AnimationTarget + 'static,
    {
        let shared: SharedTarget = target.clone();
        self.stop_shared(&shared, property);
    }

    /// [`Animator::stop`] for an already type-erased target
    pub fn stop_shared(&self, target: &SharedTarget, property: Option<&str>) {
        let stopped = self.scheduler.stop(&Rc::downgrade(target), property);
        if stopped > 0 {
            tracing::debug!("stopped {} animation task(s)", stopped);
        }
    }

    /// Whether `target` has a live task (for `property`, if given)
    pub fn is_animating<T>(&self, target: &Rc<RefCell<T>>, property: Option<&str>) -> bool
    where
        T: AnimationTarget + 'static,
    {
        let shared: SharedTarget = target.clone();
        self.scheduler.live_count(&Rc::downgrade(&shared), property) > 0
    }

    fn apply(&self, target: &SharedTarget, properties: &IndexMap<String, AttrValue>) {
        let weak = Rc::downgrade(target);
        for property in properties.keys() {
            self.scheduler.stop(&weak, Some(property.as_str()));
        }

        let Ok(mut node) = target.try_borrow_mut() else {
            tracing::debug!("target busy, dropping {} attribute(s)", properties.len());
            return;
        };
        let attributes = node.supports_attributes();
        for (property, value) in properties {
            if attributes {
                node.set_attribute(property, value.clone());
            } else {
                node.set_style(property, style_text(property, value));
            }
        }
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("scheduler", &self.scheduler)
            .field("global_animation", &self.global_animation.get())
            .finish_non_exhaustive()
    }
}

/// Deduplicate, last value wins, first-seen order kept
fn collect_properties<I, K, V>(properties: I) -> IndexMap<String, AttrValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<AttrValue>,
{
    properties
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// Inline style text; bare numbers get `px` except for opacity
fn style_text(property: &str, value: &AttrValue) -> String {
    match value {
        AttrValue::Number(n) if property != "opacity" => format!("{n}px"),
        _ => value.to_string(),
    }
}

/// Current value of `property` from attributes or computed style
fn current_value(node: &dyn AnimationTarget, property: &str) -> Option<AttrValue> {
    if node.supports_attributes() {
        node.attribute(property)
    } else {
        node.computed_style(property).map(AttrValue::Text)
    }
}

/// Snapshot the start of `property` and pair it with `end`
fn build_tween(target: &SharedTarget, property: &str, end: AttrValue) -> Tween {
    let Ok(guard) = target.try_borrow() else {
        tracing::debug!("target busy, '{}' will be set at the end", property);
        return Tween::Discrete { start: None, end };
    };
    let node: &dyn AnimationTarget = &*guard;
    let start = current_value(node, property);

    match node.property_kind(property) {
        PropertyKind::Path => match end.to_path() {
            Some(to) => {
                let from = start.and_then(|value| value.to_path()).unwrap_or_default();
                let markers = node.slide_markers();
                Tween::Path(PathTween::new(from, to, markers.as_ref(), node.is_area()))
            }
            None => Tween::Discrete { start, end },
        },
        PropertyKind::Fill | PropertyKind::Stroke => Tween::Color {
            start: start
                .map(|value| value.to_color())
                .unwrap_or_else(|| ColorValue::Unparsed(String::new())),
            end: end.to_color(),
        },
        PropertyKind::Numeric => {
            let Some(end_number) = end.as_number() else {
                return Tween::Discrete { start, end };
            };
            let default_start = if property == "opacity" { 1.0 } else { 0.0 };
            let unit = (!node.supports_attributes() && property != "opacity").then_some("px");
            Tween::Numeric {
                start: start
                    .and_then(|value| value.as_number())
                    .unwrap_or(default_start),
                end: end_number,
                unit,
            }
        }
    }
}
