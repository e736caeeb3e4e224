//! Per-property animation task
//!
//! An [`Fx`] tweens one property of one target. It is created by the
//! animator, stepped once immediately, then stepped by the scheduler on every
//! frame until it completes or is stopped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;

use crate::easing::Easing;
use crate::interpolate::Tween;
use crate::target::{SharedTarget, WeakTarget};
use crate::value::AttrValue;

/// Lifecycle of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FxState {
    /// Created, or waiting out its deferred start
    Pending,
    Running,
    /// Reached position 1; terminal
    Complete,
    /// Cancelled or orphaned; terminal
    Stopped,
}

impl FxState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FxState::Complete | FxState::Stopped)
    }
}

// ============================================================================
// Completion set
// ============================================================================

/// Properties of one `animate` call and their done flags
///
/// Shared by every task of the call. The callback fires once, when the last
/// outstanding property is done or dropped.
pub struct Completion {
    pending: RefCell<IndexMap<String, bool>>,
    callback: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Completion {
    pub fn new(
        properties: impl IntoIterator<Item = String>,
        callback: Option<Box<dyn FnOnce()>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            pending: RefCell::new(properties.into_iter().map(|p| (p, false)).collect()),
            callback: RefCell::new(callback),
        })
    }

    /// Mark `property` as finished
    pub fn mark_done(&self, property: &str) {
        if let Some(done) = self.pending.borrow_mut().get_mut(property) {
            *done = true;
        }
        self.fire_if_finished();
    }

    /// Drop `property` from the set without animating it
    pub fn forget(&self, property: &str) {
        self.pending.borrow_mut().shift_remove(property);
        self.fire_if_finished();
    }

    pub fn is_finished(&self) -> bool {
        self.pending.borrow().values().all(|done| *done)
    }

    /// Whether the callback has already run (or there never was one)
    pub fn has_fired(&self) -> bool {
        self.callback.borrow().is_none()
    }

    /// Run the callback if nothing is outstanding
    pub(crate) fn fire_if_finished(&self) {
        if !self.is_finished() {
            return;
        }
        let callback = self.callback.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.pending.borrow())
            .field("has_fired", &self.has_fired())
            .finish()
    }
}

// ============================================================================
// Step callback
// ============================================================================

/// Passed to step callbacks after each applied update
#[derive(Debug)]
pub struct StepEvent<'a> {
    pub property: &'a str,
    pub value: &'a AttrValue,
    pub position: f64,
}

/// Per-update observer
pub type StepCallback = Rc<dyn Fn(&StepEvent<'_>)>;

// ============================================================================
// Fx
// ============================================================================

/// Animation task for one (target, property) pair
pub struct Fx {
    target: WeakTarget,
    property: String,
    tween: Tween,
    start_time: Duration,
    duration: Duration,
    easing: Easing,
    position: f64,
    state: FxState,
    stopped: Rc<Cell<bool>>,
    completion: Rc<Completion>,
    on_step: Option<StepCallback>,
}

impl Fx {
    pub fn new(
        target: WeakTarget,
        property: impl Into<String>,
        tween: Tween,
        completion: Rc<Completion>,
    ) -> Self {
        Self {
            target,
            property: property.into(),
            tween,
            start_time: Duration::ZERO,
            duration: crate::options::DEFAULT_DURATION,
            easing: Easing::default(),
            position: 0.0,
            state: FxState::Pending,
            stopped: Rc::new(Cell::new(false)),
            completion,
            on_step: None,
        }
    }

    /// Builder: clock time at which progress starts
    pub fn starting_at(mut self, start_time: Duration) -> Self {
        self.start_time = start_time;
        self
    }

    /// Builder: set duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: set easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: observe every applied update
    pub fn on_step(mut self, callback: Option<StepCallback>) -> Self {
        self.on_step = callback;
        self
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn target(&self) -> &WeakTarget {
        &self.target
    }

    pub fn state(&self) -> FxState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    /// Flag the task as cancelled; it is reaped on its next step
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// Shared cancellation flag, so the scheduler can stop a task it has lent out
    pub(crate) fn stop_flag(&self) -> Rc<Cell<bool>> {
        self.stopped.clone()
    }

    /// Advance to `now`; returns whether the task is still live
    pub fn step(&mut self, now: Duration, force_end: bool) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        if self.stopped.get() {
            self.state = FxState::Stopped;
            return false;
        }

        let Some(target) = self.live_target() else {
            tracing::debug!("target of '{}' animation is gone, stopping", self.property);
            self.stopped.set(true);
            self.state = FxState::Stopped;
            return false;
        };

        if !force_end && now < self.start_time {
            return true;
        }

        let elapsed = now.saturating_sub(self.start_time);
        if force_end || elapsed >= self.duration {
            self.position = 1.0;
            if !self.update(&target) {
                // End value not written yet; retry on the next frame
                self.state = FxState::Running;
                return true;
            }
            self.state = FxState::Complete;
            self.completion.mark_done(&self.property);
            return false;
        }

        let fraction = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = self.easing.apply(fraction);
        let eased = if eased.is_nan() {
            0.0
        } else {
            eased.clamp(0.0, 1.0)
        };
        self.position = self.position.max(eased);
        self.state = FxState::Running;
        self.update(&target);
        true
    }

    fn live_target(&self) -> Option<SharedTarget> {
        let target = self.target.upgrade()?;
        let alive = target.try_borrow().map_or(true, |t| t.is_alive());
        alive.then_some(target)
    }

    /// Apply the value at the current position
    ///
    /// Returns false when the target was borrowed elsewhere and nothing was
    /// written.
    fn update(&self, target: &SharedTarget) -> bool {
        let Some(value) = self.tween.value_at(self.position) else {
            return true;
        };

        {
            let Ok(mut target) = target.try_borrow_mut() else {
                tracing::debug!("target busy, skipping '{}' update", self.property);
                return false;
            };
            if target.supports_attributes() {
                target.set_attribute(&self.property, value.clone());
            } else {
                let text = match (&value, self.tween.unit()) {
                    (AttrValue::Number(n), Some(unit)) => format!("{n}{unit}"),
                    _ => value.to_string(),
                };
                target.set_style(&self.property, text);
            }
        }

        if let Some(on_step) = &self.on_step {
            on_step(&StepEvent {
                property: &self.property,
                value: &value,
                position: self.position,
            });
        }
        true
    }
}

impl fmt::Debug for Fx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fx")
            .field("property", &self.property)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SceneNode;
    use crate::target::AnimationTarget;

    fn shared_node() -> (Rc<RefCell<SceneNode>>, WeakTarget) {
        let node = SceneNode::new("rect").with_attr("width", 0).shared();
        let shared: SharedTarget = node.clone();
        let weak = Rc::downgrade(&shared);
        (node, weak)
    }

    fn width_tween() -> Tween {
        Tween::Numeric {
            start: 0.0,
            end: 100.0,
            unit: None,
        }
    }

    #[test]
    fn test_completion_fires_once_after_all() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let completion = Completion::new(
            ["a".to_string(), "b".to_string()],
            Some(Box::new(move || counter.set(counter.get() + 1))),
        );

        completion.mark_done("a");
        assert_eq!(fired.get(), 0);
        completion.mark_done("b");
        assert_eq!(fired.get(), 1);
        completion.mark_done("b");
        completion.forget("a");
        assert_eq!(fired.get(), 1);
        assert!(completion.has_fired());
    }

    #[test]
    fn test_completion_forget_last_fires() {
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let completion = Completion::new(
            ["x".to_string()],
            Some(Box::new(move || flag.set(true))),
        );
        completion.forget("x");
        assert!(fired.get());
    }

    #[test]
    fn test_step_progress_and_final_frame() {
        let (node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion.clone())
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear);

        assert_eq!(fx.state(), FxState::Pending);
        assert!(fx.step(Duration::from_millis(25), false));
        assert_eq!(fx.state(), FxState::Running);
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(25.0)));

        assert!(!fx.step(Duration::from_millis(150), false));
        assert_eq!(fx.state(), FxState::Complete);
        assert_eq!(fx.position(), 1.0);
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(100.0)));
        assert!(completion.is_finished());

        assert!(!fx.step(Duration::from_millis(200), false));
    }

    #[test]
    fn test_final_frame_retries_busy_target() {
        let (node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion.clone())
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear);

        {
            let _reader = node.borrow();
            assert!(fx.step(Duration::from_millis(200), false));
        }
        assert_eq!(fx.state(), FxState::Running);
        assert!(!completion.is_finished());
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(0.0)));

        assert!(!fx.step(Duration::from_millis(216), false));
        assert_eq!(fx.state(), FxState::Complete);
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(100.0)));
        assert!(completion.is_finished());
    }

    #[test]
    fn test_force_end_is_idempotent() {
        let (node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion);

        assert!(!fx.step(Duration::ZERO, true));
        assert!(!fx.step(Duration::ZERO, true));
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(100.0)));
    }

    #[test]
    fn test_deferred_start_holds() {
        let (node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion)
            .starting_at(Duration::from_millis(50))
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear);

        assert!(fx.step(Duration::from_millis(10), false));
        assert_eq!(fx.state(), FxState::Pending);
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(0.0)));

        assert!(fx.step(Duration::from_millis(100), false));
        assert_eq!(fx.position(), 0.5);
    }

    #[test]
    fn test_dead_target_stops() {
        let (node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion.clone());

        node.borrow_mut().destroy();
        assert!(!fx.step(Duration::from_millis(10), false));
        assert_eq!(fx.state(), FxState::Stopped);
        assert!(!completion.is_finished());

        drop(node);
        assert!(!fx.step(Duration::from_millis(20), false));
    }

    #[test]
    fn test_stopped_task_does_not_write() {
        let (node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion)
            .with_easing(Easing::Linear);

        fx.stop();
        assert!(!fx.step(Duration::from_millis(200), false));
        assert_eq!(fx.state(), FxState::Stopped);
        assert_eq!(node.borrow().attr("width"), Some(&AttrValue::Number(0.0)));
    }

    #[test]
    fn test_position_is_monotonic_and_nan_safe() {
        let (_node, weak) = shared_node();
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion)
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::custom(|t| if t < 0.5 { t } else { f64::NAN }));

        fx.step(Duration::from_millis(40), false);
        let reached = fx.position();
        assert!((reached - 0.4).abs() < 1e-9);
        fx.step(Duration::from_millis(60), false);
        assert_eq!(fx.position(), reached);
    }

    #[test]
    fn test_style_target_gets_unit() {
        let node = SceneNode::html("div").with_style("left", "0px").shared();
        let shared: SharedTarget = node.clone();
        let completion = Completion::new(["left".to_string()], None);
        let tween = Tween::Numeric {
            start: 0.0,
            end: 20.0,
            unit: Some("px"),
        };
        let mut fx = Fx::new(Rc::downgrade(&shared), "left", tween, completion);

        fx.step(Duration::ZERO, true);
        assert_eq!(node.borrow().computed_style("left").as_deref(), Some("20px"));
    }

    #[test]
    fn test_step_callback_sees_final_frame() {
        let (_node, weak) = shared_node();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let callback: StepCallback = Rc::new(move |event: &StepEvent<'_>| {
            log.borrow_mut().push((event.property.to_string(), event.position));
        });
        let completion = Completion::new(["width".to_string()], None);
        let mut fx = Fx::new(weak, "width", width_tween(), completion)
            .with_duration(Duration::from_millis(100))
            .with_easing(Easing::Linear)
            .on_step(Some(callback));

        fx.step(Duration::from_millis(50), false);
        fx.step(Duration::from_millis(100), false);
        assert_eq!(
            *seen.borrow(),
            vec![("width".to_string(), 0.5), ("width".to_string(), 1.0)]
        );
    }
}
