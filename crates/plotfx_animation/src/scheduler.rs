//! Animation scheduler
//!
//! Holds every live [`Fx`] of one chart context and steps them all on each
//! host frame. Tasks register themselves through the animator; the scheduler
//! asks the [`FrameDriver`] for a frame whenever it holds live tasks and has
//! no request outstanding.
//!
//! The registry is `Rc`/`RefCell` state: the scheduler must be driven from
//! the thread that owns it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::frame::{FrameDriver, ManualFrameDriver, FALLBACK_FRAME_INTERVAL};
use crate::fx::Fx;
use crate::target::{same_target, WeakTarget};

new_key_type! {
    /// Handle to a registered animation task
    pub struct FxId;
}

/// Registry slot; the task is lent out while it is being stepped
struct TaskEntry {
    fx: Option<Fx>,
    target: WeakTarget,
    property: String,
    stopped: Rc<Cell<bool>>,
}

impl TaskEntry {
    fn matches(&self, target: &WeakTarget, property: Option<&str>) -> bool {
        same_target(&self.target, target) && property.map_or(true, |p| p == self.property)
    }
}

/// Internal state of the scheduler
struct SchedulerInner {
    tasks: SlotMap<FxId, TaskEntry>,
    /// Insertion order of `tasks`
    order: Vec<FxId>,
    frame_requested: bool,
}

/// Frame-driven registry of running animation tasks
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
    clock: Rc<dyn Clock>,
    driver: Rc<dyn FrameDriver>,
}

impl Scheduler {
    pub fn new(clock: impl Clock + 'static, driver: impl FrameDriver + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tasks: SlotMap::with_key(),
                order: Vec::new(),
                frame_requested: false,
            })),
            clock: Rc::new(clock),
            driver: Rc::new(driver),
        }
    }

    /// Scheduler on real time, driven by `driver`
    pub fn with_system_clock(driver: impl FrameDriver + 'static) -> Self {
        Self::new(SystemClock::new(), driver)
    }

    /// Scheduler on hand-advanced time, plus the clock and driver handles
    pub fn manual() -> (Self, ManualClock, ManualFrameDriver) {
        let clock = ManualClock::new();
        let driver = ManualFrameDriver::new();
        (Self::new(clock.clone(), driver.clone()), clock, driver)
    }

    /// Current time of the scheduler's clock
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Register a task; requests a frame if none is pending
    pub fn push(&self, fx: Fx) -> FxId {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let entry = TaskEntry {
                target: fx.target().clone(),
                property: fx.property().to_string(),
                stopped: fx.stop_flag(),
                fx: Some(fx),
            };
            let id = inner.tasks.insert(entry);
            inner.order.push(id);
            id
        };
        self.request_frame_if_needed();
        id
    }

    /// Flag tasks of `target` (only `property`, if given) as stopped
    ///
    /// Flagged tasks are reaped on the next frame. Returns how many live
    /// tasks were flagged.
    pub fn stop(&self, target: &WeakTarget, property: Option<&str>) -> usize {
        let inner = self.inner.borrow();
        let mut count = 0;
        for entry in inner.tasks.values() {
            if entry.matches(target, property) && !entry.stopped.get() {
                entry.stopped.set(true);
                count += 1;
            }
        }
        count
    }

    /// Step every registered task once
    ///
    /// Tasks are visited in insertion order. Tasks pushed while the frame
    /// runs are first stepped on the next frame. Returns whether any task is
    /// still registered.
    pub fn drive_one_frame(&self) -> bool {
        let now = self.clock.now();
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            inner.frame_requested = false;
            inner.order.clone()
        };

        let mut finished = 0;
        for id in snapshot {
            let lent = self
                .inner
                .borrow_mut()
                .tasks
                .get_mut(id)
                .and_then(|entry| entry.fx.take());
            let Some(mut fx) = lent else {
                continue;
            };

            // No registry borrow is held here: callbacks may push or stop
            let live = fx.step(now, false);

            let mut inner = self.inner.borrow_mut();
            if live {
                if let Some(entry) = inner.tasks.get_mut(id) {
                    entry.fx = Some(fx);
                }
            } else {
                inner.tasks.remove(id);
                finished += 1;
            }
        }

        let remaining = {
            let mut inner = self.inner.borrow_mut();
            let SchedulerInner { tasks, order, .. } = &mut *inner;
            order.retain(|id| tasks.contains_key(*id));
            order.len()
        };
        tracing::trace!(
            "animation frame at {:?}: {} finished, {} remaining",
            now,
            finished,
            remaining
        );

        self.request_frame_if_needed();
        remaining > 0
    }

    /// Drive frames on this thread every `interval` until no task remains
    ///
    /// Fallback for hosts without a frame callback. `None` uses
    /// [`FALLBACK_FRAME_INTERVAL`].
    pub fn run_until_idle(&self, interval: Option<Duration>) {
        let interval = interval.unwrap_or(FALLBACK_FRAME_INTERVAL);
        while !self.is_empty() {
            thread::sleep(interval);
            self.drive_one_frame();
        }
    }

    /// Number of registered tasks, including stopped ones not yet reaped
    pub fn len(&self) -> usize {
        self.inner.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a frame has been requested and not yet driven
    pub fn is_frame_requested(&self) -> bool {
        self.inner.borrow().frame_requested
    }

    /// Number of tasks of `target` (only `property`, if given) not flagged stopped
    pub fn live_count(&self, target: &WeakTarget, property: Option<&str>) -> usize {
        self.inner
            .borrow()
            .tasks
            .values()
            .filter(|entry| entry.matches(target, property) && !entry.stopped.get())
            .count()
    }

    fn request_frame_if_needed(&self) {
        let request = {
            let mut inner = self.inner.borrow_mut();
            if inner.frame_requested || inner.order.is_empty() {
                false
            } else {
                inner.frame_requested = true;
                true
            }
        };
        if request {
            self.driver.request_frame();
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("tasks", &inner.order.len())
            .field("frame_requested", &inner.frame_requested)
            .finish()
    }
}
