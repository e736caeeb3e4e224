//! Host frame drivers
//!
//! The scheduler never loops on its own: it asks the host for a frame and the
//! host answers by calling [`Scheduler::drive_one_frame`] about one display
//! refresh later.
//!
//! [`Scheduler::drive_one_frame`]: crate::Scheduler::drive_one_frame

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Interval of the blocking fallback loop, roughly 75 frames per second
pub const FALLBACK_FRAME_INTERVAL: Duration = Duration::from_millis(13);

/// Something that can schedule a call to `drive_one_frame`
pub trait FrameDriver {
    fn request_frame(&self);
}

/// Records frame requests for a host (or test) to poll
///
/// Clones share state, so one handle can go to the scheduler and another
/// stay with the host event loop.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameDriver {
    requested: Rc<Cell<bool>>,
    count: Rc<Cell<usize>>,
}

impl ManualFrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a pending request, returning whether there was one
    pub fn take_request(&self) -> bool {
        self.requested.replace(false)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Total requests seen
    pub fn request_count(&self) -> usize {
        self.count.get()
    }
}

impl FrameDriver for ManualFrameDriver {
    fn request_frame(&self) {
        self.requested.set(true);
        self.count.set(self.count.get() + 1);
    }
}

/// Forwards requests to a closure, such as a window redraw request
pub struct FnFrameDriver {
    callback: Box<dyn Fn()>,
}

impl FnFrameDriver {
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl fmt::Debug for FnFrameDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFrameDriver").finish_non_exhaustive()
    }
}

impl FrameDriver for FnFrameDriver {
    fn request_frame(&self) {
        (self.callback)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_driver_requests() {
        let driver = ManualFrameDriver::new();
        let host = driver.clone();
        assert!(!host.take_request());

        driver.request_frame();
        assert!(host.is_requested());
        assert!(host.take_request());
        assert!(!host.take_request());
        assert_eq!(host.request_count(), 1);
    }

    #[test]
    fn test_fn_driver_calls_closure() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let driver = FnFrameDriver::new(move || counter.set(counter.get() + 1));
        driver.request_frame();
        driver.request_frame();
        assert_eq!(calls.get(), 2);
    }
}
