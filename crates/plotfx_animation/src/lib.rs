//! plotfx animation engine
//!
//! Tweens the properties of chart scene nodes between successive renders.
//!
//! # Features
//!
//! - **Per-property tasks**: one [`Fx`] per (target, property), restarting stops the old one
//! - **Heterogeneous values**: numbers, pixel lengths, colors, gradients and SVG paths
//! - **Path morphing**: paths of different point counts, including sliding windows and areas
//! - **Exactly-once completion**: one callback per `animate` call, after every property
//! - **Injected time and frames**: [`Clock`] and [`FrameDriver`] keep hosts and tests in control
//!
//! The engine is single-threaded: targets are `Rc<RefCell<_>>` owned by the
//! caller and tasks only hold weak references to them.

pub mod animator;
pub mod clock;
pub mod easing;
pub mod element;
pub mod error;
pub mod frame;
pub mod fx;
pub mod interpolate;
pub mod options;
pub mod path;
pub mod path_normalize;
pub mod scheduler;
pub mod target;
pub mod transform;
pub mod value;

pub use animator::Animator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::{Easing, EasingRegistry};
pub use element::SceneNode;
pub use error::AnimationError;
pub use frame::{FnFrameDriver, FrameDriver, ManualFrameDriver, FALLBACK_FRAME_INTERVAL};
pub use fx::{Completion, Fx, FxState, StepCallback, StepEvent};
pub use interpolate::{Interpolate, PathTween, Tween};
pub use options::{
    Animation, AnimationConfig, AnimationOptions, AnimationSetting, EasingSpec, DEFAULT_DURATION,
    DEFAULT_EASING,
};
pub use path::{PathData, PathSegment, SegmentKind};
pub use path_normalize::{interpolate_path, normalize, NormalizedPaths, SlideMarkers};
pub use scheduler::{FxId, Scheduler};
pub use target::{AnimationTarget, SharedTarget, WeakTarget};
pub use transform::TransformState;
pub use value::{parse_length, AttrValue, PropertyKind};

pub use plotfx_color as color;
