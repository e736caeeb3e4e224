//! Easing functions
//!
//! Maps linear time progress (0.0 to 1.0) onto eased progress. Named easings
//! are resolved through an [`EasingRegistry`] so chart options can refer to
//! them by string.

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::AnimationError;

/// Easing curve
#[derive(Clone, Default)]
pub enum Easing {
    Linear,
    /// Half a cosine wave, the chart default
    #[default]
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutExpo,
    /// User supplied curve
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Create a custom easing from a function
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    /// Apply the easing to linear progress `t`
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInOutSine => -0.5 * ((PI * t).cos() - 1.0),
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t1 = t - 1.0;
                t1 * t1 * t1 + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let t1 = 2.0 * t - 2.0;
                    0.5 * t1 * t1 * t1 + 1.0
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
            Easing::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::EaseInOutSine => f.write_str("EaseInOutSine"),
            Easing::EaseInQuad => f.write_str("EaseInQuad"),
            Easing::EaseOutQuad => f.write_str("EaseOutQuad"),
            Easing::EaseInOutQuad => f.write_str("EaseInOutQuad"),
            Easing::EaseInCubic => f.write_str("EaseInCubic"),
            Easing::EaseOutCubic => f.write_str("EaseOutCubic"),
            Easing::EaseInOutCubic => f.write_str("EaseInOutCubic"),
            Easing::EaseOutExpo => f.write_str("EaseOutExpo"),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Name to easing lookup
#[derive(Clone, Debug)]
pub struct EasingRegistry {
    easings: FxHashMap<String, Easing>,
}

impl Default for EasingRegistry {
    fn default() -> Self {
        let mut registry = Self {
            easings: FxHashMap::default(),
        };
        for (name, easing) in [
            ("linear", Easing::Linear),
            ("ease-in-out-sine", Easing::EaseInOutSine),
            ("easeInOutSine", Easing::EaseInOutSine),
            ("ease-in-quad", Easing::EaseInQuad),
            ("ease-out-quad", Easing::EaseOutQuad),
            ("ease-in-out-quad", Easing::EaseInOutQuad),
            ("ease-in-cubic", Easing::EaseInCubic),
            ("ease-out-cubic", Easing::EaseOutCubic),
            ("ease-in-out-cubic", Easing::EaseInOutCubic),
            ("ease-out-expo", Easing::EaseOutExpo),
        ] {
            registry.register(name, easing);
        }
        registry
    }
}

impl EasingRegistry {
    /// Registry with the built-in easings
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a named easing
    pub fn register(&mut self, name: impl Into<String>, easing: Easing) {
        self.easings.insert(name.into(), easing);
    }

    pub fn get(&self, name: &str) -> Result<Easing, AnimationError> {
        self.easings
            .get(name)
            .cloned()
            .ok_or_else(|| AnimationError::UnknownEasing(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.easings.contains_key(name)
    }

    /// Look up `name`, falling back to the default easing
    pub fn resolve(&self, name: &str) -> Easing {
        self.get(name).unwrap_or_else(|err| {
            tracing::debug!("{}, using default easing", err);
            Easing::default()
        })
    }
}
