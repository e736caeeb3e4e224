//! Animation options and configuration
//!
//! [`AnimationOptions`] is what `Animator::animate` takes. [`AnimationConfig`]
//! is its serializable form: the resolved shape of a chart's `animation`
//! option, which is either a plain toggle or an object.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::easing::{Easing, EasingRegistry};
use crate::error::AnimationError;
use crate::fx::{StepCallback, StepEvent};

/// Default animation duration
pub const DEFAULT_DURATION: Duration = Duration::from_millis(400);

/// Name of the default easing
pub const DEFAULT_EASING: &str = "ease-in-out-sine";

// =============================================================================
// Options
// =============================================================================

/// An easing given directly or by registry name
#[derive(Clone, Debug)]
pub enum EasingSpec {
    Named(String),
    Function(Easing),
}

impl EasingSpec {
    /// Resolve against `registry`; unknown names give the default easing
    pub fn resolve(&self, registry: &EasingRegistry) -> Easing {
        match self {
            EasingSpec::Named(name) => registry.resolve(name),
            EasingSpec::Function(easing) => easing.clone(),
        }
    }
}

impl Default for EasingSpec {
    fn default() -> Self {
        EasingSpec::Function(Easing::default())
    }
}

impl From<Easing> for EasingSpec {
    fn from(easing: Easing) -> Self {
        EasingSpec::Function(easing)
    }
}

impl From<&str> for EasingSpec {
    fn from(name: &str) -> Self {
        EasingSpec::Named(name.to_string())
    }
}

impl From<String> for EasingSpec {
    fn from(name: String) -> Self {
        EasingSpec::Named(name)
    }
}

/// Options of one `animate` call
///
/// A zero duration applies the end values at once; use it to get a
/// completion callback without animating.
pub struct AnimationOptions {
    pub duration: Duration,
    pub easing: EasingSpec,
    /// Delay before the tasks start moving
    pub defer: Duration,
    /// Runs once, after every property of the call is done
    pub on_complete: Option<Box<dyn FnOnce()>>,
    /// Runs after every applied per-property update
    pub on_step: Option<StepCallback>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            easing: EasingSpec::default(),
            defer: Duration::ZERO,
            on_complete: None,
            on_step: None,
        }
    }
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set duration
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: set duration in milliseconds
    pub fn duration_ms(self, ms: u64) -> Self {
        self.duration(Duration::from_millis(ms))
    }

    /// Builder: set easing (an [`Easing`] or a registry name)
    pub fn easing(mut self, easing: impl Into<EasingSpec>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Builder: delay the start
    pub fn defer(mut self, defer: Duration) -> Self {
        self.defer = defer;
        self
    }

    /// Builder: completion callback
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Builder: step callback
    pub fn on_step(mut self, callback: impl Fn(&StepEvent<'_>) + 'static) -> Self {
        self.on_step = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for AnimationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("defer", &self.defer)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_step", &self.on_step.is_some())
            .finish()
    }
}

/// Whether (and how) to animate
pub enum Animation {
    /// Apply end values immediately, then run `on_complete`
    Disabled {
        on_complete: Option<Box<dyn FnOnce()>>,
    },
    Enabled(AnimationOptions),
}

impl Animation {
    /// Disabled, with no completion callback
    pub fn disabled() -> Self {
        Animation::Disabled { on_complete: None }
    }

    /// Disabled; `callback` runs once the values are set
    pub fn disabled_then(callback: impl FnOnce() + 'static) -> Self {
        Animation::Disabled {
            on_complete: Some(Box::new(callback)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Animation::Enabled(_))
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Animation::Disabled { on_complete } => f
                .debug_struct("Disabled")
                .field("on_complete", &on_complete.is_some())
                .finish(),
            Animation::Enabled(options) => f.debug_tuple("Enabled").field(options).finish(),
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Animation::Enabled(AnimationOptions::default())
    }
}

impl From<bool> for Animation {
    fn from(enabled: bool) -> Self {
        if enabled {
            Animation::default()
        } else {
            Animation::disabled()
        }
    }
}

impl From<AnimationOptions> for Animation {
    fn from(options: AnimationOptions) -> Self {
        Animation::Enabled(options)
    }
}

impl From<&AnimationConfig> for Animation {
    fn from(config: &AnimationConfig) -> Self {
        if config.enabled {
            Animation::Enabled(config.to_options())
        } else {
            Animation::disabled()
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Serializable animation settings
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnimationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_easing")]
    pub easing: String,
    #[serde(default)]
    pub defer_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_duration_ms() -> u64 {
    DEFAULT_DURATION.as_millis() as u64
}

fn default_easing() -> String {
    DEFAULT_EASING.to_string()
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            duration_ms: default_duration_ms(),
            easing: default_easing(),
            defer_ms: 0,
        }
    }
}

impl AnimationConfig {
    /// Parse from a TOML table
    pub fn from_toml(input: &str) -> Result<Self, AnimationError> {
        Ok(toml::from_str(input)?)
    }

    /// Check that the easing name is registered
    pub fn validate(&self, registry: &EasingRegistry) -> Result<(), AnimationError> {
        registry.get(&self.easing).map(|_| ())
    }

    /// Options with the easing left as a name, resolved at animate time
    pub fn to_options(&self) -> AnimationOptions {
        AnimationOptions::new()
            .duration_ms(self.duration_ms)
            .easing(self.easing.as_str())
            .defer(Duration::from_millis(self.defer_ms))
    }
}

/// A chart's `animation` option: `true`, `false` or a settings object
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnimationSetting {
    Toggle(bool),
    Config(AnimationConfig),
}

impl AnimationSetting {
    /// Settings with the toggle expanded to defaults
    pub fn resolve(&self) -> AnimationConfig {
        match self {
            AnimationSetting::Toggle(enabled) => AnimationConfig {
                enabled: *enabled,
                ..AnimationConfig::default()
            },
            AnimationSetting::Config(config) => config.clone(),
        }
    }
}

impl Default for AnimationSetting {
    fn default() -> Self {
        AnimationSetting::Toggle(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct ChartOptions {
        #[serde(default)]
        animation: AnimationSetting,
    }

    #[test]
    fn test_defaults() {
        let options = AnimationOptions::default();
        assert_eq!(options.duration, Duration::from_millis(400));
        assert_eq!(options.defer, Duration::ZERO);
        assert!(matches!(options.easing, EasingSpec::Function(Easing::EaseInOutSine)));

        let config = AnimationConfig::default();
        assert!(config.enabled);
        assert_eq!(config.duration_ms, 400);
        assert_eq!(config.easing, "ease-in-out-sine");
    }

    #[test]
    fn test_config_from_toml() {
        let config = AnimationConfig::from_toml("duration_ms = 250\neasing = \"linear\"").unwrap();
        assert!(config.enabled);
        assert_eq!(config.duration_ms, 250);
        assert_eq!(config.easing, "linear");
        assert!(config.validate(&EasingRegistry::new()).is_ok());

        assert!(matches!(
            AnimationConfig::from_toml("duration_ms = \"slow\""),
            Err(AnimationError::Config(_))
        ));
    }

    #[test]
    fn test_validate_unknown_easing() {
        let config = AnimationConfig {
            easing: "wobble".to_string(),
            ..AnimationConfig::default()
        };
        assert!(matches!(
            config.validate(&EasingRegistry::new()),
            Err(AnimationError::UnknownEasing(_))
        ));
    }

    #[test]
    fn test_setting_toggle_or_object() {
        let off: ChartOptions = toml::from_str("animation = false").unwrap();
        assert_eq!(off.animation, AnimationSetting::Toggle(false));
        assert!(!Animation::from(&off.animation.resolve()).is_enabled());

        let custom: ChartOptions = toml::from_str("[animation]\nduration_ms = 1000\ndefer_ms = 50").unwrap();
        let config = custom.animation.resolve();
        assert_eq!(config.duration_ms, 1000);
        assert_eq!(config.defer_ms, 50);

        let json: ChartOptions = serde_json::from_str(r#"{"animation": {"enabled": false}}"#).unwrap();
        assert!(!json.animation.resolve().enabled);

        let missing: ChartOptions = serde_json::from_str("{}").unwrap();
        assert!(missing.animation.resolve().enabled);
    }

    #[test]
    fn test_config_to_options() {
        let config = AnimationConfig {
            duration_ms: 120,
            defer_ms: 30,
            ..AnimationConfig::default()
        };
        match Animation::from(&config) {
            Animation::Enabled(options) => {
                assert_eq!(options.duration, Duration::from_millis(120));
                assert_eq!(options.defer, Duration::from_millis(30));
                assert!(matches!(options.easing, EasingSpec::Named(ref name) if name == "ease-in-out-sine"));
            }
            Animation::Disabled { .. } => panic!("expected enabled animation"),
        }
    }

    #[test]
    fn test_from_bool() {
        assert!(Animation::from(true).is_enabled());
        assert!(!Animation::from(false).is_enabled());
    }
}
