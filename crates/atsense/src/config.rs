/*!
Configuration for a detector.

All values have sensible defaults. Override with struct update syntax or load
from JSON (durations are given in seconds):

```
use atsense::DetectorConfig;

let config = DetectorConfig {
    max_checks: 5,
    ..Default::default()
};
assert!(config.validate().is_ok());

let config = DetectorConfig::from_json_str(r#"{ "rapid_tab_window": 1.5 }"#).unwrap();
assert_eq!(config.rapid_tab_window.as_millis(), 1500);
```
*/

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::types::{AtsenseError, AtsenseResult, DetectorState};

/// Default confirmation prompt text.
pub const DEFAULT_ALERT_MESSAGE: &str = "It looks like you may be using a screen reader. \
This site includes a built-in screen reader that may conflict with yours. \
Would you like to turn off the built-in screen reader?";

/// Default preference key for the opt-out flag.
pub const DEFAULT_STORAGE_KEY: &str = "builtin-screen-reader-disabled";

/// Acknowledgement shown after the built-in reader is disabled.
pub const DISABLED_ACK_MESSAGE: &str = "The built-in screen reader has been turned off. \
You can turn it back on from the accessibility settings.";

/// Focus count on annotated elements that counts as a positive signal.
pub const ARIA_FOCUS_THRESHOLD: u32 = 3;

/// How long a quick-nav keystroke stays in the sliding tally.
pub const QUICK_NAV_DECAY: Duration = Duration::from_secs(5);

/// Host callback invoked once with a view of the detector on a positive verdict.
pub type DetectCallback = Arc<dyn Fn(&DetectorState) + Send + Sync>;

/// Detector configuration. Immutable once a detector is built.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
  /// Message for the yes/no confirmation prompt.
  pub alert_message: String,

  /// Ask the user before opting out of the built-in reader.
  /// Default: true.
  pub show_confirm_dialog: bool,

  /// Maximum number of full evaluations per detector.
  /// Default: 3.
  pub max_checks: u32,

  /// Delay between page load and the initial check.
  /// Default: 2s.
  #[serde(with = "duration_secs")]
  pub initial_check_delay: Duration,

  /// Preference key for the opt-out flag.
  pub storage_key: String,

  /// Quick-nav keystrokes within the decay window that trigger an evaluation.
  /// Default: 3.
  pub quick_nav_threshold: u32,

  /// Tab presses without a silent window that count as a positive signal.
  /// Default: 5.
  pub rapid_tab_threshold: u32,

  /// Silence after which the Tab tally resets.
  /// Default: 3s.
  #[serde(with = "duration_secs")]
  pub rapid_tab_window: Duration,

  /// Active accessibility preferences (0..=3) that count as a positive signal.
  /// Default: 2.
  pub min_accessibility_features: u8,

  /// Bind listeners and schedule the initial check on build.
  /// Default: true.
  pub auto_init: bool,

  /// Called once on a positive verdict.
  #[serde(skip)]
  pub on_detect: Option<DetectCallback>,
}

impl Default for DetectorConfig {
  fn default() -> Self {
    Self {
      alert_message: DEFAULT_ALERT_MESSAGE.to_string(),
      show_confirm_dialog: true,
      max_checks: 3,
      initial_check_delay: Duration::from_secs(2),
      storage_key: DEFAULT_STORAGE_KEY.to_string(),
      quick_nav_threshold: 3,
      rapid_tab_threshold: 5,
      rapid_tab_window: Duration::from_secs(3),
      min_accessibility_features: 2,
      auto_init: true,
      on_detect: None,
    }
  }
}

impl std::fmt::Debug for DetectorConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DetectorConfig")
      .field("alert_message", &self.alert_message)
      .field("show_confirm_dialog", &self.show_confirm_dialog)
      .field("max_checks", &self.max_checks)
      .field("initial_check_delay", &self.initial_check_delay)
      .field("storage_key", &self.storage_key)
      .field("quick_nav_threshold", &self.quick_nav_threshold)
      .field("rapid_tab_threshold", &self.rapid_tab_threshold)
      .field("rapid_tab_window", &self.rapid_tab_window)
      .field("min_accessibility_features", &self.min_accessibility_features)
      .field("auto_init", &self.auto_init)
      .field("on_detect", &self.on_detect.is_some())
      .finish()
  }
}

impl DetectorConfig {
  /// Create a new config with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse a config from JSON. Missing fields take their defaults.
  pub fn from_json_str(json: &str) -> AtsenseResult<Self> {
    let config: Self =
      serde_json::from_str(json).map_err(|e| AtsenseError::ConfigLoad(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Read and parse a JSON config file.
  pub fn from_json_file(path: impl AsRef<Path>) -> AtsenseResult<Self> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
      .map_err(|e| AtsenseError::ConfigLoad(format!("{}: {e}", path.display())))?;
    Self::from_json_str(&text)
  }

  /// Check every value against its allowed range.
  pub fn validate(&self) -> AtsenseResult<()> {
    if self.max_checks == 0 {
      return Err(AtsenseError::InvalidConfig("max_checks must be > 0".into()));
    }
    if self.quick_nav_threshold == 0 {
      return Err(AtsenseError::InvalidConfig(
        "quick_nav_threshold must be > 0".into(),
      ));
    }
    if self.rapid_tab_threshold == 0 {
      return Err(AtsenseError::InvalidConfig(
        "rapid_tab_threshold must be > 0".into(),
      ));
    }
    if self.rapid_tab_window.is_zero() {
      return Err(AtsenseError::InvalidConfig(
        "rapid_tab_window must be > 0".into(),
      ));
    }
    if self.min_accessibility_features > 3 {
      return Err(AtsenseError::InvalidConfig(format!(
        "min_accessibility_features must be in 0..=3, got {}",
        self.min_accessibility_features
      )));
    }
    Ok(())
  }
}

/// Serde adapter: `Duration` as fractional seconds.
mod duration_secs {
  use serde::{Deserialize, Deserializer, Serializer};
  use std::time::Duration;

  pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
  }
}
