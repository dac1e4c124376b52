/*! Platform accessibility preferences (the media-query flags). */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Current platform accessibility preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccessibilityPreferences {
  /// `prefers-contrast: more`
  #[serde(default)]
  pub increased_contrast: bool,
  /// `forced-colors: active`
  #[serde(default)]
  pub forced_colors: bool,
  /// `prefers-reduced-motion: reduce`
  #[serde(default)]
  pub reduced_motion: bool,
}

impl AccessibilityPreferences {
  /// Number of active flags, 0..=3.
  pub fn active_count(&self) -> u8 {
    u8::from(self.increased_contrast) + u8::from(self.forced_colors) + u8::from(self.reduced_motion)
  }
}
