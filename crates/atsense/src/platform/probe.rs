/*! Accessibility preference probes. */

use parking_lot::RwLock;
use std::sync::Arc;

use super::PreferenceProbe;
use crate::types::AccessibilityPreferences;

/// Probe that always reports the same preferences.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticProbe(pub AccessibilityPreferences);

impl PreferenceProbe for StaticProbe {
  fn preferences(&self) -> AccessibilityPreferences {
    self.0
  }
}

/// Probe the host updates as platform preferences change.
///
/// Clone is cheap (Arc bump); every clone sees the same value.
#[derive(Debug, Default, Clone)]
pub struct SharedProbe {
  current: Arc<RwLock<AccessibilityPreferences>>,
}

impl SharedProbe {
  pub fn new(initial: AccessibilityPreferences) -> Self {
    Self {
      current: Arc::new(RwLock::new(initial)),
    }
  }

  /// Replace the reported preferences.
  pub fn set(&self, preferences: AccessibilityPreferences) {
    *self.current.write() = preferences;
  }
}

impl PreferenceProbe for SharedProbe {
  fn preferences(&self) -> AccessibilityPreferences {
    *self.current.read()
  }
}
