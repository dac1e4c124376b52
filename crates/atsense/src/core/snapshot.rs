/*!
Accessibility snapshot.

Reduces the platform preference flags to one boolean. Stateless: sampled
fresh on every decision attempt, since preferences can change mid-session.
*/

use crate::platform::PreferenceProbe;
use crate::types::AccessibilityPreferences;

/// True iff at least `min_features` preference flags are active.
pub(crate) fn meets_minimum(preferences: &AccessibilityPreferences, min_features: u8) -> bool {
  preferences.active_count() >= min_features
}

/// Sample the probe and reduce.
pub(crate) fn sample(probe: &dyn PreferenceProbe, min_features: u8) -> bool {
  let preferences = probe.preferences();
  let positive = meets_minimum(&preferences, min_features);
  log::trace!("[snapshot] {preferences:?} (min {min_features}) -> {positive}");
  positive
}
