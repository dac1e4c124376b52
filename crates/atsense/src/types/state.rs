/*! Public view of detector state and verdicts. */

use serde::Serialize;
use ts_rs::TS;

/// Outcome of one decision evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Verdict {
  Positive,
  Negative,
}

impl Verdict {
  pub const fn is_positive(self) -> bool {
    matches!(self, Self::Positive)
  }
}

/// Copy of the detector's counters and flags at one point in time.
///
/// This is what callbacks and notifications carry; it never aliases live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct DetectorState {
  /// Latched once a positive verdict has been reached.
  pub detected: bool,
  /// Full evaluations performed so far, at most `max_checks`.
  pub attempts_used: u32,
  pub rapid_tab_count: u32,
  pub quick_nav_count: u32,
  pub aria_focus_count: u32,
  /// Listeners are bound.
  pub initialized: bool,
  /// `destroy()` has run.
  pub destroyed: bool,
}
