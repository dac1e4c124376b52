/*!
Decision policy.

Disjunctive threshold rule gated by a single-fire latch and an attempt budget.
The policy is the only mutator of `attempts_used` and `detected`.

1. Already detected: Negative, nothing changes.
2. Budget spent: Negative, nothing changes.
3. Spend one attempt. Positive iff the accessibility snapshot holds, or
   annotated focus reached [`ARIA_FOCUS_THRESHOLD`], or the Tab tally
   reached `rapid_tab_threshold`.
4. Positive latches `detected`.
*/

use super::counters::SignalCounters;
use crate::config::{DetectorConfig, ARIA_FOCUS_THRESHOLD};
use crate::types::Verdict;

#[derive(Debug, Default)]
pub(crate) struct DecisionState {
  detected: bool,
  attempts_used: u32,
  exhaustion_logged: bool,
}

impl DecisionState {
  pub(crate) const fn detected(&self) -> bool {
    self.detected
  }

  pub(crate) const fn attempts_used(&self) -> u32 {
    self.attempts_used
  }

  /// Run one guarded evaluation. `accessibility` is only sampled when an attempt is spent.
  pub(crate) fn evaluate(
    &mut self,
    config: &DetectorConfig,
    counters: &SignalCounters,
    accessibility: impl FnOnce() -> bool,
  ) -> Verdict {
    if self.detected {
      return Verdict::Negative;
    }
    if self.attempts_used >= config.max_checks {
      if !self.exhaustion_logged {
        self.exhaustion_logged = true;
        log::debug!(
          "[policy] attempt budget of {} spent, no further checks",
          config.max_checks
        );
      }
      return Verdict::Negative;
    }

    self.attempts_used += 1;

    let accessibility = accessibility();
    let focus = counters.aria_focus_count() >= ARIA_FOCUS_THRESHOLD;
    let rapid_tab = counters.rapid_tab_count() >= config.rapid_tab_threshold;

    log::debug!(
      "[policy] attempt {}/{}: accessibility={accessibility} focus={focus} rapid_tab={rapid_tab}",
      self.attempts_used,
      config.max_checks
    );

    if accessibility || focus || rapid_tab {
      self.detected = true;
      Verdict::Positive
    } else {
      Verdict::Negative
    }
  }
}
