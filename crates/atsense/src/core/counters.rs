/*!
Signal counters.

Three independent tallies. This module only holds the numbers and the
rapid-tab timer slot; arming timers is the router's job.

- rapid tab: reset to 0 by a single re-armed timer after a silent window
- quick nav: each increment is undone by its own timer, floored at 0
- annotated focus: cumulative for the detector's lifetime
*/

use crate::types::TimerId;

#[derive(Debug, Default)]
pub(crate) struct SignalCounters {
  rapid_tab_count: u32,
  /// The one live rapid-tab decay timer.
  rapid_tab_timer: Option<TimerId>,
  /// Bumped on every re-arm; a firing timer carries the value it was armed with.
  rapid_tab_generation: u64,
  quick_nav_count: u32,
  aria_focus_count: u32,
}

impl SignalCounters {
  pub(crate) const fn rapid_tab_count(&self) -> u32 {
    self.rapid_tab_count
  }

  pub(crate) const fn quick_nav_count(&self) -> u32 {
    self.quick_nav_count
  }

  pub(crate) const fn aria_focus_count(&self) -> u32 {
    self.aria_focus_count
  }

  /// Count a Tab press. Returns the new count.
  pub(crate) fn record_rapid_tab(&mut self) -> u32 {
    self.rapid_tab_count = self.rapid_tab_count.saturating_add(1);
    self.rapid_tab_count
  }

  /// Start a new silent window. Returns the generation the decay timer must carry.
  pub(crate) fn begin_rapid_tab_window(&mut self) -> u64 {
    self.rapid_tab_generation = self.rapid_tab_generation.wrapping_add(1);
    self.rapid_tab_generation
  }

  /// Install the decay timer for the current window, returning the one it replaces.
  pub(crate) fn arm_rapid_tab_timer(&mut self, id: TimerId) -> Option<TimerId> {
    self.rapid_tab_timer.replace(id)
  }

  /// Remove the decay timer without firing it.
  pub(crate) fn take_rapid_tab_timer(&mut self) -> Option<TimerId> {
    self.rapid_tab_timer.take()
  }

  /// A decay timer fired. Resets the tally only if it belongs to the current
  /// window, so a timer that raced with a re-arm cannot wipe a fresh burst.
  pub(crate) fn expire_rapid_tab(&mut self, generation: u64) -> bool {
    if self.rapid_tab_timer.is_none() || generation != self.rapid_tab_generation {
      return false;
    }
    self.rapid_tab_timer = None;
    self.rapid_tab_count = 0;
    true
  }

  /// Count a quick-nav keystroke. Returns the new count.
  pub(crate) fn record_quick_nav(&mut self) -> u32 {
    self.quick_nav_count = self.quick_nav_count.saturating_add(1);
    self.quick_nav_count
  }

  /// Undo one quick-nav keystroke, never below 0.
  pub(crate) fn decay_quick_nav(&mut self) {
    self.quick_nav_count = self.quick_nav_count.saturating_sub(1);
  }

  /// Count a focus on an annotated element. Returns the new count.
  pub(crate) fn record_annotated_focus(&mut self) -> u32 {
    self.aria_focus_count = self.aria_focus_count.saturating_add(1);
    self.aria_focus_count
  }
}
