/*!
Event router.

Turns raw input into counter updates and, when a signal crosses its trigger
point, exactly one guarded evaluation per event:

- `Tab` feeds the rapid-navigation tally; reaching `rapid_tab_threshold` triggers.
- quick-nav letters feed the quick-nav tally; reaching `quick_nav_threshold` triggers.
- screen reader signature keys trigger on every press.
- focus on an annotated element feeds the focus tally; reaching the fixed focus threshold triggers.
- `Load` releases the pending post-load check.

Counters and the latch are updated under the state lock; side effects run
after it is released.
*/

use std::sync::Arc;

use super::{snapshot, Engine, InitialCheck, Shared};
use crate::config::{ARIA_FOCUS_THRESHOLD, QUICK_NAV_DECAY};
use crate::platform::InputListener;
use crate::types::{DetectorState, FocusTarget, InputEvent, KeyEvent, Verdict};

/// Sequential navigation key.
const NAVIGATION_KEY: &str = "Tab";

/// Single-letter browse-mode commands: heading, link, button, form field, table,
/// list, list item, graphic, landmark, edit field, region, frame.
const QUICK_NAV_KEYS: [char; 12] = ['h', 'k', 'b', 'f', 't', 'l', 'i', 'g', 'd', 'e', 'r', 'm'];

const ARROW_KEYS: [&str; 4] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

pub(crate) fn is_navigation_key(key: &KeyEvent) -> bool {
  key.key == NAVIGATION_KEY
}

/// A quick-nav letter, any case, with no command modifier held.
pub(crate) fn is_quick_nav_key(key: &KeyEvent) -> bool {
  if key.has_command_modifier() {
    return false;
  }
  let mut chars = key.key.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) => QUICK_NAV_KEYS.contains(&c.to_ascii_lowercase()),
    _ => false,
  }
}

/// Modifier chords that desktop screen readers use for browse-mode commands.
pub(crate) fn is_signature_key(key: &KeyEvent) -> bool {
  is_insert_chord(key) || is_table_navigation_chord(key)
}

/// `Insert` together with `ArrowDown` or `T`.
///
/// One key event names one key, so this never matches. Detecting the chord
/// would need held-key tracking, which is deliberately not done.
#[allow(clippy::nonminimal_bool)]
fn is_insert_chord(key: &KeyEvent) -> bool {
  key.key == "Insert" && (key.key == "ArrowDown" || key.key == "T")
}

/// Ctrl+Alt+Arrow (table navigation).
fn is_table_navigation_chord(key: &KeyEvent) -> bool {
  key.ctrl && key.alt && ARROW_KEYS.contains(&key.key.as_str())
}

impl Shared {
  /// Bind the listener and arm the post-load check.
  pub(crate) fn init(self: &Arc<Self>) {
    let proceed = self.with_state(|engine| {
      let lifecycle = &mut engine.lifecycle;
      if lifecycle.destroyed {
        log::debug!("[router] init after destroy ignored");
        return false;
      }
      if lifecycle.initialized {
        return false;
      }
      lifecycle.initialized = true;
      true
    });
    if !proceed {
      return;
    }

    // Bind outside the lock: a source may deliver events from inside `listen`.
    let weak = Arc::downgrade(self);
    let listener: InputListener = Arc::new(move |event: &InputEvent| {
      if let Some(shared) = weak.upgrade() {
        shared.route(event);
      }
    });
    let listener_id = self.input.listen(listener);
    let source_loaded = self.input.is_loaded();

    let raced_destroy = self.with_state(|engine| {
      if engine.lifecycle.destroyed {
        return true;
      }
      engine.lifecycle.listener = Some(listener_id);
      engine.lifecycle.loaded |= source_loaded;
      if engine.lifecycle.initial_check == InitialCheck::Idle {
        if engine.lifecycle.loaded {
          self.schedule_initial_check(engine);
        } else {
          engine.lifecycle.initial_check = InitialCheck::AwaitingLoad;
        }
      }
      false
    });

    if raced_destroy {
      self.input.unlisten(listener_id);
      return;
    }
    log::debug!("[router] listening (source loaded: {source_loaded})");
  }

  /// Remove the listener and cancel owned timers. Quick-nav decay timers are left to
  /// fire; they only decrement a counter.
  pub(crate) fn destroy(&self) {
    let teardown = self.with_state(|engine| {
      if engine.lifecycle.destroyed {
        return None;
      }
      engine.lifecycle.destroyed = true;
      let listener = engine.lifecycle.listener.take();
      let rapid_tab_timer = engine.counters.take_rapid_tab_timer();
      let initial_timer = match std::mem::replace(
        &mut engine.lifecycle.initial_check,
        InitialCheck::Done,
      ) {
        InitialCheck::Scheduled(id) => Some(id),
        _ => None,
      };
      Some((listener, [rapid_tab_timer, initial_timer]))
    });

    let Some((listener, timers)) = teardown else {
      return;
    };
    if let Some(id) = listener {
      self.input.unlisten(id);
    }
    for id in timers.into_iter().flatten() {
      self.scheduler.cancel(id);
    }
    log::debug!("[router] destroyed");
  }

  /// Route one event. No-op after teardown.
  pub(crate) fn route(self: &Arc<Self>, event: &InputEvent) {
    let detection = self.with_state(|engine| {
      if engine.lifecycle.destroyed {
        return None;
      }
      let trigger = match event {
        InputEvent::KeyDown(key) => self.on_key_down(engine, key),
        InputEvent::Focus(target) => Self::on_focus(engine, target),
        InputEvent::Load => {
          self.on_load(engine);
          false
        }
      };
      if trigger {
        self.decide(engine)
      } else {
        None
      }
    });

    if let Some(view) = detection {
      self.actuate(&view);
    }
  }

  /// Run one guarded evaluation outside of event routing. Negative after teardown.
  pub(crate) fn check(&self) -> Verdict {
    let detection = self.with_state(|engine| {
      if engine.lifecycle.destroyed {
        return None;
      }
      self.decide(engine)
    });
    match detection {
      Some(view) => {
        self.actuate(&view);
        Verdict::Positive
      }
      None => Verdict::Negative,
    }
  }

  /// Evaluate the policy. Returns the latched view on a positive verdict.
  fn decide(&self, engine: &mut Engine) -> Option<DetectorState> {
    let Engine {
      counters, decision, ..
    } = &mut *engine;
    let verdict = decision.evaluate(&self.config, counters, || {
      snapshot::sample(self.probe.as_ref(), self.config.min_accessibility_features)
    });
    verdict.is_positive().then(|| engine.snapshot())
  }

  fn on_key_down(self: &Arc<Self>, engine: &mut Engine, key: &KeyEvent) -> bool {
    let mut trigger = false;

    if is_navigation_key(key) {
      let count = engine.counters.record_rapid_tab();
      self.arm_rapid_tab_decay(engine);
      trigger |= count >= self.config.rapid_tab_threshold;
    }

    if is_quick_nav_key(key) {
      let count = engine.counters.record_quick_nav();
      self.schedule_quick_nav_decay();
      trigger |= count >= self.config.quick_nav_threshold;
    }

    if is_signature_key(key) {
      log::debug!("[router] signature key {key:?}");
      trigger = true;
    }

    trigger
  }

  fn on_focus(engine: &mut Engine, target: &FocusTarget) -> bool {
    if !target.is_annotated() {
      return false;
    }
    engine.counters.record_annotated_focus() >= ARIA_FOCUS_THRESHOLD
  }

  fn on_load(self: &Arc<Self>, engine: &mut Engine) {
    engine.lifecycle.loaded = true;
    if engine.lifecycle.initial_check == InitialCheck::AwaitingLoad {
      self.schedule_initial_check(engine);
    }
  }

  /// (Re)start the silent window. Only the newest timer can reset the tally.
  fn arm_rapid_tab_decay(self: &Arc<Self>, engine: &mut Engine) {
    let generation = engine.counters.begin_rapid_tab_window();
    let weak = Arc::downgrade(self);
    let id = self.scheduler.schedule(
      self.config.rapid_tab_window,
      Box::new(move || {
        if let Some(shared) = weak.upgrade() {
          if shared.with_state(|engine| engine.counters.expire_rapid_tab(generation)) {
            log::trace!("[router] rapid tab window elapsed");
          }
        }
      }),
    );
    if let Some(previous) = engine.counters.arm_rapid_tab_timer(id) {
      self.scheduler.cancel(previous);
    }
  }

  fn schedule_quick_nav_decay(self: &Arc<Self>) {
    let weak = Arc::downgrade(self);
    self.scheduler.schedule(
      QUICK_NAV_DECAY,
      Box::new(move || {
        if let Some(shared) = weak.upgrade() {
          shared.with_state(|engine| engine.counters.decay_quick_nav());
        }
      }),
    );
  }

  fn schedule_initial_check(self: &Arc<Self>, engine: &mut Engine) {
    let weak = Arc::downgrade(self);
    let id = self.scheduler.schedule(
      self.config.initial_check_delay,
      Box::new(move || {
        if let Some(shared) = weak.upgrade() {
          shared.run_initial_check();
        }
      }),
    );
    engine.lifecycle.initial_check = InitialCheck::Scheduled(id);
  }

  fn run_initial_check(&self) {
    let detection = self.with_state(|engine| {
      if engine.lifecycle.destroyed
        || !matches!(engine.lifecycle.initial_check, InitialCheck::Scheduled(_))
      {
        return None;
      }
      engine.lifecycle.initial_check = InitialCheck::Done;
      log::debug!("[router] running initial check");
      self.decide(engine)
    });

    if let Some(view) = detection {
      self.actuate(&view);
    }
  }
}
