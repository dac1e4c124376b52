/*! Detector behaviour driven end to end with a virtual clock and a synthetic input bus. */

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
  AccessibilityPreferences, AtsenseError, Detector, DetectorConfig, Event, FocusTarget, InputBus,
  InputEvent, KeyEvent, ManualScheduler, MemoryStore, PreferenceStore, PromptSurface, SharedProbe,
  UnavailableStore, Verdict, DEFAULT_ALERT_MESSAGE, DEFAULT_STORAGE_KEY, DISABLED_ACK_MESSAGE,
};

#[derive(Debug, Default)]
struct RecordingPrompt {
  answer: AtomicBool,
  confirms: Mutex<Vec<String>>,
  alerts: Mutex<Vec<String>>,
}

impl RecordingPrompt {
  fn answering(answer: bool) -> Arc<Self> {
    let prompt = Self::default();
    prompt.answer.store(answer, Ordering::SeqCst);
    Arc::new(prompt)
  }

  fn confirm_count(&self) -> usize {
    self.confirms.lock().len()
  }
}

impl PromptSurface for RecordingPrompt {
  fn confirm(&self, message: &str) -> bool {
    self.confirms.lock().push(message.to_string());
    self.answer.load(Ordering::SeqCst)
  }

  fn alert(&self, message: &str) {
    self.alerts.lock().push(message.to_string());
  }
}

struct Harness {
  detector: Detector,
  input: InputBus,
  clock: ManualScheduler,
  store: Arc<MemoryStore>,
  prompt: Arc<RecordingPrompt>,
  probe: SharedProbe,
  detections: Arc<AtomicUsize>,
  events: async_broadcast::Receiver<Event>,
}

impl Harness {
  fn new(config: DetectorConfig) -> Self {
    Self::with_input(config, InputBus::new())
  }

  fn with_input(config: DetectorConfig, input: InputBus) -> Self {
    let clock = ManualScheduler::new();
    let store = Arc::new(MemoryStore::new());
    let prompt = RecordingPrompt::answering(true);
    let probe = SharedProbe::default();
    let detections = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&detections);

    let detector = Detector::builder()
      .config(config)
      .on_detect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
      })
      .input(input.clone())
      .scheduler(clock.clone())
      .store(Arc::clone(&store))
      .prompt(Arc::clone(&prompt))
      .probe(probe.clone())
      .build()
      .expect("valid config");
    let events = detector.subscribe();

    Self {
      detector,
      input,
      clock,
      store,
      prompt,
      probe,
      detections,
      events,
    }
  }

  fn tab(&self) {
    self.input.dispatch(&KeyEvent::new("Tab").into());
  }

  fn key(&self, key: KeyEvent) {
    self.input.dispatch(&key.into());
  }

  fn focus(&self, target: FocusTarget) {
    self.input.dispatch(&target.into());
  }

  fn detections(&self) -> usize {
    self.detections.load(Ordering::SeqCst)
  }

  fn drain_events(&mut self) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = self.events.try_recv() {
      events.push(event);
    }
    events
  }

  fn event_names(&mut self) -> Vec<&'static str> {
    self.drain_events().iter().map(Event::name).collect()
  }
}

fn signature_key() -> KeyEvent {
  KeyEvent::new("ArrowDown").with_ctrl().with_alt()
}

fn two_flags() -> AccessibilityPreferences {
  AccessibilityPreferences {
    increased_contrast: true,
    forced_colors: true,
    reduced_motion: false,
  }
}

mod rapid_navigation {
  use super::*;

  #[test]
  fn four_presses_do_not_detect() {
    let h = Harness::new(DetectorConfig::default());
    for _ in 0..4 {
      h.tab();
    }
    let state = h.detector.state();
    assert_eq!(state.rapid_tab_count, 4);
    assert!(!state.detected);
    assert_eq!(state.attempts_used, 0, "below threshold no evaluation runs");
    assert_eq!(h.detections(), 0);
  }

  #[test]
  fn fifth_press_detects() {
    let h = Harness::new(DetectorConfig::default());
    for _ in 0..5 {
      h.tab();
    }
    assert!(h.detector.is_detected());
    assert_eq!(h.detector.state().attempts_used, 1);
    assert_eq!(h.detections(), 1);
  }

  #[test]
  fn presses_inside_window_accumulate() {
    let h = Harness::new(DetectorConfig {
      rapid_tab_threshold: 100,
      ..Default::default()
    });
    for _ in 0..6 {
      h.tab();
      h.clock.advance(Duration::from_millis(2_900));
    }
    assert_eq!(h.detector.state().rapid_tab_count, 6);
  }

  #[test]
  fn silent_window_resets() {
    let h = Harness::new(DetectorConfig::default());
    for _ in 0..4 {
      h.tab();
    }
    h.clock.advance(Duration::from_secs(3));
    assert_eq!(h.detector.state().rapid_tab_count, 0);

    h.tab();
    assert_eq!(h.detector.state().rapid_tab_count, 1);
    assert!(!h.detector.is_detected());
  }

  #[test]
  fn only_one_decay_timer_is_live() {
    let h = Harness::new(DetectorConfig::default());
    for _ in 0..4 {
      h.tab();
    }
    assert_eq!(h.clock.pending(), 1, "re-arming cancels the previous timer");
  }
}

mod quick_navigation {
  use super::*;

  #[test]
  fn threshold_triggers_one_evaluation() {
    let h = Harness::new(DetectorConfig::default());
    h.key(KeyEvent::new("h"));
    h.key(KeyEvent::new("K"));
    assert_eq!(h.detector.state().attempts_used, 0);

    h.key(KeyEvent::new("b"));
    let state = h.detector.state();
    assert_eq!(state.quick_nav_count, 3);
    assert_eq!(state.attempts_used, 1);
    assert!(!state.detected, "quick nav alone is not a positive signal");
  }

  #[test]
  fn each_press_decays_after_five_seconds() {
    let h = Harness::new(DetectorConfig::default());
    h.key(KeyEvent::new("h"));
    h.clock.advance(Duration::from_secs(2));
    h.key(KeyEvent::new("h"));
    assert_eq!(h.detector.state().quick_nav_count, 2);

    h.clock.advance(Duration::from_secs(3));
    assert_eq!(h.detector.state().quick_nav_count, 1);

    h.clock.advance(Duration::from_secs(2));
    assert_eq!(h.detector.state().quick_nav_count, 0);
  }

  #[test]
  fn modified_letters_are_ignored() {
    let h = Harness::new(DetectorConfig::default());
    h.key(KeyEvent::new("h").with_ctrl());
    h.key(KeyEvent::new("h").with_meta());
    h.key(KeyEvent::new("a"));
    assert_eq!(h.detector.state().quick_nav_count, 0);
  }

  #[test]
  fn quick_nav_evaluation_sees_accessibility_snapshot() {
    let h = Harness::new(DetectorConfig::default());
    h.probe.set(two_flags());
    for key in ["h", "h", "h"] {
      h.key(KeyEvent::new(key));
    }
    assert!(h.detector.is_detected());
  }
}

mod focus {
  use super::*;

  #[test]
  fn three_annotated_focuses_detect() {
    let h = Harness::new(DetectorConfig::default());
    h.focus(FocusTarget::labelled());
    h.focus(FocusTarget::with_role("navigation"));
    assert!(!h.detector.is_detected());

    h.focus(FocusTarget {
      has_description: true,
      ..FocusTarget::default()
    });
    assert!(h.detector.is_detected());
    assert_eq!(h.detector.state().aria_focus_count, 3);
  }

  #[test]
  fn plain_focus_is_not_counted() {
    let h = Harness::new(DetectorConfig::default());
    for _ in 0..10 {
      h.focus(FocusTarget::plain());
    }
    assert_eq!(h.detector.state().aria_focus_count, 0);
    assert_eq!(h.detector.state().attempts_used, 0);
  }

  #[test]
  fn focus_count_does_not_decay() {
    let h = Harness::new(DetectorConfig::default());
    h.focus(FocusTarget::labelled());
    h.focus(FocusTarget::labelled());
    h.clock.advance(Duration::from_secs(3600));
    assert_eq!(h.detector.state().aria_focus_count, 2);
  }
}

mod initial_check {
  use super::*;

  #[test]
  fn waits_for_load_then_delay() {
    let h = Harness::new(DetectorConfig::default());
    h.clock.advance(Duration::from_secs(60));
    assert_eq!(h.detector.state().attempts_used, 0, "no check before load");

    h.input.dispatch(&InputEvent::Load);
    h.clock.advance(Duration::from_millis(1_999));
    assert_eq!(h.detector.state().attempts_used, 0);

    h.clock.advance(Duration::from_millis(1));
    assert_eq!(h.detector.state().attempts_used, 1);
  }

  #[test]
  fn already_loaded_source_schedules_immediately() {
    let h = Harness::with_input(DetectorConfig::default(), InputBus::loaded());
    h.clock.advance(Duration::from_secs(2));
    assert_eq!(h.detector.state().attempts_used, 1);
  }

  #[test]
  fn runs_once_even_with_repeated_load_events() {
    let h = Harness::new(DetectorConfig::default());
    for _ in 0..3 {
      h.input.dispatch(&InputEvent::Load);
    }
    h.clock.advance(Duration::from_secs(10));
    assert_eq!(h.detector.state().attempts_used, 1);
  }

  #[test]
  fn accessibility_snapshot_alone_detects_on_first_evaluation() {
    let h = Harness::with_input(DetectorConfig::default(), InputBus::loaded());
    h.probe.set(two_flags());
    h.clock.advance(Duration::from_secs(2));

    let state = h.detector.state();
    assert!(state.detected);
    assert_eq!(state.attempts_used, 1);
    assert_eq!(state.rapid_tab_count, 0);
    assert_eq!(state.aria_focus_count, 0);
  }

  #[test]
  fn snapshot_is_resampled_each_attempt() {
    let h = Harness::new(DetectorConfig::default());
    assert_eq!(h.detector.check(), Verdict::Negative);
    h.probe.set(two_flags());
    assert_eq!(h.detector.check(), Verdict::Positive);
  }
}

mod latch_and_budget {
  use super::*;

  #[test]
  fn side_effects_fire_once() {
    let mut h = Harness::new(DetectorConfig::default());
    for _ in 0..5 {
      h.tab();
    }
    for _ in 0..20 {
      h.tab();
      h.focus(FocusTarget::labelled());
      h.key(signature_key());
    }
    h.probe.set(two_flags());
    assert_eq!(h.detector.check(), Verdict::Negative);

    assert_eq!(h.detections(), 1);
    assert_eq!(h.prompt.confirm_count(), 1);
    assert_eq!(
      h.event_names(),
      vec!["detection:positive", "screen_reader:disabled"]
    );
  }

  #[test]
  fn every_signature_press_spends_one_attempt() {
    let h = Harness::new(DetectorConfig::default());
    h.key(signature_key());
    assert_eq!(h.detector.state().attempts_used, 1);
    h.key(signature_key());
    assert_eq!(h.detector.state().attempts_used, 2);
  }

  #[test]
  fn budget_caps_evaluations() {
    let h = Harness::new(DetectorConfig {
      max_checks: 3,
      ..Default::default()
    });
    for _ in 0..10 {
      h.key(signature_key());
    }
    assert_eq!(h.detector.state().attempts_used, 3);

    // A strong signal after the budget is spent changes nothing.
    h.probe.set(two_flags());
    for _ in 0..5 {
      h.focus(FocusTarget::labelled());
    }
    assert!(!h.detector.is_detected());
    assert_eq!(h.detector.state().attempts_used, 3);
    assert_eq!(h.detections(), 0);
    assert_eq!(h.prompt.confirm_count(), 0);
  }

  #[test]
  fn tab_and_quick_nav_share_the_budget() {
    let h = Harness::new(DetectorConfig {
      max_checks: 2,
      rapid_tab_threshold: 100,
      quick_nav_threshold: 1,
      ..Default::default()
    });
    h.key(KeyEvent::new("h"));
    h.key(signature_key());
    h.key(KeyEvent::new("t"));
    assert_eq!(h.detector.state().attempts_used, 2);
  }
}

mod actuator {
  use super::*;

  #[test]
  fn accepted_prompt_opts_out() {
    let mut h = Harness::new(DetectorConfig::default());
    for _ in 0..5 {
      h.tab();
    }
    assert_eq!(*h.prompt.confirms.lock(), vec![DEFAULT_ALERT_MESSAGE.to_string()]);
    assert!(h.detector.is_disabled_by_user());
    assert_eq!(
      h.store.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
      Some("true")
    );

    let events = h.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], Event::ScreenReaderDisabled(state) if state.detected));
  }

  #[test]
  fn declined_prompt_keeps_builtin_reader() {
    let mut h = Harness::new(DetectorConfig::default());
    h.prompt.answer.store(false, Ordering::SeqCst);
    for _ in 0..5 {
      h.tab();
    }
    assert!(h.detector.is_detected(), "verdict stands");
    assert!(!h.detector.is_disabled_by_user());
    assert_eq!(h.event_names(), vec!["detection:positive"]);
  }

  #[test]
  fn no_prompt_when_confirmation_is_off() {
    let mut h = Harness::new(DetectorConfig {
      show_confirm_dialog: false,
      ..Default::default()
    });
    for _ in 0..5 {
      h.tab();
    }
    assert_eq!(h.detections(), 1);
    assert_eq!(h.prompt.confirm_count(), 0);
    assert!(!h.detector.is_disabled_by_user());
    assert_eq!(h.event_names(), vec!["detection:positive"]);
  }

  #[test]
  fn no_prompt_when_already_opted_out() {
    let h = Harness::new(DetectorConfig::default());
    h.store.set(DEFAULT_STORAGE_KEY, "true").unwrap();
    for _ in 0..5 {
      h.tab();
    }
    assert_eq!(h.detections(), 1);
    assert_eq!(h.prompt.confirm_count(), 0);
  }

  #[test]
  fn custom_message_and_key_are_used() {
    let h = Harness::new(DetectorConfig {
      alert_message: "Turn it off?".into(),
      storage_key: "custom-key".into(),
      ..Default::default()
    });
    for _ in 0..5 {
      h.tab();
    }
    assert_eq!(*h.prompt.confirms.lock(), vec!["Turn it off?".to_string()]);
    assert_eq!(h.store.get("custom-key").unwrap().as_deref(), Some("true"));
    assert_eq!(h.store.get(DEFAULT_STORAGE_KEY).unwrap(), None);
  }

  #[test]
  fn preference_round_trip() {
    let mut h = Harness::new(DetectorConfig::default());
    assert!(!h.detector.is_disabled_by_user());

    h.detector.disable_builtin_screen_reader();
    assert!(h.detector.is_disabled_by_user());
    assert_eq!(*h.prompt.alerts.lock(), vec![DISABLED_ACK_MESSAGE.to_string()]);

    h.detector.enable_builtin_screen_reader();
    assert!(!h.detector.is_disabled_by_user());

    assert_eq!(
      h.event_names(),
      vec!["screen_reader:disabled", "screen_reader:enabled"]
    );
  }

  #[test]
  fn direct_calls_are_idempotent() {
    let h = Harness::new(DetectorConfig::default());
    h.detector.disable_builtin_screen_reader();
    h.detector.disable_builtin_screen_reader();
    assert!(h.detector.is_disabled_by_user());
    h.detector.enable_builtin_screen_reader();
    h.detector.enable_builtin_screen_reader();
    assert!(!h.detector.is_disabled_by_user());
    assert!(!h.detector.is_detected(), "direct calls do not touch detection");
  }

  #[test]
  fn storage_failures_are_swallowed() {
    let prompt = RecordingPrompt::answering(true);
    let detector = Detector::builder()
      .store(UnavailableStore)
      .prompt(Arc::clone(&prompt))
      .scheduler(ManualScheduler::new())
      .build()
      .unwrap();
    let mut events = detector.subscribe();

    assert!(!detector.is_disabled_by_user());
    detector.disable_builtin_screen_reader();
    assert!(!detector.is_disabled_by_user());
    detector.enable_builtin_screen_reader();

    for _ in 0..5 {
      detector.handle_input(&KeyEvent::new("Tab").into());
    }
    assert!(detector.is_detected());
    assert_eq!(prompt.confirm_count(), 1);

    let mut names = Vec::new();
    while let Ok(event) = events.try_recv() {
      names.push(event.name());
    }
    assert_eq!(
      names,
      vec![
        "screen_reader:disabled",
        "screen_reader:enabled",
        "detection:positive",
        "screen_reader:disabled"
      ]
    );
  }

  #[test]
  fn callback_sees_latched_state() {
    let seen = Arc::new(Mutex::new(None));
    let inner = Arc::clone(&seen);
    let input = InputBus::new();
    let _detector = Detector::builder()
      .config(DetectorConfig {
        show_confirm_dialog: false,
        ..Default::default()
      })
      .on_detect(move |state| *inner.lock() = Some(*state))
      .input(input.clone())
      .scheduler(ManualScheduler::new())
      .build()
      .unwrap();

    for _ in 0..3 {
      input.dispatch(&FocusTarget::labelled().into());
    }
    let state = seen.lock().expect("callback ran");
    assert!(state.detected);
    assert_eq!(state.aria_focus_count, 3);
    assert_eq!(state.attempts_used, 1);
  }
}

mod lifecycle {
  use super::*;

  #[test]
  fn destroy_twice_is_safe() {
    let h = Harness::new(DetectorConfig::default());
    h.detector.destroy();
    h.detector.destroy();
    assert!(h.detector.state().destroyed);
    assert_eq!(h.input.listener_count(), 0);
  }

  #[test]
  fn destroy_before_init_is_safe() {
    let input = InputBus::new();
    let detector = Detector::builder()
      .auto_init(false)
      .input(input.clone())
      .scheduler(ManualScheduler::new())
      .build()
      .unwrap();
    assert!(!detector.state().initialized);
    assert_eq!(input.listener_count(), 0);

    detector.destroy();
    detector.init();
    assert_eq!(input.listener_count(), 0, "init after destroy is a no-op");
  }

  #[test]
  fn init_is_idempotent() {
    let h = Harness::new(DetectorConfig::default());
    h.detector.init();
    h.detector.init();
    assert_eq!(h.input.listener_count(), 1);
  }

  #[test]
  fn auto_init_off_defers_listening() {
    let input = InputBus::loaded();
    let clock = ManualScheduler::new();
    let detector = Detector::builder()
      .auto_init(false)
      .input(input.clone())
      .scheduler(clock.clone())
      .build()
      .unwrap();

    input.dispatch(&KeyEvent::new("Tab").into());
    assert_eq!(detector.state().rapid_tab_count, 0);
    assert_eq!(clock.pending(), 0);

    detector.init();
    assert_eq!(clock.pending(), 1, "initial check scheduled");
    input.dispatch(&KeyEvent::new("Tab").into());
    assert_eq!(detector.state().rapid_tab_count, 1);
  }

  #[test]
  fn destroy_cancels_owned_timers() {
    let h = Harness::with_input(DetectorConfig::default(), InputBus::loaded());
    h.tab();
    h.key(KeyEvent::new("h"));
    assert_eq!(h.clock.pending(), 3, "initial check, rapid tab decay, quick nav decay");

    h.detector.destroy();
    assert_eq!(h.clock.pending(), 1, "only the quick nav decay remains");

    h.clock.advance(Duration::from_secs(10));
    let state = h.detector.state();
    assert_eq!(state.attempts_used, 0, "initial check never ran");
    assert_eq!(state.quick_nav_count, 0, "leftover decay fired harmlessly");
  }

  #[test]
  fn events_after_destroy_are_ignored() {
    let h = Harness::new(DetectorConfig::default());
    h.detector.destroy();
    for _ in 0..10 {
      h.detector.handle_input(&KeyEvent::new("Tab").into());
    }
    assert_eq!(h.detector.state().rapid_tab_count, 0);
    assert!(!h.detector.is_detected());
  }

  #[test]
  fn drop_detaches_and_timers_fire_harmlessly() {
    let input = InputBus::loaded();
    let clock = ManualScheduler::new();
    {
      let detector = Detector::builder()
        .input(input.clone())
        .scheduler(clock.clone())
        .build()
        .unwrap();
      detector.handle_input(&KeyEvent::new("h").into());
      assert_eq!(input.listener_count(), 1);
    }
    assert_eq!(input.listener_count(), 0);
    clock.advance(Duration::from_secs(10));
    input.dispatch(&KeyEvent::new("Tab").into());
  }

  #[test]
  fn check_after_destroy_is_negative() {
    let mut h = Harness::new(DetectorConfig::default());
    h.probe.set(two_flags());
    h.detector.destroy();

    assert_eq!(h.detector.check(), Verdict::Negative);
    let state = h.detector.state();
    assert!(!state.detected);
    assert_eq!(state.attempts_used, 0);
    assert_eq!(h.detections(), 0);
    assert_eq!(h.prompt.confirm_count(), 0);
    assert!(h.drain_events().is_empty());
  }

  #[test]
  fn state_is_a_copy() {
    let h = Harness::new(DetectorConfig::default());
    let before = h.detector.state();
    h.tab();
    assert_eq!(before.rapid_tab_count, 0);
    assert_eq!(h.detector.state().rapid_tab_count, 1);
  }

  #[test]
  fn build_rejects_invalid_config() {
    let result = Detector::builder()
      .config(DetectorConfig {
        max_checks: 0,
        ..Default::default()
      })
      .scheduler(ManualScheduler::new())
      .build();
    assert!(matches!(result, Err(AtsenseError::InvalidConfig(_))));
  }

  #[test]
  fn direct_input_load_releases_initial_check() {
    let clock = ManualScheduler::new();
    let detector = Detector::builder()
      .scheduler(clock.clone())
      .build()
      .unwrap();
    detector.handle_input(&InputEvent::Load);
    clock.advance(Duration::from_secs(2));
    assert_eq!(detector.state().attempts_used, 1);
  }
}

mod long_durations {
  use super::*;
  use crate::ThreadScheduler;

  fn huge(field: &str) -> DetectorConfig {
    DetectorConfig::from_json_str(&format!(r#"{{ "{field}": 1e19 }}"#)).unwrap()
  }

  #[test]
  fn huge_window_on_real_clock_never_resets() {
    let detector = Detector::builder()
      .config(huge("rapid_tab_window"))
      .scheduler(ThreadScheduler::new())
      .build()
      .unwrap();
    for _ in 0..4 {
      detector.handle_input(&KeyEvent::new("Tab").into());
    }
    assert_eq!(detector.state().rapid_tab_count, 4);

    detector.handle_input(&KeyEvent::new("Tab").into());
    assert!(detector.is_detected());
  }

  #[test]
  fn huge_initial_delay_on_loaded_source_builds() {
    let detector = Detector::builder()
      .config(huge("initial_check_delay"))
      .input(InputBus::loaded())
      .scheduler(ThreadScheduler::new())
      .build()
      .unwrap();
    let state = detector.state();
    assert!(state.initialized);
    assert_eq!(state.attempts_used, 0);
  }

  #[test]
  fn huge_window_on_virtual_clock_holds_the_tally() {
    let h = Harness::new(huge("rapid_tab_window"));
    for _ in 0..4 {
      h.tab();
    }
    h.clock.advance(Duration::from_secs(86_400));
    assert_eq!(h.detector.state().rapid_tab_count, 4);
  }
}

mod proptests {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    /// The Tab tally equals the presses since the last gap of at least the window.
    #[test]
    fn rapid_tab_decay_matches_model(gaps_ms in proptest::collection::vec(0u64..6_000, 1..30)) {
      let window = Duration::from_secs(3);
      let h = Harness::new(DetectorConfig {
        rapid_tab_window: window,
        rapid_tab_threshold: 1_000,
        ..Default::default()
      });

      let mut expected = 0u32;
      for gap in gaps_ms {
        let gap = Duration::from_millis(gap);
        h.clock.advance(gap);
        if gap >= window {
          expected = 0;
        }
        h.tab();
        expected += 1;
        prop_assert_eq!(h.detector.state().rapid_tab_count, expected);
      }
    }

    /// No input sequence spends more than `max_checks` attempts or fires twice.
    #[test]
    fn budget_and_latch_hold(
      max_checks in 1u32..5,
      events in proptest::collection::vec(0u8..5, 0..60),
    ) {
      let h = Harness::new(DetectorConfig { max_checks, ..Default::default() });
      for event in events {
        match event {
          0 => h.tab(),
          1 => h.key(KeyEvent::new("h")),
          2 => h.key(signature_key()),
          3 => h.focus(FocusTarget::labelled()),
          _ => h.clock.advance(Duration::from_secs(1)),
        }
        let state = h.detector.state();
        prop_assert!(state.attempts_used <= max_checks);
      }
      prop_assert!(h.detections() <= 1);
      prop_assert!(h.prompt.confirm_count() <= 1);
    }
  }
}
