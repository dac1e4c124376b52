/*!
Core detector - owns all detection state and event broadcasting.

# Module Structure

- `mod.rs` - Detector struct, builder, public API, state access
- `counters.rs` - rapid-tab, quick-nav and annotated-focus tallies
- `snapshot.rs` - accessibility preference sampling
- `policy.rs` - latch + budget + threshold rule
- `router.rs` - input routing, decay timers, initial check, init/destroy
- `actuator.rs` - callback, confirmation, opt-out persistence, notifications

# Example

```
use atsense::{Detector, DetectorConfig, InputBus, KeyEvent, ManualScheduler};

let input = InputBus::loaded();
let clock = ManualScheduler::new();
let detector = Detector::builder()
    .config(DetectorConfig { show_confirm_dialog: false, ..Default::default() })
    .input(input.clone())
    .scheduler(clock.clone())
    .build()
    .unwrap();

for _ in 0..5 {
    input.dispatch(&KeyEvent::new("Tab").into());
}
assert!(detector.is_detected());
```
*/

mod actuator;
mod counters;
mod policy;
mod router;
mod snapshot;

use async_broadcast::{InactiveReceiver, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::{DetectCallback, DetectorConfig};
use crate::platform::{
  InputBus, InputSource, MemoryStore, PreferenceProbe, PreferenceStore, PromptSurface, Scheduler,
  StaticProbe, StaticPrompt,
};
use crate::scheduler::ThreadScheduler;
use crate::types::{AtsenseResult, DetectorState, Event, InputEvent, ListenerId, TimerId, Verdict};
use counters::SignalCounters;
use policy::DecisionState;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Progress of the one-shot post-load check.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitialCheck {
  /// `init()` has not run.
  #[default]
  Idle,
  /// Waiting for the page to finish loading.
  AwaitingLoad,
  /// Delay timer armed.
  Scheduled(TimerId),
  /// Ran, or cancelled by teardown.
  Done,
}

#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
  pub(crate) initialized: bool,
  pub(crate) destroyed: bool,
  pub(crate) loaded: bool,
  pub(crate) listener: Option<ListenerId>,
  pub(crate) initial_check: InitialCheck,
}

/// Everything behind the state lock.
#[derive(Debug, Default)]
pub(crate) struct Engine {
  pub(crate) counters: SignalCounters,
  pub(crate) decision: DecisionState,
  pub(crate) lifecycle: Lifecycle,
}

impl Engine {
  pub(crate) const fn snapshot(&self) -> DetectorState {
    DetectorState {
      detected: self.decision.detected(),
      attempts_used: self.decision.attempts_used(),
      rapid_tab_count: self.counters.rapid_tab_count(),
      quick_nav_count: self.counters.quick_nav_count(),
      aria_focus_count: self.counters.aria_focus_count(),
      initialized: self.lifecycle.initialized,
      destroyed: self.lifecycle.destroyed,
    }
  }
}

/// State and collaborators shared with listeners and timers.
///
/// Listeners and timers hold `Weak` references, so they no-op once the
/// detector is gone.
pub(crate) struct Shared {
  pub(crate) config: DetectorConfig,
  state: Mutex<Engine>,
  store: Arc<dyn PreferenceStore>,
  prompt: Arc<dyn PromptSurface>,
  probe: Arc<dyn PreferenceProbe>,
  scheduler: Arc<dyn Scheduler>,
  input: Arc<dyn InputSource>,
  events_tx: Sender<Event>,
  events_keepalive: InactiveReceiver<Event>,
}

impl Shared {
  /// Lock state. Never call collaborators that may re-enter the detector inside the closure.
  #[inline]
  pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
    f(&mut self.state.lock())
  }

  pub(crate) fn snapshot(&self) -> DetectorState {
    self.with_state(|engine| engine.snapshot())
  }
}

/// Screen reader detector.
///
/// Listens to the input source from `init()` until `destroy()` or drop.
/// All methods take `&self`; the detector may be shared across threads.
pub struct Detector {
  shared: Arc<Shared>,
}

impl std::fmt::Debug for Detector {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Detector")
      .field("state", &self.state())
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a detector and its collaborators.
///
/// Unset collaborators default to: in-memory store, a prompt that declines,
/// a probe reporting no preferences, a private input bus (feed it through
/// [`Detector::handle_input`]) and a real-time [`ThreadScheduler`].
#[must_use = "Builder does nothing until .build() is called"]
#[derive(Default)]
pub struct DetectorBuilder {
  config: DetectorConfig,
  store: Option<Arc<dyn PreferenceStore>>,
  prompt: Option<Arc<dyn PromptSurface>>,
  probe: Option<Arc<dyn PreferenceProbe>>,
  scheduler: Option<Arc<dyn Scheduler>>,
  input: Option<Arc<dyn InputSource>>,
}

impl std::fmt::Debug for DetectorBuilder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DetectorBuilder")
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl DetectorBuilder {
  /// Replace the whole configuration.
  pub fn config(mut self, config: DetectorConfig) -> Self {
    self.config = config;
    self
  }

  /// Callback invoked once on a positive verdict.
  pub fn on_detect(mut self, callback: impl Fn(&DetectorState) + Send + Sync + 'static) -> Self {
    let callback: DetectCallback = Arc::new(callback);
    self.config.on_detect = Some(callback);
    self
  }

  /// Bind listeners during `build()`. Default: true.
  pub fn auto_init(mut self, auto_init: bool) -> Self {
    self.config.auto_init = auto_init;
    self
  }

  pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
    self.store = Some(Arc::new(store));
    self
  }

  pub fn prompt(mut self, prompt: impl PromptSurface + 'static) -> Self {
    self.prompt = Some(Arc::new(prompt));
    self
  }

  pub fn probe(mut self, probe: impl PreferenceProbe + 'static) -> Self {
    self.probe = Some(Arc::new(probe));
    self
  }

  pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
    self.scheduler = Some(Arc::new(scheduler));
    self
  }

  pub fn input(mut self, input: impl InputSource + 'static) -> Self {
    self.input = Some(Arc::new(input));
    self
  }

  /// Validate the configuration and build the detector.
  ///
  /// With `auto_init` set, listeners are bound and the initial check is scheduled.
  #[must_use = "Detector must be stored; dropping it tears it down"]
  pub fn build(self) -> AtsenseResult<Detector> {
    self.config.validate()?;

    let (mut tx, rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    tx.set_overflow(true); // Drop oldest messages when full

    let auto_init = self.config.auto_init;
    let shared = Shared {
      config: self.config,
      state: Mutex::new(Engine::default()),
      store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
      prompt: self.prompt.unwrap_or_else(|| Arc::new(StaticPrompt::decline())),
      probe: self.probe.unwrap_or_else(|| Arc::new(StaticProbe::default())),
      scheduler: self.scheduler.unwrap_or_else(|| Arc::new(ThreadScheduler::new())),
      input: self.input.unwrap_or_else(|| Arc::new(InputBus::new())),
      events_tx: tx,
      events_keepalive: rx.deactivate(),
    };

    let detector = Detector {
      shared: Arc::new(shared),
    };
    if auto_init {
      detector.init();
    }
    Ok(detector)
  }
}

impl Detector {
  /// Create a detector with default collaborators.
  pub fn new(config: DetectorConfig) -> AtsenseResult<Self> {
    Self::builder().config(config).build()
  }

  /// Create a builder for configuring a new detector.
  pub fn builder() -> DetectorBuilder {
    DetectorBuilder::default()
  }

  /// Bind the input listener and schedule the post-load check.
  ///
  /// Idempotent. A no-op after `destroy()`.
  pub fn init(&self) {
    self.shared.init();
  }

  /// Route one input event as if it came from the input source.
  ///
  /// Ignored after `destroy()`.
  pub fn handle_input(&self, event: &InputEvent) {
    self.shared.route(event);
  }

  /// Run one guarded evaluation now (same latch and budget as event-driven checks).
  pub fn check(&self) -> Verdict {
    self.shared.check()
  }

  /// Whether the user has opted out of the built-in screen reader.
  pub fn is_disabled_by_user(&self) -> bool {
    self.shared.is_disabled_by_user()
  }

  /// Opt out of the built-in screen reader, notify subscribers, acknowledge to the user.
  pub fn disable_builtin_screen_reader(&self) {
    self.shared.disable_builtin();
  }

  /// Clear the opt-out and notify subscribers.
  pub fn enable_builtin_screen_reader(&self) {
    self.shared.enable_builtin();
  }

  /// Whether a positive verdict has been reached.
  pub fn is_detected(&self) -> bool {
    self.shared.with_state(|engine| engine.decision.detected())
  }

  /// Copy of the current counters and flags.
  pub fn state(&self) -> DetectorState {
    self.shared.snapshot()
  }

  /// The configuration this detector was built with.
  pub fn config(&self) -> &DetectorConfig {
    &self.shared.config
  }

  /// Subscribe to notifications from this detector.
  pub fn subscribe(&self) -> Receiver<Event> {
    self.shared.events_keepalive.activate_cloned()
  }

  /// Remove listeners and cancel pending timers. Idempotent, safe before `init()`.
  pub fn destroy(&self) {
    self.shared.destroy();
  }
}

impl Drop for Detector {
  fn drop(&mut self) {
    self.shared.destroy();
  }
}
