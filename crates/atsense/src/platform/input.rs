/*! In-process input event source. */

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{InputListener, InputSource};
use crate::types::{InputEvent, ListenerId};

/// Fan-out input source. The host pushes events with [`InputBus::dispatch`].
///
/// Clone is cheap (Arc bumps); clones share listeners and load state.
#[derive(Clone, Default)]
pub struct InputBus {
  listeners: Arc<Mutex<Vec<(ListenerId, InputListener)>>>,
  loaded: Arc<AtomicBool>,
}

impl std::fmt::Debug for InputBus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InputBus")
      .field("listeners", &self.listener_count())
      .field("loaded", &self.loaded.load(Ordering::SeqCst))
      .finish()
  }
}

impl InputBus {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bus whose page has already loaded.
  pub fn loaded() -> Self {
    let bus = Self::default();
    bus.loaded.store(true, Ordering::SeqCst);
    bus
  }

  /// Deliver an event to every listener in registration order.
  ///
  /// A `Load` event marks the bus loaded before it is delivered.
  /// Listeners are called without the bus lock held, so they may
  /// register or remove listeners.
  pub fn dispatch(&self, event: &InputEvent) {
    if matches!(event, InputEvent::Load) {
      self.loaded.store(true, Ordering::SeqCst);
    }

    let listeners: Vec<InputListener> = self
      .listeners
      .lock()
      .iter()
      .map(|(_, listener)| Arc::clone(listener))
      .collect();

    for listener in listeners {
      listener(event);
    }
  }

  /// Number of registered listeners.
  pub fn listener_count(&self) -> usize {
    self.listeners.lock().len()
  }
}

impl InputSource for InputBus {
  fn listen(&self, listener: InputListener) -> ListenerId {
    let id = ListenerId::next();
    self.listeners.lock().push((id, listener));
    id
  }

  fn unlisten(&self, id: ListenerId) {
    self.listeners.lock().retain(|(existing, _)| *existing != id);
  }

  fn is_loaded(&self) -> bool {
    self.loaded.load(Ordering::SeqCst)
  }
}
