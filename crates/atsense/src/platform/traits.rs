/*!
Collaborator traits.

These traits define the contract between the detector core and the host.
The host supplies implementations at construction; core code only uses these
traits and never reaches for ambient globals.
*/

use std::sync::Arc;
use std::time::Duration;

use crate::types::{AccessibilityPreferences, AtsenseResult, InputEvent, ListenerId, TimerId};

/// Key-value store for the user's opt-out preference.
///
/// Errors are never surfaced by the detector: a failed read counts as
/// "no preference", a failed write is logged and ignored.
pub trait PreferenceStore: Send + Sync {
  /// Read a value. `Ok(None)` if the key is absent.
  fn get(&self, key: &str) -> AtsenseResult<Option<String>>;

  /// Write a value.
  fn set(&self, key: &str, value: &str) -> AtsenseResult<()>;

  /// Remove a value. Removing an absent key is not an error.
  fn remove(&self, key: &str) -> AtsenseResult<()>;
}

/// Blocking dialog surface.
pub trait PromptSurface: Send + Sync {
  /// Ask a yes/no question. `true` means yes.
  fn confirm(&self, message: &str) -> bool;

  /// Show a message that only needs acknowledgement.
  fn alert(&self, message: &str);
}

/// Source of platform accessibility preferences.
///
/// Sampled on every decision attempt while the detector state is locked,
/// so implementations must be cheap and must not call back into the detector.
pub trait PreferenceProbe: Send + Sync {
  /// Current preference flags.
  fn preferences(&self) -> AccessibilityPreferences;
}

/// Callback registered with an [`InputSource`].
pub type InputListener = Arc<dyn Fn(&InputEvent) + Send + Sync>;

/// Host event source (keyboard, focus, page load).
pub trait InputSource: Send + Sync {
  /// Register a listener. Listeners fire in registration order.
  fn listen(&self, listener: InputListener) -> ListenerId;

  /// Remove a listener. Unknown IDs are ignored.
  fn unlisten(&self, id: ListenerId);

  /// Whether the page has already finished loading.
  fn is_loaded(&self) -> bool;
}

/// Work run when a timer fires.
pub type Task = Box<dyn FnOnce() + Send>;

/// One-shot timer service (the logical clock the core depends on).
pub trait Scheduler: Send + Sync {
  /// Run `task` once after `delay`. Must not run `task` before returning.
  fn schedule(&self, delay: Duration, task: Task) -> TimerId;

  /// Cancel a pending timer. Cancelling a fired or unknown timer is a no-op.
  fn cancel(&self, id: TimerId);
}

// Shared handles: hosts keep an `Arc` to inspect a collaborator after handing it over.

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
  fn get(&self, key: &str) -> AtsenseResult<Option<String>> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &str) -> AtsenseResult<()> {
    (**self).set(key, value)
  }

  fn remove(&self, key: &str) -> AtsenseResult<()> {
    (**self).remove(key)
  }
}

impl<T: PromptSurface + ?Sized> PromptSurface for Arc<T> {
  fn confirm(&self, message: &str) -> bool {
    (**self).confirm(message)
  }

  fn alert(&self, message: &str) {
    (**self).alert(message);
  }
}

impl<T: PreferenceProbe + ?Sized> PreferenceProbe for Arc<T> {
  fn preferences(&self) -> AccessibilityPreferences {
    (**self).preferences()
  }
}

impl<T: InputSource + ?Sized> InputSource for Arc<T> {
  fn listen(&self, listener: InputListener) -> ListenerId {
    (**self).listen(listener)
  }

  fn unlisten(&self, id: ListenerId) {
    (**self).unlisten(id);
  }

  fn is_loaded(&self) -> bool {
    (**self).is_loaded()
  }
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
  fn schedule(&self, delay: Duration, task: Task) -> TimerId {
    (**self).schedule(delay, task)
  }

  fn cancel(&self, id: TimerId) {
    (**self).cancel(id);
  }
}
