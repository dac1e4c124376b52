/*!
Verdict actuator: host callback, confirmation prompt, opt-out persistence
and notifications. Never runs with the state lock held.

Collaborator failures are logged and swallowed so nothing escapes into the host's
event handling.
*/

use super::Shared;
use crate::config::DISABLED_ACK_MESSAGE;
use crate::types::{DetectorState, Event};

/// Value stored under the opt-out key.
const OPT_OUT_VALUE: &str = "true";

impl Shared {
  /// Side effects of the one positive verdict.
  pub(crate) fn actuate(&self, view: &DetectorState) {
    log::info!(
      "[actuator] screen reader detected after {} attempt(s)",
      view.attempts_used
    );

    if let Some(on_detect) = &self.config.on_detect {
      on_detect(view);
    }
    self.emit(Event::Detected(*view));

    if !self.config.show_confirm_dialog {
      return;
    }
    if self.is_disabled_by_user() {
      log::debug!("[actuator] already opted out, not prompting");
      return;
    }

    if self.prompt.confirm(&self.config.alert_message) {
      self.persist_opt_out();
      self.emit(Event::ScreenReaderDisabled(self.snapshot()));
    } else {
      log::info!("[actuator] user kept the built-in screen reader");
    }
  }

  pub(crate) fn is_disabled_by_user(&self) -> bool {
    match self.store.get(&self.config.storage_key) {
      Ok(value) => value.as_deref() == Some(OPT_OUT_VALUE),
      Err(e) => {
        log::warn!("[actuator] reading preference failed, assuming not set: {e}");
        false
      }
    }
  }

  pub(crate) fn disable_builtin(&self) {
    self.persist_opt_out();
    self.emit(Event::ScreenReaderDisabled(self.snapshot()));
    self.prompt.alert(DISABLED_ACK_MESSAGE);
  }

  pub(crate) fn enable_builtin(&self) {
    if let Err(e) = self.store.remove(&self.config.storage_key) {
      log::warn!("[actuator] clearing preference failed: {e}");
    }
    log::info!("[actuator] built-in screen reader enabled");
    self.emit(Event::ScreenReaderEnabled(self.snapshot()));
  }

  fn persist_opt_out(&self) {
    if let Err(e) = self.store.set(&self.config.storage_key, OPT_OUT_VALUE) {
      log::warn!("[actuator] saving preference failed: {e}");
    }
    log::info!("[actuator] built-in screen reader disabled");
  }

  /// Publish to subscribers. No subscribers is not an error.
  pub(crate) fn emit(&self, event: Event) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!("Event channel overflow - notification dropped");
      }
    }
  }
}
