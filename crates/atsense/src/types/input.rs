/*! Raw input events delivered by the host. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A key-down event.
///
/// `key` follows the web `KeyboardEvent.key` naming (`"Tab"`, `"ArrowDown"`, `"h"`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KeyEvent {
  pub key: String,
  #[serde(default)]
  pub ctrl: bool,
  #[serde(default)]
  pub alt: bool,
  #[serde(default)]
  pub shift: bool,
  #[serde(default)]
  pub meta: bool,
}

impl KeyEvent {
  /// Key press with no modifiers held.
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      ..Self::default()
    }
  }

  #[must_use]
  pub const fn with_ctrl(mut self) -> Self {
    self.ctrl = true;
    self
  }

  #[must_use]
  pub const fn with_alt(mut self) -> Self {
    self.alt = true;
    self
  }

  #[must_use]
  pub const fn with_shift(mut self) -> Self {
    self.shift = true;
    self
  }

  #[must_use]
  pub const fn with_meta(mut self) -> Self {
    self.meta = true;
    self
  }

  /// Whether a command modifier (ctrl, alt or meta) is held. Shift is not one.
  pub const fn has_command_modifier(&self) -> bool {
    self.ctrl || self.alt || self.meta
  }
}

/// The element that received focus, reduced to its accessibility annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FocusTarget {
  /// Element carries an accessible label (`aria-label`, `aria-labelledby`).
  #[serde(default)]
  pub has_label: bool,
  /// Element references a description (`aria-describedby`).
  #[serde(default)]
  pub has_description: bool,
  /// Explicit role attribute, if any.
  #[serde(default)]
  pub role: Option<String>,
}

impl FocusTarget {
  /// Focus target without any annotation.
  pub fn plain() -> Self {
    Self::default()
  }

  /// Focus target with an accessible label.
  pub fn labelled() -> Self {
    Self {
      has_label: true,
      ..Self::default()
    }
  }

  /// Focus target with an explicit role.
  pub fn with_role(role: impl Into<String>) -> Self {
    Self {
      role: Some(role.into()),
      ..Self::default()
    }
  }

  /// Whether the element carries a label, a description reference, or an explicit role.
  pub fn is_annotated(&self) -> bool {
    self.has_label || self.has_description || self.role.as_deref().is_some_and(|r| !r.is_empty())
  }
}

/// Events the router consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum InputEvent {
  /// A key went down.
  KeyDown(KeyEvent),
  /// Focus moved to an element.
  Focus(FocusTarget),
  /// The page finished loading.
  Load,
}

impl From<KeyEvent> for InputEvent {
  fn from(key: KeyEvent) -> Self {
    Self::KeyDown(key)
  }
}

impl From<FocusTarget> for InputEvent {
  fn from(target: FocusTarget) -> Self {
    Self::Focus(target)
  }
}
