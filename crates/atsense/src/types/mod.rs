/*! Core types for atsense.

Web-facing types derive `TS`; regenerate TypeScript bindings with `cargo test`.
*/

#![allow(missing_docs)]

mod error;
mod event;
mod ids;
mod input;
mod preferences;
mod state;

pub use error::{AtsenseError, AtsenseResult};
pub use event::Event;
pub use ids::{ListenerId, TimerId};
pub use input::{FocusTarget, InputEvent, KeyEvent};
pub use preferences::AccessibilityPreferences;
pub use state::{DetectorState, Verdict};
