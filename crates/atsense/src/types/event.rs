/*! Notifications published to subscribers. */

use super::DetectorState;
use serde::Serialize;
use ts_rs::TS;

/// Events emitted by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  // Initial sync (sent by bridges on connection)
  #[serde(rename = "sync:init")]
  SyncInit(DetectorState),

  // Positive verdict reached (fires once per detector)
  #[serde(rename = "detection:positive")]
  Detected(DetectorState),

  // Built-in screen reader preference changes
  #[serde(rename = "screen_reader:disabled")]
  ScreenReaderDisabled(DetectorState),
  #[serde(rename = "screen_reader:enabled")]
  ScreenReaderEnabled(DetectorState),
}

impl Event {
  /// Wire name of this event.
  pub const fn name(&self) -> &'static str {
    match self {
      Self::SyncInit(_) => "sync:init",
      Self::Detected(_) => "detection:positive",
      Self::ScreenReaderDisabled(_) => "screen_reader:disabled",
      Self::ScreenReaderEnabled(_) => "screen_reader:enabled",
    }
  }

  /// State carried by the event.
  pub const fn state(&self) -> &DetectorState {
    match self {
      Self::SyncInit(state)
      | Self::Detected(state)
      | Self::ScreenReaderDisabled(state)
      | Self::ScreenReaderEnabled(state) => state,
    }
  }
}
