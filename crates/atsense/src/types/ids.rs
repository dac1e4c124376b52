/*! Branded ID types for timers and listeners. */

use derive_more::{Display, From, Into};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct TimerId(pub u64);

/// Identifier of a registered input listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct ListenerId(pub u64);

/// Shared counter for ID generation. Starts at 1 (0 could be confused with "null").
static ID_COUNTER: AtomicU64 = AtomicU64::new(1);

impl TimerId {
  /// Generate a new unique `TimerId`.
  pub fn next() -> Self {
    Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}

impl ListenerId {
  /// Generate a new unique `ListenerId`.
  pub fn next() -> Self {
    Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}
