/*!
atsense - infer whether a visitor is running a third-party screen reader.

Passively watches keyboard and focus input plus the platform's accessibility
preferences, and reaches one yes/no verdict so a host can avoid running its
own built-in screen reader on top of the user's. Best effort: it never
identifies which assistive technology is present.

```ignore
use atsense::{Detector, DetectorConfig, InputBus, KeyEvent};

// Create a detector (listeners bind and the post-load check is scheduled)
let input = InputBus::new();
let detector = Detector::builder()
    .config(DetectorConfig::default())
    .input(input.clone())
    .on_detect(|state| println!("detected: {state:?}"))
    .build()?;

// Feed host events
input.dispatch(&atsense::InputEvent::Load);
input.dispatch(&KeyEvent::new("Tab").into());

// Subscribe to notifications
let mut events = detector.subscribe();
while let Ok(event) = events.recv().await {
    // screen_reader:disabled, screen_reader:enabled, detection:positive
}

// Listeners detach when the detector is dropped
drop(detector);
```
*/

mod config;
mod core;
mod platform;
mod scheduler;

mod types;
pub use types::*;

pub use crate::config::{
  DetectCallback, DetectorConfig, ARIA_FOCUS_THRESHOLD, DEFAULT_ALERT_MESSAGE,
  DEFAULT_STORAGE_KEY, DISABLED_ACK_MESSAGE, QUICK_NAV_DECAY,
};
pub use crate::core::{Detector, DetectorBuilder};
pub use crate::platform::{
  InputBus, InputListener, InputSource, JsonFileStore, MemoryStore, PreferenceProbe,
  PreferenceStore, PromptSurface, Scheduler, SharedProbe, StaticProbe, StaticPrompt, Task,
  UnavailableStore,
};
pub use crate::scheduler::{ManualScheduler, ThreadScheduler};

#[cfg(test)]
mod tests;
