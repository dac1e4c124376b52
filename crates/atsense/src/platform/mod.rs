/*!
Host collaborators: traits plus reference implementations.

The reference implementations cover tests and simple hosts. Real hosts
(a browser bridge, a desktop app) implement the traits themselves.
*/

mod input;
mod probe;
mod prompt;
mod store;
mod traits;

pub use input::InputBus;
pub use probe::{SharedProbe, StaticProbe};
pub use prompt::StaticPrompt;
pub use store::{JsonFileStore, MemoryStore, UnavailableStore};
pub use traits::{
  InputListener, InputSource, PreferenceProbe, PreferenceStore, PromptSurface, Scheduler, Task,
};
