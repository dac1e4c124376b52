/*! Prompt surface implementations. */

use super::PromptSurface;

/// Prompt that answers every confirmation with a fixed value and logs alerts.
///
/// Useful for headless hosts that relay the decision elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct StaticPrompt {
  answer: bool,
}

impl StaticPrompt {
  /// Always confirm.
  pub const fn accept() -> Self {
    Self { answer: true }
  }

  /// Always decline.
  pub const fn decline() -> Self {
    Self { answer: false }
  }
}

impl Default for StaticPrompt {
  fn default() -> Self {
    Self::decline()
  }
}

impl PromptSurface for StaticPrompt {
  fn confirm(&self, message: &str) -> bool {
    log::debug!("[prompt] confirm({message:?}) -> {}", self.answer);
    self.answer
  }

  fn alert(&self, message: &str) {
    log::info!("[prompt] {message}");
  }
}
