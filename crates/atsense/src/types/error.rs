/*! Error types for atsense operations. */

/// Errors that can occur while building a detector or talking to a collaborator.
///
/// Only construction and configuration loading surface these to callers.
/// Collaborator failures during event handling are logged and swallowed.
#[derive(Debug, thiserror::Error)]
pub enum AtsenseError {
  /// A configuration value is outside its allowed range.
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  /// A configuration file could not be read or parsed.
  #[error("Failed to load configuration: {0}")]
  ConfigLoad(String),

  /// The preference store backend is not available.
  #[error("Preference storage unavailable: {0}")]
  StorageUnavailable(String),

  /// The preference store failed to read or write its backing file.
  #[error("Preference storage I/O failed: {0}")]
  StorageIo(#[from] std::io::Error),

  /// The preference store's backing data is malformed.
  #[error("Preference storage is malformed: {0}")]
  StorageFormat(#[from] serde_json::Error),
}

/// Result type for atsense operations.
pub type AtsenseResult<T> = Result<T, AtsenseError>;
