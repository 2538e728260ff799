use std::io;

use thiserror::Error;

use crate::session::SessionState;

/// Errors raised by the scoring and session core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Game parameters that would produce an empty or impractically large code universe.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Two codes of different lengths were compared. Always a caller bug.
    #[error("Length mismatch: expected {expected} symbols, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A guess was submitted to a session that has already ended.
    #[error("Session already finished ({state:?})")]
    SessionFinished { state: SessionState },
}

impl EngineError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Errors raised while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Settings serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
