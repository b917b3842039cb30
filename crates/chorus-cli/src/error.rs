//! CLI-specific error types and mappings.

use thiserror::Error;

use chorus_core::{PathError, SettingsError};
use chorus_speech::SpeechError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Anything without a more specific category.
    #[error("{0}")]
    General(String),

    /// IO error (settings file unreadable, engine missing, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    ///
    /// Usage errors (2) never reach this type: clap reports them and exits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::General(_) => 1,
            Self::Io(_) => 74,     // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Read { .. } => Self::Io(err.to_string()),
            _ => Self::Config(err.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SpeechError> for CliError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::VoiceNotFound { .. } => Self::Config(err.to_string()),
            SpeechError::SpawnFailed { .. } => Self::Io(err.to_string()),
            SpeechError::VoiceListing(_) | SpeechError::ServiceStopped => {
                Self::General(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for CliError {
    /// Server errors arrive as `anyhow`; recover the speech error if there is one.
    fn from(err: anyhow::Error) -> Self {
        let message = format!("{err:#}");
        match err.downcast_ref::<SpeechError>() {
            Some(SpeechError::VoiceNotFound { .. }) => Self::Config(message),
            Some(SpeechError::SpawnFailed { .. }) => Self::Io(message),
            _ => Self::General(message),
        }
    }
}
