//! Speech adapter error types.

/// Errors raised by speech engines and the queue manager.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The engine process could not be started.
    #[error("Failed to start {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    /// Voice enumeration failed.
    #[error("Failed to list voices: {0}")]
    VoiceListing(String),

    /// A configured voice is not installed (strict voice policy).
    #[error("Channel {channel}: voice '{voice}' is not installed")]
    VoiceNotFound { channel: String, voice: String },

    /// The speech service actor has shut down.
    #[error("Speech service has stopped")]
    ServiceStopped,
}
