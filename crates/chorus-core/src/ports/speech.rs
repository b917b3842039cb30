//! Speech queue port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UtteranceRequest;

// ── Errors ───────────────────────────────────────────────────────────────────

/// Errors surfaced by [`SpeechQueuePort`] implementations.
#[derive(Debug, Error)]
pub enum SpeechPortError {
    /// The queue manager is no longer running.
    #[error("Speech queue manager has stopped")]
    Stopped,
}

// ── Port trait ───────────────────────────────────────────────────────────────

/// Entry point into the speech queue manager.
///
/// Implemented by `SpeechService` in `chorus-speech`, consumed by the
/// `POST /speak` handler. Both operations return once the request has been
/// handed to the manager; they never wait for speech to finish.
#[async_trait]
pub trait SpeechQueuePort: Send + Sync {
    /// Replace the pending speech with `requests`.
    ///
    /// Items whose channel cannot be resolved are dropped silently. The
    /// remaining items are queued per channel in batch order.
    async fn schedule(&self, requests: Vec<UtteranceRequest>) -> Result<(), SpeechPortError>;

    /// Cancel everything currently speaking and clear every queue.
    async fn stop_speaking(&self) -> Result<(), SpeechPortError>;
}
