//! Speech engine backend traits: engine-agnostic interfaces for speaking.
//!
//! A [`SpeechBackend`] is a speech engine installation: it can enumerate its
//! voices and create one [`SpeechEngine`] per channel. Engines start speaking
//! without blocking and report back through an [`EngineEvent`] stream that
//! the queue manager consumes.
//!
//! ## Backend implementations
//!
//! | Engine      | Module     | Program     |
//! |-------------|------------|-------------|
//! | `say`       | [`say`]    | `say`       |
//! | `espeak`    | [`espeak`] | `espeak-ng` |

pub mod espeak;
pub mod process;
pub mod say;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use chorus_core::{EngineKind, EngineParams, UtteranceId, VoiceInfo};

use crate::error::SpeechError;

pub use espeak::EspeakFlavor;
pub use process::{EngineFlavor, ProcessBackend, ProcessEngine};
pub use say::SayFlavor;

// ── Events ─────────────────────────────────────────────────────────

/// How a submitted utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutcome {
    /// The engine spoke the utterance to the end.
    Finished,
    /// The utterance was stopped before it ended.
    Cancelled,
}

/// Completion or cancellation of one utterance on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineEvent {
    /// Registry slot of the channel whose engine produced the event.
    pub slot: usize,
    pub utterance: UtteranceId,
    pub outcome: EngineOutcome,
}

/// Sending half of the engine event stream.
pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;

/// Receiving half of the engine event stream.
pub type EngineEventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

// ── Engine trait ───────────────────────────────────────────────────

/// Text plus parameters handed to an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineUtterance {
    pub id: UtteranceId,
    pub text: String,
    pub params: EngineParams,
}

/// A single channel's speech engine.
///
/// Implementations speak at most one utterance at a time and emit exactly
/// one [`EngineEvent`] for every utterance accepted by [`speak`](Self::speak).
pub trait SpeechEngine: Send + Sync {
    /// Start speaking and return immediately.
    ///
    /// An `Err` means the utterance was never started and no event will
    /// follow for it.
    fn speak(&self, utterance: EngineUtterance) -> Result<(), SpeechError>;

    /// Stop the in-flight utterance, if any. Never blocks.
    fn stop(&self);
}

// ── Backend trait ──────────────────────────────────────────────────

/// A speech engine installation.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Short engine name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Enumerate installed voices.
    async fn voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;

    /// Create the engine for the channel in registry slot `slot`.
    fn create_engine(&self, slot: usize, events: EngineEventSender) -> Box<dyn SpeechEngine>;
}

/// Create the backend for `kind`, optionally overriding the executable path.
pub fn backend_for(kind: EngineKind, program: Option<PathBuf>) -> Arc<dyn SpeechBackend> {
    match kind {
        EngineKind::Say => Arc::new(ProcessBackend::new(SayFlavor::new(program))),
        EngineKind::Espeak => Arc::new(ProcessBackend::new(EspeakFlavor::new(program))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_for_selects_engine() {
        assert_eq!(backend_for(EngineKind::Say, None).name(), "say");
        assert_eq!(
            backend_for(EngineKind::Espeak, Some("/opt/espeak/bin/espeak-ng".into())).name(),
            "espeak"
        );
    }
}
