//! Process-driven speech engine.
//!
//! Each utterance runs one engine process. The text is written to the
//! process's stdin, the process exiting means the utterance finished, and
//! stopping kills it. [`EngineFlavor`] supplies the engine-specific command
//! line and voice listing; everything else is shared.

use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use chorus_core::{EngineParams, UtteranceId, VoiceInfo};

use super::{
    EngineEvent, EngineEventSender, EngineOutcome, EngineUtterance, SpeechBackend, SpeechEngine,
};
use crate::error::SpeechError;

// ── Flavor trait ───────────────────────────────────────────────────

/// Engine-specific parts of a process-driven backend.
pub trait EngineFlavor: Send + Sync + 'static {
    /// Engine name reported by [`SpeechBackend::name`].
    const NAME: &'static str;

    /// Executable to run.
    fn program(&self) -> &Path;

    /// Command speaking one utterance whose text arrives on stdin.
    fn speak_command(&self, params: &EngineParams) -> Command;

    /// Text written to the process's stdin.
    fn stdin_text(&self, text: &str, _params: &EngineParams) -> String {
        text.to_string()
    }

    /// Arguments that make the program print its voice list.
    fn list_voices_args(&self) -> &'static [&'static str];

    /// Parse the output produced by [`list_voices_args`](Self::list_voices_args).
    fn parse_voices(&self, listing: &str) -> Vec<VoiceInfo>;
}

// ── Backend ────────────────────────────────────────────────────────

/// [`SpeechBackend`] running one process per utterance.
pub struct ProcessBackend<F> {
    flavor: Arc<F>,
}

impl<F: EngineFlavor> ProcessBackend<F> {
    pub fn new(flavor: F) -> Self {
        Self {
            flavor: Arc::new(flavor),
        }
    }
}

#[async_trait]
impl<F: EngineFlavor> SpeechBackend for ProcessBackend<F> {
    fn name(&self) -> &'static str {
        F::NAME
    }

    async fn voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let program = self.flavor.program();
        let output = Command::new(program)
            .args(self.flavor.list_voices_args())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| SpeechError::SpawnFailed {
                program: program.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::VoiceListing(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        let voices = self.flavor.parse_voices(&listing);
        debug!(engine = F::NAME, count = voices.len(), "Enumerated voices");
        Ok(voices)
    }

    fn create_engine(&self, slot: usize, events: EngineEventSender) -> Box<dyn SpeechEngine> {
        Box::new(ProcessEngine::new(slot, Arc::clone(&self.flavor), events))
    }
}

// ── Engine ─────────────────────────────────────────────────────────

/// The utterance currently owned by an engine.
struct InFlight {
    id: UtteranceId,
    cancel: oneshot::Sender<()>,
}

/// [`SpeechEngine`] for one channel, running one child process at a time.
pub struct ProcessEngine<F> {
    slot: usize,
    flavor: Arc<F>,
    events: EngineEventSender,
    in_flight: Arc<Mutex<Option<InFlight>>>,
}

impl<F: EngineFlavor> ProcessEngine<F> {
    pub fn new(slot: usize, flavor: Arc<F>, events: EngineEventSender) -> Self {
        Self {
            slot,
            flavor,
            events,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }
}

impl<F: EngineFlavor> SpeechEngine for ProcessEngine<F> {
    fn speak(&self, utterance: EngineUtterance) -> Result<(), SpeechError> {
        // One process per channel.
        self.stop();

        let mut command = self.flavor.speak_command(&utterance.params);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| SpeechError::SpawnFailed {
            program: self.flavor.program().display().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(stdin) = child.stdin.take() {
            let text = self.flavor.stdin_text(&utterance.text, &utterance.params);
            tokio::spawn(feed_stdin(stdin, text));
        }

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *lock(&self.in_flight) = Some(InFlight {
            id: utterance.id,
            cancel: cancel_tx,
        });

        debug!(
            engine = F::NAME,
            slot = self.slot,
            utterance = %utterance.id,
            pid = ?child.id(),
            "Started utterance"
        );

        tokio::spawn(watch_child(Watch {
            child,
            cancel_rx,
            slot: self.slot,
            id: utterance.id,
            in_flight: Arc::clone(&self.in_flight),
            events: self.events.clone(),
        }));

        Ok(())
    }

    fn stop(&self) {
        let taken = lock(&self.in_flight).take();
        if let Some(in_flight) = taken {
            debug!(engine = F::NAME, slot = self.slot, utterance = %in_flight.id, "Stopping utterance");
            // The watcher may have exited already; nothing to cancel then.
            let _ = in_flight.cancel.send(());
        }
    }
}

fn lock(in_flight: &Mutex<Option<InFlight>>) -> MutexGuard<'_, Option<InFlight>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn feed_stdin(mut stdin: ChildStdin, text: String) {
    if let Err(e) = stdin.write_all(text.as_bytes()).await {
        // Broken pipe when the process was killed before reading.
        debug!(error = %e, "Failed to write utterance text");
        return;
    }
    if let Err(e) = stdin.shutdown().await {
        debug!(error = %e, "Failed to close engine stdin");
    }
}

struct Watch {
    child: Child,
    cancel_rx: oneshot::Receiver<()>,
    slot: usize,
    id: UtteranceId,
    in_flight: Arc<Mutex<Option<InFlight>>>,
    events: EngineEventSender,
}

/// Wait for the process to exit or be cancelled, then report exactly once.
async fn watch_child(watch: Watch) {
    let Watch {
        mut child,
        mut cancel_rx,
        slot,
        id,
        in_flight,
        events,
    } = watch;

    let outcome = tokio::select! {
        status = child.wait() => {
            match status {
                Ok(status) if !status.success() => {
                    warn!(slot, utterance = %id, %status, "Speech engine exited with failure");
                }
                Err(e) => warn!(slot, utterance = %id, error = %e, "Failed to wait for speech engine"),
                Ok(_) => {}
            }
            EngineOutcome::Finished
        }
        // A dropped sender also means the utterance was taken away.
        _ = &mut cancel_rx => {
            if let Err(e) = child.kill().await {
                debug!(slot, utterance = %id, error = %e, "Speech engine already gone");
            }
            EngineOutcome::Cancelled
        }
    };

    {
        let mut guard = lock(&in_flight);
        if guard.as_ref().is_some_and(|f| f.id == id) {
            *guard = None;
        }
    }

    let event = EngineEvent {
        slot,
        utterance: id,
        outcome,
    };
    if events.send(event).is_err() {
        debug!(slot, utterance = %id, "Engine event receiver dropped");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use super::*;

    /// Runs an arbitrary program with fixed arguments.
    struct FixedFlavor {
        program: PathBuf,
        args: Vec<&'static str>,
    }

    impl FixedFlavor {
        fn new(program: &str, args: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                program: PathBuf::from(program),
                args: args.to_vec(),
            })
        }
    }

    impl EngineFlavor for FixedFlavor {
        const NAME: &'static str = "fixed";

        fn program(&self) -> &Path {
            &self.program
        }

        fn speak_command(&self, _params: &EngineParams) -> Command {
            let mut command = Command::new(&self.program);
            command.args(&self.args);
            command
        }

        fn list_voices_args(&self) -> &'static [&'static str] {
            &[]
        }

        fn parse_voices(&self, _listing: &str) -> Vec<VoiceInfo> {
            Vec::new()
        }
    }

    fn utterance(id: u64) -> EngineUtterance {
        EngineUtterance {
            id: UtteranceId::new(id),
            text: "hello".to_string(),
            params: EngineParams {
                pitch: 1.0,
                rate: 0.5,
                volume: 1.0,
                voice: None,
            },
        }
    }

    /// Identity of the utterance `engine` is currently speaking.
    fn current<F: EngineFlavor>(engine: &ProcessEngine<F>) -> Option<UtteranceId> {
        lock(&engine.in_flight).as_ref().map(|f| f.id)
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> EngineEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for engine event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn process_exit_reports_finished() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = ProcessEngine::new(3, FixedFlavor::new("cat", &[]), tx);

        engine.speak(utterance(1)).unwrap();
        let event = next_event(&mut rx).await;

        assert_eq!(event.slot, 3);
        assert_eq!(event.utterance, UtteranceId::new(1));
        assert_eq!(event.outcome, EngineOutcome::Finished);
        assert_eq!(current(&engine), None);
    }

    #[tokio::test]
    async fn stop_kills_and_reports_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = ProcessEngine::new(0, FixedFlavor::new("sleep", &["30"]), tx);

        engine.speak(utterance(7)).unwrap();
        assert_eq!(current(&engine), Some(UtteranceId::new(7)));

        engine.stop();
        let event = next_event(&mut rx).await;
        assert_eq!(event.utterance, UtteranceId::new(7));
        assert_eq!(event.outcome, EngineOutcome::Cancelled);

        // Idempotent.
        engine.stop();
        assert_eq!(current(&engine), None);
    }

    #[tokio::test]
    async fn speaking_again_cancels_the_previous_process() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = ProcessEngine::new(0, FixedFlavor::new("sleep", &["30"]), tx);

        engine.speak(utterance(1)).unwrap();
        engine.speak(utterance(2)).unwrap();

        let event = next_event(&mut rx).await;
        assert_eq!(event.utterance, UtteranceId::new(1));
        assert_eq!(event.outcome, EngineOutcome::Cancelled);
        assert_eq!(current(&engine), Some(UtteranceId::new(2)));

        engine.stop();
        assert_eq!(next_event(&mut rx).await.utterance, UtteranceId::new(2));
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = ProcessEngine::new(
            0,
            FixedFlavor::new("/nonexistent/chorus-speech-engine", &[]),
            tx,
        );

        let err = engine.speak(utterance(1)).unwrap_err();
        assert!(matches!(err, SpeechError::SpawnFailed { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn non_zero_exit_still_counts_as_finished() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = ProcessEngine::new(0, FixedFlavor::new("false", &[]), tx);

        engine.speak(utterance(4)).unwrap();
        assert_eq!(next_event(&mut rx).await.outcome, EngineOutcome::Finished);
    }
}
