//! `SpeechService`, the adapter that implements `SpeechQueuePort`.
//!
//! # Concurrency
//!
//! The [`SpeechQueues`] state machine is owned by a single tokio task. HTTP
//! requests reach it through a command channel and engines reach it through
//! the engine event channel; the task handles one message at a time, so a
//! completion event can never interleave with a `schedule` call. Nothing in
//! the task awaits I/O: starting an utterance spawns a process and stopping
//! one sends a signal to its watcher.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use chorus_core::{Settings, SpeechPortError, SpeechQueuePort, UtteranceRequest};

use crate::backend::{EngineEventReceiver, SpeechBackend};
use crate::error::SpeechError;
use crate::queue::{ChannelStatus, SpeechQueues};
use crate::registry::ChannelRegistry;

enum QueueCommand {
    Schedule(Vec<UtteranceRequest>),
    StopSpeaking,
    Snapshot(oneshot::Sender<Vec<ChannelStatus>>),
}

/// Handle to the speech queue actor. Cheap to clone.
///
/// The actor stops all speech and exits once every handle is dropped.
#[derive(Clone)]
pub struct SpeechService {
    commands: mpsc::UnboundedSender<QueueCommand>,
}

impl SpeechService {
    /// Build the channel registry from `settings` and start the actor.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn spawn(
        settings: &Settings,
        backend: &dyn SpeechBackend,
    ) -> Result<Self, SpeechError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let registry = ChannelRegistry::build(settings, backend, &events_tx).await?;
        info!(
            engine = backend.name(),
            channels = registry.len(),
            preemption = ?settings.preemption,
            "Speech service ready"
        );
        Ok(Self::start(
            SpeechQueues::new(registry, settings.preemption),
            events_rx,
        ))
    }

    /// Start the actor over an existing state machine.
    ///
    /// `events` must be the receiving end of the channel the registry's
    /// engines were created with.
    pub fn start(queues: SpeechQueues, events: EngineEventReceiver) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(queues, commands_rx, events));
        Self {
            commands: commands_tx,
        }
    }

    /// Current state of every channel.
    pub async fn snapshot(&self) -> Result<Vec<ChannelStatus>, SpeechError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(QueueCommand::Snapshot(reply_tx))
            .map_err(|_| SpeechError::ServiceStopped)?;
        reply_rx.await.map_err(|_| SpeechError::ServiceStopped)
    }

    fn send(&self, command: QueueCommand) -> Result<(), SpeechPortError> {
        self.commands
            .send(command)
            .map_err(|_| SpeechPortError::Stopped)
    }
}

#[async_trait]
impl SpeechQueuePort for SpeechService {
    async fn schedule(&self, requests: Vec<UtteranceRequest>) -> Result<(), SpeechPortError> {
        self.send(QueueCommand::Schedule(requests))
    }

    async fn stop_speaking(&self) -> Result<(), SpeechPortError> {
        self.send(QueueCommand::StopSpeaking)
    }
}

async fn run(
    mut queues: SpeechQueues,
    mut commands: mpsc::UnboundedReceiver<QueueCommand>,
    mut events: EngineEventReceiver,
) {
    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    QueueCommand::Schedule(requests) => {
                        queues.schedule(requests);
                    }
                    QueueCommand::StopSpeaking => {
                        queues.stop_speaking();
                    }
                    QueueCommand::Snapshot(reply) => {
                        // Caller gave up waiting.
                        let _ = reply.send(queues.snapshot());
                    }
                }
            }
            Some(event) = events.recv() => queues.handle_event(event),
        }
    }

    queues.stop_speaking();
    debug!("Speech service stopped");
}
