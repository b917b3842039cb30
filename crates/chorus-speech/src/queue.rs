//! Per-channel speech queues.
//!
//! [`SpeechQueues`] is a plain state machine: it owns the channel registry
//! and one FIFO per channel, and is driven by `schedule`, `stop_speaking`
//! and engine events. It is not thread-safe on its own;
//! [`SpeechService`](crate::service::SpeechService) serialises every call
//! through a single actor task.
//!
//! # Channel states
//!
//! | State      | Queue     | Engine                                   |
//! |------------|-----------|------------------------------------------|
//! | `Idle`     | empty     | nothing submitted                        |
//! | `Speaking` | non-empty | head submitted, no event observed for it |
//!
//! Utterance identities come from a monotonically increasing sequence, so a
//! completion event is matched against the head by identity, never by text.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use chorus_core::{ChannelKey, PreemptionScope, UtteranceId, UtteranceRequest};

use crate::backend::{EngineEvent, EngineOutcome, EngineUtterance};
use crate::registry::ChannelRegistry;

/// Externally observable state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Speaking,
}

/// An utterance waiting in (or at the head of) a channel queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledUtterance {
    pub id: UtteranceId,
    pub text: String,
}

/// Snapshot of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub key: ChannelKey,
    pub state: ChannelState,
    /// Identity of the utterance being spoken.
    pub head: Option<UtteranceId>,
    /// Items in the queue, head included.
    pub pending: usize,
}

/// Outcome of a [`SpeechQueues::schedule`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleSummary {
    pub accepted: usize,
    pub dropped: usize,
    /// Channels whose in-flight speech was cancelled.
    pub cancelled: usize,
}

/// The speech queue manager.
pub struct SpeechQueues {
    registry: ChannelRegistry,
    preemption: PreemptionScope,
    queues: Vec<VecDeque<ScheduledUtterance>>,
    next_id: UtteranceId,
}

impl SpeechQueues {
    pub fn new(registry: ChannelRegistry, preemption: PreemptionScope) -> Self {
        let queues = (0..registry.len()).map(|_| VecDeque::new()).collect();
        Self {
            registry,
            preemption,
            queues,
            next_id: UtteranceId::new(1),
        }
    }

    /// Replace pending speech with `requests`.
    ///
    /// Requests are partitioned by channel in batch order; requests whose
    /// channel does not resolve are dropped. Speaking channels are cancelled
    /// according to the preemption scope: all of them for
    /// [`PreemptionScope::Global`], only those receiving new items for
    /// [`PreemptionScope::Channel`]. Each channel with new items then starts
    /// speaking its first one.
    pub fn schedule(&mut self, requests: Vec<UtteranceRequest>) -> ScheduleSummary {
        let mut batches: Vec<VecDeque<ScheduledUtterance>> =
            (0..self.queues.len()).map(|_| VecDeque::new()).collect();
        let mut summary = ScheduleSummary::default();

        for request in requests {
            let Some(slot) = self.registry.resolve(&request.channel) else {
                debug!(
                    target: "chorus.speech",
                    channel = %request.channel,
                    "Dropping request for unknown channel"
                );
                summary.dropped += 1;
                continue;
            };
            let id = self.allocate_id();
            batches[slot].push_back(ScheduledUtterance {
                id,
                text: request.text,
            });
            summary.accepted += 1;
        }

        for (slot, batch) in batches.iter().enumerate() {
            let preempt = match self.preemption {
                PreemptionScope::Global => true,
                PreemptionScope::Channel => !batch.is_empty(),
            };
            if preempt && self.cancel(slot) {
                summary.cancelled += 1;
            }
        }

        for (slot, batch) in batches.into_iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            self.queues[slot] = batch;
            self.start_head(slot);
        }

        info!(
            target: "chorus.speech",
            accepted = summary.accepted,
            dropped = summary.dropped,
            cancelled = summary.cancelled,
            "Scheduled speech"
        );
        summary
    }

    /// Cancel every in-flight utterance and empty every queue.
    ///
    /// Returns the number of channels that were speaking.
    pub fn stop_speaking(&mut self) -> usize {
        let cancelled = (0..self.queues.len())
            .filter(|&slot| self.cancel(slot))
            .count();
        if cancelled > 0 {
            info!(target: "chorus.speech", channels = cancelled, "Stopped speaking");
        }
        cancelled
    }

    /// Dispatch an engine event.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event.outcome {
            EngineOutcome::Finished => self.on_utterance_finished(event.slot, event.utterance),
            EngineOutcome::Cancelled => self.on_utterance_cancelled(event.slot, event.utterance),
        }
    }

    /// Advance `slot` if `id` is still its head; otherwise ignore.
    pub fn on_utterance_finished(&mut self, slot: usize, id: UtteranceId) {
        let Some(queue) = self.queues.get_mut(slot) else {
            warn!(target: "chorus.speech", slot, utterance = %id, "Event for unknown channel slot");
            return;
        };

        if queue.front().is_none_or(|head| head.id != id) {
            debug!(target: "chorus.speech", slot, utterance = %id, "Ignoring stale completion");
            return;
        }

        queue.pop_front();
        debug!(target: "chorus.speech", slot, utterance = %id, remaining = queue.len(), "Finished utterance");
        self.start_head(slot);
    }

    /// Cancellation acknowledgements never advance a queue.
    pub fn on_utterance_cancelled(&self, slot: usize, id: UtteranceId) {
        debug!(target: "chorus.speech", slot, utterance = %id, "Utterance cancelled");
    }

    pub fn snapshot(&self) -> Vec<ChannelStatus> {
        self.registry
            .iter()
            .zip(&self.queues)
            .map(|(channel, queue)| ChannelStatus {
                key: channel.key.clone(),
                state: if queue.is_empty() {
                    ChannelState::Idle
                } else {
                    ChannelState::Speaking
                },
                head: queue.front().map(|head| head.id),
                pending: queue.len(),
            })
            .collect()
    }

    fn allocate_id(&mut self) -> UtteranceId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Stop `slot` if it is speaking and clear its queue.
    fn cancel(&mut self, slot: usize) -> bool {
        let Some(queue) = self.queues.get_mut(slot) else {
            return false;
        };
        if queue.is_empty() {
            return false;
        }

        if let Some(channel) = self.registry.get(slot) {
            channel.engine.stop();
        }
        debug!(target: "chorus.speech", slot, discarded = queue.len(), "Cancelled channel");
        queue.clear();
        true
    }

    /// Submit the head of `slot`, skipping items the engine refuses.
    fn start_head(&mut self, slot: usize) {
        let Some(channel) = self.registry.get(slot) else {
            return;
        };
        let queue = &mut self.queues[slot];

        while let Some(head) = queue.front() {
            let utterance = EngineUtterance {
                id: head.id,
                text: head.text.clone(),
                params: channel.params.engine_params(),
            };
            match channel.engine.speak(utterance) {
                Ok(()) => {
                    debug!(target: "chorus.speech", channel = %channel.key, utterance = %head.id, "Submitted utterance");
                    return;
                }
                Err(e) => {
                    warn!(
                        target: "chorus.speech",
                        channel = %channel.key,
                        utterance = %head.id,
                        error = %e,
                        "Failed to start utterance, skipping"
                    );
                    queue.pop_front();
                }
            }
        }

        debug!(target: "chorus.speech", channel = %channel.key, "Channel idle");
    }
}
