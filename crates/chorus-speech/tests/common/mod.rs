//! Recording speech engines shared by the queue and service tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chorus_core::{
    ChannelKey, ChannelLayout, EngineParams, PreemptionScope, UtteranceId, VoiceInfo, VoiceParams,
    VoiceQuality,
};
use chorus_speech::{
    ChannelRegistry, EngineEvent, EngineEventSender, EngineOutcome, EngineUtterance,
    SpeechBackend, SpeechEngine, SpeechError, SpeechQueues,
};

/// One call made on an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Speak {
        slot: usize,
        id: UtteranceId,
        text: String,
        params: EngineParams,
    },
    Stop {
        slot: usize,
    },
}

/// Shared log of engine calls across every channel.
///
/// Also tracks which utterance each slot has in flight and panics if an
/// engine is asked to speak while it still has one.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    in_flight: Arc<Mutex<HashMap<usize, UtteranceId>>>,
    refuse: Arc<Mutex<HashSet<String>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Texts spoken on `slot`, in order.
    pub fn spoken(&self, slot: usize) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Speak { slot: s, text, .. } if s == slot => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn stops(&self, slot: usize) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Stop { slot: s } if *s == slot))
            .count()
    }

    pub fn in_flight(&self, slot: usize) -> Option<UtteranceId> {
        self.in_flight.lock().unwrap().get(&slot).copied()
    }

    /// Make engines fail to start utterances with this text.
    pub fn refuse(&self, text: &str) {
        self.refuse.lock().unwrap().insert(text.to_string());
    }

    /// Mark the in-flight utterance of `slot` as done and return its id.
    pub fn complete(&self, slot: usize) -> UtteranceId {
        self.in_flight
            .lock()
            .unwrap()
            .remove(&slot)
            .unwrap_or_else(|| panic!("nothing in flight on slot {slot}"))
    }

    pub fn engine(&self, slot: usize) -> RecordingEngine {
        RecordingEngine {
            slot,
            recorder: self.clone(),
            events: None,
        }
    }

    /// Engine that reports `Finished` as soon as it starts speaking.
    pub fn finishing_engine(&self, slot: usize, events: EngineEventSender) -> RecordingEngine {
        RecordingEngine {
            slot,
            recorder: self.clone(),
            events: Some(events),
        }
    }
}

pub struct RecordingEngine {
    slot: usize,
    recorder: Recorder,
    events: Option<EngineEventSender>,
}

impl SpeechEngine for RecordingEngine {
    fn speak(&self, utterance: EngineUtterance) -> Result<(), SpeechError> {
        if self.recorder.refuse.lock().unwrap().contains(&utterance.text) {
            return Err(SpeechError::SpawnFailed {
                program: "recording".into(),
                reason: "refused".into(),
            });
        }

        let previous = self
            .recorder
            .in_flight
            .lock()
            .unwrap()
            .insert(self.slot, utterance.id);
        assert!(
            previous.is_none(),
            "slot {} asked to speak {} while {:?} is in flight",
            self.slot,
            utterance.id,
            previous
        );

        self.recorder.calls.lock().unwrap().push(Call::Speak {
            slot: self.slot,
            id: utterance.id,
            text: utterance.text,
            params: utterance.params,
        });

        if let Some(events) = &self.events {
            self.recorder.in_flight.lock().unwrap().remove(&self.slot);
            events
                .send(EngineEvent {
                    slot: self.slot,
                    utterance: utterance.id,
                    outcome: EngineOutcome::Finished,
                })
                .unwrap();
        }
        Ok(())
    }

    fn stop(&self) {
        self.recorder
            .calls
            .lock()
            .unwrap()
            .push(Call::Stop { slot: self.slot });
        let taken = self.recorder.in_flight.lock().unwrap().remove(&self.slot);
        if let (Some(id), Some(events)) = (taken, &self.events) {
            let _ = events.send(EngineEvent {
                slot: self.slot,
                utterance: id,
                outcome: EngineOutcome::Cancelled,
            });
        }
    }
}

pub fn neutral_params() -> VoiceParams {
    VoiceParams {
        pitch: 1.0,
        rate: 1.0,
        volume: 1.0,
        voice: None,
    }
}

/// Queues over `count` indexed channels with recording engines.
pub fn indexed_queues(count: usize, scope: PreemptionScope) -> (SpeechQueues, Recorder) {
    let recorder = Recorder::default();
    let channels = (0..count)
        .map(|slot| {
            (
                ChannelKey::Index(slot),
                neutral_params(),
                Box::new(recorder.engine(slot)) as Box<dyn SpeechEngine>,
            )
        })
        .collect();
    let registry = ChannelRegistry::from_channels(ChannelLayout::Indexed, channels);
    (SpeechQueues::new(registry, scope), recorder)
}

/// Queues over named channels (slots follow the order of `names`).
pub fn named_queues(names: &[&str]) -> (SpeechQueues, Recorder) {
    let recorder = Recorder::default();
    let channels = names
        .iter()
        .enumerate()
        .map(|(slot, name)| {
            (
                ChannelKey::Name((*name).to_string()),
                neutral_params(),
                Box::new(recorder.engine(slot)) as Box<dyn SpeechEngine>,
            )
        })
        .collect();
    let registry = ChannelRegistry::from_channels(ChannelLayout::Named, channels);
    (SpeechQueues::new(registry, PreemptionScope::Global), recorder)
}

/// Backend whose engines finish every utterance immediately.
pub struct FinishingBackend {
    pub recorder: Recorder,
    pub voices: Vec<VoiceInfo>,
}

impl FinishingBackend {
    pub fn new(voice_names: &[&str]) -> Self {
        Self {
            recorder: Recorder::default(),
            voices: voice_names
                .iter()
                .map(|name| VoiceInfo {
                    id: (*name).to_string(),
                    name: (*name).to_string(),
                    language: "en-US".to_string(),
                    quality: VoiceQuality::Default,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SpeechBackend for FinishingBackend {
    fn name(&self) -> &'static str {
        "finishing"
    }

    async fn voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        Ok(self.voices.clone())
    }

    fn create_engine(&self, slot: usize, events: EngineEventSender) -> Box<dyn SpeechEngine> {
        Box::new(self.recorder.finishing_engine(slot, events))
    }
}
