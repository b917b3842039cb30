//! Channel registry: the channels built once at startup from settings.

use tracing::{info, warn};

use chorus_core::{
    ChannelKey, ChannelLayout, ChannelRef, DEFAULT_CHANNEL_NAME, Settings, VoiceInfo, VoiceParams,
    VoiceResolutionPolicy, VoiceSettings, find_voice_by_name,
};

use crate::backend::{EngineEventSender, SpeechBackend, SpeechEngine};
use crate::error::SpeechError;

/// A configured channel and its dedicated engine.
pub struct Channel {
    pub key: ChannelKey,
    pub params: VoiceParams,
    pub(crate) engine: Box<dyn SpeechEngine>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("key", &self.key)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Immutable set of channels, addressed by registry slot.
///
/// Slots are positions in the registry. For indexed layouts a slot equals
/// the channel index; for named layouts slots follow the sorted key order.
#[derive(Debug)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
    layout: ChannelLayout,
}

impl ChannelRegistry {
    /// Build the registry from validated settings.
    ///
    /// Every configured voice name is matched against the backend's voices.
    /// A miss aborts under [`VoiceResolutionPolicy::Strict`] and falls back to
    /// the engine default voice otherwise.
    pub async fn build(
        settings: &Settings,
        backend: &dyn SpeechBackend,
        events: &EngineEventSender,
    ) -> Result<Self, SpeechError> {
        let policy = settings.voice_fallback;
        let voices = match backend.voices().await {
            Ok(voices) => voices,
            Err(e) if policy == VoiceResolutionPolicy::Strict => return Err(e),
            Err(e) => {
                warn!(engine = backend.name(), error = %e, "Voice enumeration failed, using engine default voices");
                Vec::new()
            }
        };

        let mut channels = Vec::with_capacity(settings.channels.len());
        for (slot, (key, voice)) in settings.channels.entries().into_iter().enumerate() {
            let params = resolve_params(&key, voice, &voices, policy)?;
            info!(
                channel = %key,
                voice = params.voice.as_deref().unwrap_or("<engine default>"),
                pitch = params.pitch,
                rate = params.rate,
                volume = params.volume,
                "Configured channel"
            );
            channels.push(Channel {
                engine: backend.create_engine(slot, events.clone()),
                key,
                params,
            });
        }

        Ok(Self {
            channels,
            layout: settings.channels.layout(),
        })
    }

    /// Assemble a registry from ready-made channels.
    ///
    /// Each channel's slot is its position in `channels`.
    pub fn from_channels(
        layout: ChannelLayout,
        channels: Vec<(ChannelKey, VoiceParams, Box<dyn SpeechEngine>)>,
    ) -> Self {
        Self {
            channels: channels
                .into_iter()
                .map(|(key, params, engine)| Channel {
                    key,
                    params,
                    engine,
                })
                .collect(),
            layout,
        }
    }

    /// Map a request's channel reference to a registry slot.
    ///
    /// Index references only resolve against indexed layouts and name
    /// references only against named layouts. An unknown name falls back to
    /// the `"default"` channel when one is configured.
    pub fn resolve(&self, reference: &ChannelRef) -> Option<usize> {
        match (self.layout, reference) {
            (ChannelLayout::Indexed, ChannelRef::Index(index)) => usize::try_from(*index)
                .ok()
                .filter(|slot| *slot < self.channels.len()),
            (ChannelLayout::Named, ChannelRef::Name(name)) => {
                self.slot_named(name).or_else(|| self.slot_named(DEFAULT_CHANNEL_NAME))
            }
            _ => None,
        }
    }

    fn slot_named(&self, name: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|channel| matches!(&channel.key, ChannelKey::Name(key) if key == name))
    }

    pub fn get(&self, slot: usize) -> Option<&Channel> {
        self.channels.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub const fn layout(&self) -> ChannelLayout {
        self.layout
    }
}

fn resolve_params(
    key: &ChannelKey,
    voice: &VoiceSettings,
    voices: &[VoiceInfo],
    policy: VoiceResolutionPolicy,
) -> Result<VoiceParams, SpeechError> {
    let resolved = match find_voice_by_name(voices, &voice.voice) {
        Some(info) => Some(info.id.clone()),
        None if policy == VoiceResolutionPolicy::Strict => {
            return Err(SpeechError::VoiceNotFound {
                channel: key.to_string(),
                voice: voice.voice.clone(),
            });
        }
        None => {
            warn!(channel = %key, voice = %voice.voice, "Voice not installed, using engine default");
            None
        }
    };

    Ok(VoiceParams {
        pitch: voice.pitch,
        rate: voice.rate,
        volume: voice.volume,
        voice: resolved,
    })
}
