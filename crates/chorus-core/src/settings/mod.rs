//! Settings domain types and validation.
//!
//! The settings file is JSON. Every field is optional and falls back to a
//! default, so `{}` is a complete configuration with one indexed channel.

mod file;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::ChannelKey;

pub use file::{load_settings, parse_settings};

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 1729;

/// Default listen address. The daemon is local by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Voice requested by a channel that does not name one.
pub const DEFAULT_VOICE: &str = "Samantha";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Port for the HTTP server.
    pub port: u16,

    /// Address the HTTP server binds to.
    pub host: String,

    /// Channel definitions, as an array (indexed) or an object (named).
    pub channels: ChannelSettings,

    /// What to do when a channel's voice is not installed.
    pub voice_fallback: VoiceResolutionPolicy,

    /// Which channels a new batch cancels.
    pub preemption: PreemptionScope,

    /// Speech engine driving every channel.
    pub engine: EngineKind,

    /// Explicit path to the engine executable (defaults to a `PATH` lookup).
    pub engine_binary: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            channels: ChannelSettings::default(),
            voice_fallback: VoiceResolutionPolicy::default(),
            preemption: PreemptionScope::default(),
            engine: EngineKind::platform_default(),
            engine_binary: None,
        }
    }
}

/// Per-channel voice configuration as written in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
    /// Voice name, matched case-insensitively against the engine's voices.
    pub voice: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            pitch: 1.0,
            rate: 1.0,
            volume: 1.0,
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

/// The two channel layouts a settings file may use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelSettings {
    /// `"channels": [{...}, {...}]`, addressed by position.
    Indexed(Vec<VoiceSettings>),
    /// `"channels": {"left": {...}, "default": {...}}`, addressed by key.
    Named(BTreeMap<String, VoiceSettings>),
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self::Indexed(vec![VoiceSettings::default()])
    }
}

/// How channel references are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Indexed,
    Named,
}

impl ChannelSettings {
    #[must_use]
    pub const fn layout(&self) -> ChannelLayout {
        match self {
            Self::Indexed(_) => ChannelLayout::Indexed,
            Self::Named(_) => ChannelLayout::Named,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Indexed(list) => list.len(),
            Self::Named(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Channel keys paired with their voice settings, in a stable order.
    pub fn entries(&self) -> Vec<(ChannelKey, &VoiceSettings)> {
        match self {
            Self::Indexed(list) => list
                .iter()
                .enumerate()
                .map(|(index, voice)| (ChannelKey::Index(index), voice))
                .collect(),
            Self::Named(map) => map
                .iter()
                .map(|(name, voice)| (ChannelKey::Name(name.clone()), voice))
                .collect(),
        }
    }
}

/// Policy for a configured voice that the engine does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceResolutionPolicy {
    /// Abort startup with a diagnostic.
    Strict,
    /// Log a warning and let the engine pick its default voice.
    #[default]
    EngineDefault,
}

/// Which channels a `schedule` call cancels before installing new queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreemptionScope {
    /// Every speaking channel, whether or not the batch mentions it.
    #[default]
    Global,
    /// Only channels that receive at least one item in the batch.
    Channel,
}

/// Speech engine implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// macOS `say`.
    Say,
    /// `espeak-ng`.
    Espeak,
}

impl EngineKind {
    /// `say` on macOS, `espeak-ng` everywhere else.
    #[must_use]
    pub const fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::Say
        } else {
            Self::Espeak
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::Espeak => "espeak",
        }
    }
}

/// Settings validation and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Port must be non-zero")]
    InvalidPort,

    #[error("Host cannot be empty")]
    EmptyHost,

    #[error("At least one channel must be configured")]
    NoChannels,

    #[error("Channel names cannot be empty")]
    EmptyChannelName,

    #[error("Channel {channel}: pitch must be between 0.5 and 2.0, got {value}")]
    InvalidPitch { channel: ChannelKey, value: f32 },

    #[error("Channel {channel}: rate must be between 0.0 and 2.0, got {value}")]
    InvalidRate { channel: ChannelKey, value: f32 },

    #[error("Channel {channel}: volume must be between 0.0 and 1.0, got {value}")]
    InvalidVolume { channel: ChannelKey, value: f32 },

    #[error("Channel {channel}: voice name cannot be empty")]
    EmptyVoice { channel: ChannelKey },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.port == 0 {
        return Err(SettingsError::InvalidPort);
    }

    if settings.host.trim().is_empty() {
        return Err(SettingsError::EmptyHost);
    }

    if settings.channels.is_empty() {
        return Err(SettingsError::NoChannels);
    }

    for (channel, voice) in settings.channels.entries() {
        if matches!(&channel, ChannelKey::Name(name) if name.trim().is_empty()) {
            return Err(SettingsError::EmptyChannelName);
        }
        if !(0.5..=2.0).contains(&voice.pitch) {
            return Err(SettingsError::InvalidPitch {
                channel,
                value: voice.pitch,
            });
        }
        if !(0.0..=2.0).contains(&voice.rate) {
            return Err(SettingsError::InvalidRate {
                channel,
                value: voice.rate,
            });
        }
        if !(0.0..=1.0).contains(&voice.volume) {
            return Err(SettingsError::InvalidVolume {
                channel,
                value: voice.volume,
            });
        }
        if voice.voice.trim().is_empty() {
            return Err(SettingsError::EmptyVoice { channel });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.port, 1729);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.channels.len(), 1);
        assert_eq!(settings.voice_fallback, VoiceResolutionPolicy::EngineDefault);
        assert_eq!(settings.preemption, PreemptionScope::Global);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_indexed_channel_entries() {
        let channels = ChannelSettings::Indexed(vec![VoiceSettings::default(); 2]);
        let keys: Vec<_> = channels.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![ChannelKey::Index(0), ChannelKey::Index(1)]);
        assert_eq!(channels.layout(), ChannelLayout::Indexed);
    }

    #[test]
    fn test_named_channel_entries_are_sorted() {
        let mut map = BTreeMap::new();
        map.insert("right".to_string(), VoiceSettings::default());
        map.insert("left".to_string(), VoiceSettings::default());
        let channels = ChannelSettings::Named(map);

        let keys: Vec<_> = channels.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                ChannelKey::Name("left".into()),
                ChannelKey::Name("right".into())
            ]
        );
        assert_eq!(channels.layout(), ChannelLayout::Named);
    }

    #[test]
    fn test_validate_pitch_range() {
        let mut settings = Settings::default();
        settings.channels = ChannelSettings::Indexed(vec![VoiceSettings {
            pitch: 3.0,
            ..VoiceSettings::default()
        }]);
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidPitch { value, .. }) if value == 3.0
        ));
    }

    #[test]
    fn test_validate_volume_range() {
        let mut settings = Settings::default();
        settings.channels = ChannelSettings::Indexed(vec![
            VoiceSettings::default(),
            VoiceSettings {
                volume: 1.5,
                ..VoiceSettings::default()
            },
        ]);
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidVolume {
                channel: ChannelKey::Index(1),
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_nan_rate() {
        let mut settings = Settings::default();
        settings.channels = ChannelSettings::Indexed(vec![VoiceSettings {
            rate: f32::NAN,
            ..VoiceSettings::default()
        }]);
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_validate_empty_channel_list() {
        let mut settings = Settings::default();
        settings.channels = ChannelSettings::Indexed(Vec::new());
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::NoChannels)
        ));
    }

    #[test]
    fn test_validate_empty_voice_and_port() {
        let mut settings = Settings::default();
        settings.port = 0;
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidPort)
        ));

        let mut settings = Settings::default();
        settings.channels = ChannelSettings::Indexed(vec![VoiceSettings {
            voice: "  ".into(),
            ..VoiceSettings::default()
        }]);
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyVoice { .. })
        ));
    }

    #[test]
    fn test_engine_kind_wire_names() {
        let kind: EngineKind = serde_json::from_str(r#""espeak""#).unwrap();
        assert_eq!(kind, EngineKind::Espeak);
        assert_eq!(EngineKind::Say.as_str(), "say");
    }
}
