#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ChannelKey, ChannelRef, DEFAULT_CHANNEL_NAME, EngineParams, UtteranceId, UtteranceRequest,
    VoiceInfo, VoiceParams, VoiceQuality, filter_by_language, find_voice_by_name,
};
pub use paths::{
    CONFIG_ENV_VAR, PathError, SETTINGS_FILE_NAME, SettingsPathResolution, SettingsPathSource,
    config_root, resolve_settings_path, resolve_settings_path_from, settings_path,
};
pub use ports::{SpeechPortError, SpeechQueuePort};
pub use settings::{
    ChannelLayout, ChannelSettings, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_VOICE, EngineKind,
    PreemptionScope, Settings, SettingsError, VoiceResolutionPolicy, VoiceSettings, load_settings,
    parse_settings, validate_settings,
};

// Silence unused dev-dependency warnings for the unit test build
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
