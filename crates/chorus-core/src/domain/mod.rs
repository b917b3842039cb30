//! Domain types for channels, utterances and voices.
//!
//! These are pure data types with no infrastructure dependencies. Speech
//! engines and transports convert to and from them at their own boundaries.

pub mod channel;
pub mod utterance;
pub mod voice;

pub use channel::{ChannelKey, ChannelRef, DEFAULT_CHANNEL_NAME, EngineParams, VoiceParams};
pub use utterance::{UtteranceId, UtteranceRequest};
pub use voice::{VoiceInfo, VoiceQuality, filter_by_language, find_voice_by_name};
