//! Channel identity and voice parameters.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the fallback channel used by named layouts when a request names
/// a channel that is not configured.
pub const DEFAULT_CHANNEL_NAME: &str = "default";

/// A channel reference as it appears in a speak request.
///
/// Any JSON integer decodes as an index, so that an unusable one is dropped
/// by the bounds check instead of failing the whole batch. Integers outside
/// the `i64` range saturate to `i64::MIN` or `i64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ChannelRef {
    /// Position in an indexed channel layout.
    Index(i64),
    /// Key in a named channel layout.
    Name(String),
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl<'de> Deserialize<'de> for ChannelRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ChannelRefVisitor)
    }
}

struct ChannelRefVisitor;

impl Visitor<'_> for ChannelRefVisitor {
    type Value = ChannelRef;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer channel index or a channel name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ChannelRef::Index(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ChannelRef::Index(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    // Integer literals too large for u64/i64 arrive as floats.
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() && v.fract() == 0.0 {
            if v >= i64::MAX as f64 {
                return Ok(ChannelRef::Index(i64::MAX));
            }
            if v <= i64::MIN as f64 {
                return Ok(ChannelRef::Index(i64::MIN));
            }
        }
        Err(E::invalid_type(de::Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ChannelRef::Name(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ChannelRef::Name(v))
    }
}

/// Stable identity of a configured channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ChannelKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Immutable voice parameters of a channel after voice resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    /// Pitch multiplier (1.0 = engine default).
    pub pitch: f32,
    /// Configured speaking rate (1.0 = normal).
    pub rate: f32,
    /// Volume (0.0 = silent, 1.0 = full).
    pub volume: f32,
    /// Resolved engine voice identifier, or `None` for the engine default.
    pub voice: Option<String>,
}

impl VoiceParams {
    /// Convert to the parameters handed to a speech engine.
    ///
    /// The engine rate scale is half the configured one: a configured rate
    /// of 1.0 is the engine's normal rate of 0.5.
    #[must_use]
    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            pitch: self.pitch,
            rate: self.rate / 2.0,
            volume: self.volume,
            voice: self.voice.clone(),
        }
    }
}

/// Engine-ready parameters for a single utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    pub pitch: f32,
    /// Engine rate in `0.0..=1.0`, 0.5 being the normal speaking rate.
    pub rate: f32,
    pub volume: f32,
    pub voice: Option<String>,
}
