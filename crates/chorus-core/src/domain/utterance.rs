//! Utterance requests and identities.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::channel::ChannelRef;

/// One item of a `POST /speak` batch: a piece of text bound to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceRequest {
    pub channel: ChannelRef,
    pub text: String,
}

impl UtteranceRequest {
    pub fn new(channel: ChannelRef, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
        }
    }
}

/// Identity of a scheduled utterance.
///
/// Assigned from a monotonically increasing sequence when the utterance is
/// queued. Engines echo it back in completion and cancellation events, so
/// two utterances with identical text are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtteranceId(u64);

impl UtteranceId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identity following this one in the sequence.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}
