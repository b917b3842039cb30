//! Voice metadata as enumerated from a speech engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Information about an installed engine voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Identifier passed back to the engine when speaking.
    pub id: String,

    /// Human-readable name; configuration refers to voices by this.
    pub name: String,

    /// Language tag as reported by the engine (e.g. `en-US`).
    pub language: String,

    pub quality: VoiceQuality,
}

/// Quality tier of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceQuality {
    #[default]
    Default,
    Enhanced,
    Premium,
    /// A tier the engine reports that chorus does not know about.
    #[serde(other)]
    Unknown,
}

impl VoiceQuality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Enhanced => "enhanced",
            Self::Premium => "premium",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VoiceQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep only voices whose language equals one of `languages`, ignoring case.
///
/// An empty filter keeps every voice.
pub fn filter_by_language(voices: Vec<VoiceInfo>, languages: &[String]) -> Vec<VoiceInfo> {
    if languages.is_empty() {
        return voices;
    }
    voices
        .into_iter()
        .filter(|voice| {
            languages
                .iter()
                .any(|lang| voice.language.eq_ignore_ascii_case(lang))
        })
        .collect()
}

/// Find a voice by exact, case-insensitive name.
///
/// Installed voice names are not ASCII-only (`Amélie`, `Zoë`), so both sides
/// are compared with Unicode lowercasing.
pub fn find_voice_by_name<'a>(voices: &'a [VoiceInfo], name: &str) -> Option<&'a VoiceInfo> {
    let wanted = name.to_lowercase();
    voices.iter().find(|voice| voice.name.to_lowercase() == wanted)
}
