//! macOS `say` flavour.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use chorus_core::{EngineParams, VoiceInfo, VoiceQuality};

use super::process::EngineFlavor;

/// Words per minute at engine rate 1.0.
const MAX_WORDS_PER_MINUTE: f32 = 350.0;

/// Pitch base `say` uses for a pitch multiplier of 1.0.
const PITCH_BASE: f32 = 50.0;

/// Drives `/usr/bin/say`.
pub struct SayFlavor {
    program: PathBuf,
}

impl SayFlavor {
    pub fn new(program: Option<PathBuf>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("say")),
        }
    }
}

impl EngineFlavor for SayFlavor {
    const NAME: &'static str = "say";

    fn program(&self) -> &Path {
        &self.program
    }

    fn speak_command(&self, params: &EngineParams) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(voice) = &params.voice {
            command.arg("-v").arg(voice);
        }
        command
            .arg("-r")
            .arg(format!("{:.0}", params.rate * MAX_WORDS_PER_MINUTE));
        command
    }

    /// Volume and pitch have no flags; they travel as embedded commands.
    fn stdin_text(&self, text: &str, params: &EngineParams) -> String {
        format!(
            "[[volm {:.2}]] [[pbas {:.0}]] {text}",
            params.volume,
            params.pitch * PITCH_BASE
        )
    }

    fn list_voices_args(&self) -> &'static [&'static str] {
        &["-v", "?"]
    }

    fn parse_voices(&self, listing: &str) -> Vec<VoiceInfo> {
        listing.lines().filter_map(parse_voice_line).collect()
    }
}

/// Parse one line of `say -v ?`:
///
/// ```text
/// Samantha            en_US    # Hello, my name is Samantha.
/// Zoe (Premium)       en_US    # Hello, my name is Zoe.
/// ```
fn parse_voice_line(line: &str) -> Option<VoiceInfo> {
    let description = line.split_once('#').map_or(line, |(head, _)| head).trim();
    let (name, language) = description.rsplit_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let quality = if name.ends_with("(Premium)") {
        VoiceQuality::Premium
    } else if name.ends_with("(Enhanced)") {
        VoiceQuality::Enhanced
    } else {
        VoiceQuality::Default
    };

    Some(VoiceInfo {
        id: name.to_string(),
        name: name.to_string(),
        language: language.replace('_', "-"),
        quality,
    })
}
