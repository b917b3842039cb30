//! `espeak-ng` flavour.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use chorus_core::{EngineParams, VoiceInfo, VoiceQuality};

use super::process::EngineFlavor;

/// Words per minute at engine rate 1.0 (espeak-ng's default is 175).
const MAX_WORDS_PER_MINUTE: f32 = 350.0;

/// Drives `espeak-ng --stdin`.
pub struct EspeakFlavor {
    program: PathBuf,
}

impl EspeakFlavor {
    pub fn new(program: Option<PathBuf>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("espeak-ng")),
        }
    }
}

impl EngineFlavor for EspeakFlavor {
    const NAME: &'static str = "espeak";

    fn program(&self) -> &Path {
        &self.program
    }

    fn speak_command(&self, params: &EngineParams) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("--stdin");
        if let Some(voice) = &params.voice {
            command.arg("-v").arg(voice);
        }
        command
            .arg("-p")
            .arg(format!("{:.0}", (params.pitch * 50.0).clamp(0.0, 99.0)))
            .arg("-s")
            .arg(format!("{:.0}", params.rate * MAX_WORDS_PER_MINUTE))
            .arg("-a")
            .arg(format!("{:.0}", params.volume * 100.0));
        command
    }

    fn list_voices_args(&self) -> &'static [&'static str] {
        &["--voices"]
    }

    fn parse_voices(&self, listing: &str) -> Vec<VoiceInfo> {
        listing
            .lines()
            .skip(1)
            .filter_map(|line| {
                let columns: Vec<&str> = line.split_whitespace().collect();
                let language = *columns.get(1)?;
                let name = *columns.get(3)?;
                Some(VoiceInfo {
                    id: language.to_string(),
                    name: name.to_string(),
                    language: language.to_string(),
                    quality: VoiceQuality::Default,
                })
            })
            .collect()
    }
}
