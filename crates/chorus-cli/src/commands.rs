//! Commands enum and its arguments.

use clap::{Subcommand, ValueEnum};

use chorus_core::EngineKind;

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load settings and serve the speech endpoint (the default)
    Serve {
        /// Port to listen on, overriding the settings file
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },

    /// List installed voices
    Voices {
        /// Only show voices for these language codes (e.g. en-US)
        languages: Vec<String>,

        /// Speech engine to query (defaults to the platform engine)
        #[arg(short, long, value_enum)]
        engine: Option<EngineArg>,
    },
}

/// Speech engine selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// macOS `say`
    Say,
    /// `espeak-ng`
    Espeak,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Say => Self::Say,
            EngineArg::Espeak => Self::Espeak,
        }
    }
}
