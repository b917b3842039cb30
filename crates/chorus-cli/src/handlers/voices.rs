//! Voices command handler.

use tracing::debug;

use chorus_core::{EngineKind, filter_by_language};
use chorus_speech::backend_for;

use crate::error::CliError;
use crate::presentation::print_voice_table;

/// Execute the voices command.
///
/// Lists the voices of `engine` (the platform engine when `None`), keeping
/// only those whose language matches one of `languages` when any are given.
pub async fn execute(engine: Option<EngineKind>, languages: &[String]) -> Result<(), CliError> {
    let engine = engine.unwrap_or_else(EngineKind::platform_default);
    let backend = backend_for(engine, None);

    let voices = backend.voices().await?;
    let total = voices.len();
    let voices = filter_by_language(voices, languages);
    debug!(engine = backend.name(), total, shown = voices.len(), "Listing voices");

    if voices.is_empty() {
        if languages.is_empty() {
            println!("No voices installed for {}.", engine.as_str());
        } else {
            println!("No voices found for {}.", languages.join(", "));
        }
        return Ok(());
    }

    print_voice_table(&voices);
    Ok(())
}
