//! Table formatting utilities for CLI output.

use chorus_core::VoiceInfo;

const NAME_WIDTH: usize = 32;
const QUALITY_WIDTH: usize = 10;

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use chorus_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Format voices as table rows: name, quality, language.
pub fn voice_rows(voices: &[VoiceInfo]) -> Vec<String> {
    voices
        .iter()
        .map(|voice| {
            format!(
                "{:<NAME_WIDTH$} {:<QUALITY_WIDTH$} {}",
                truncate_string(&voice.name, NAME_WIDTH),
                voice.quality.as_str(),
                voice.language
            )
        })
        .collect()
}

/// Print voices as a table with a header.
pub fn print_voice_table(voices: &[VoiceInfo]) {
    println!(
        "{:<NAME_WIDTH$} {:<QUALITY_WIDTH$} LANGUAGE",
        "NAME", "QUALITY"
    );
    print_separator(NAME_WIDTH + QUALITY_WIDTH + 12);
    for row in voice_rows(voices) {
        println!("{row}");
    }
}
