//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms.

pub mod tables;

pub use tables::{print_separator, print_voice_table, truncate_string, voice_rows};
