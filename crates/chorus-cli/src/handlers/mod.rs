//! Command handlers.
//!
//! Handlers are thin: resolve CLI input, call into the core/speech/axum
//! crates, and format output for the terminal.

pub mod serve;
pub mod voices;
