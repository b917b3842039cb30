//! Port definitions (trait abstractions) for external systems.
//!
//! Ports use only domain types. Adapters implement them (`chorus-speech`) or
//! consume them (`chorus-axum`) without knowing about each other.

pub mod speech;

pub use speech::{SpeechPortError, SpeechQueuePort};
