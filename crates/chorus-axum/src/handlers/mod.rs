//! HTTP request handlers.
//!
//! Handlers are thin wrappers that delegate to `SpeechQueuePort`.

pub mod speak;
