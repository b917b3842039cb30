#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod backend;
pub mod error;
pub mod queue;
pub mod registry;
pub mod service;

// Re-export key types for convenience
pub use backend::{
    EngineEvent, EngineEventReceiver, EngineEventSender, EngineOutcome, EngineUtterance,
    SpeechBackend, SpeechEngine, backend_for,
};
pub use error::SpeechError;
pub use queue::{ChannelState, ChannelStatus, ScheduleSummary, ScheduledUtterance, SpeechQueues};
pub use registry::{Channel, ChannelRegistry};
pub use service::SpeechService;

#[cfg(test)]
use tokio_test as _;
