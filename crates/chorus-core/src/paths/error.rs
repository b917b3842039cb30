//! Path-related error types.

use thiserror::Error;

/// Errors that can occur while locating the settings file.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's configuration directory.
    #[error("Cannot determine configuration directory")]
    NoConfigDir,

    /// Could not determine the user's home directory while expanding `~`.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}
