//! Error types for a build run

use thiserror::Error;

use crate::config::ConfigError;
use crate::service::{TailError, WaitError};

/// Errors that end a build run
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start build: {0}")]
    Submit(#[source] cbuild_client::ClientError),

    /// The build service returned an id its log streams cannot be derived from
    #[error("build id {0:?} has no run segment")]
    InvalidBuildId(String),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("log tailing failed: {0}")]
    Logs(#[source] TailError),
}

impl RunnerError {
    /// Whether the run ended because the build outlived the wait budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Wait(WaitError::Timeout { .. }))
    }

    /// Whether the run ended because it was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Wait(WaitError::Cancelled { .. }))
    }
}
