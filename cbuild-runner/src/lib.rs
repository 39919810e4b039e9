//! cbuild Runner
//!
//! The engine behind `cbuild`: it starts one remote build, prints the
//! build's log as it is written, and returns once the build service reports
//! the build complete.
//!
//! Architecture:
//! - Configuration: poll intervals, wait budget and cache size
//! - Repositories: capability traits over the build service (builds, logs, status)
//! - Services: log deduplication, log tailing, completion waiting
//! - Scheduler: the orchestrator that runs tailing and waiting side by side
//!
//! The tailer runs on its own task and is stopped through a one-shot signal;
//! joining its task is the acknowledgment that it has finished. The waiter
//! runs on the caller's task and can be cancelled by any future.

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigError};
pub use error::RunnerError;
pub use scheduler::{BuildOrchestrator, BuildOutcome, BuildRequest};
pub use service::{LogSink, TailError, TailSummary, WaitError};
