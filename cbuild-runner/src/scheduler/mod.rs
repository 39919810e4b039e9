//! Scheduler layer
//!
//! Coordinates one build from submission to completion: the log tailer runs
//! in the background while the caller waits for the build to finish.

pub mod orchestrator;

pub use orchestrator::{BuildOrchestrator, BuildOutcome, BuildRequest};
