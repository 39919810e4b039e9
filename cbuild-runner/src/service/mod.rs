//! Service layer
//!
//! Services hold the engine's logic. They use the repositories to talk to
//! the build service and implement the log tailing and completion waiting
//! that run side by side during a build.

mod dedup;
mod sink;
mod tailer;
mod waiter;

pub use dedup::LogDedupCache;
pub use sink::LogSink;
pub use tailer::{LogTailer, TailError, TailSummary, TailerHandle};
pub use waiter::{CompletionWaiter, WaitError};
