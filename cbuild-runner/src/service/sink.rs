//! Log sink
//!
//! Destination of the log lines surfaced by the tailer.

use cbuild_core::domain::log::LogLine;

/// Receives log lines in the order they are surfaced
///
/// Implementations must not block for long; they run inside the tailer's
/// fetch loop.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &LogLine);
}
