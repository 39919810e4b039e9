//! Log tailer
//!
//! Follows a running build's log stream page by page and hands every new
//! line to a [`LogSink`] exactly once (within the dedup cache's memory).
//!
//! The loop:
//! - checks the stop signal before every fetch
//! - fetches the page after the held continuation token
//! - treats a repeated token as "nothing new" and idles briefly
//! - otherwise emits unseen lines in page order and advances the token
//! - pauses for the steady poll interval
//!
//! A fetch error ends the loop and is returned to whoever joins the tailer.

use cbuild_core::domain::job::LogLocator;
use cbuild_core::domain::log::PageToken;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::repository::LogRepository;
use crate::service::dedup::LogDedupCache;
use crate::service::sink::LogSink;

/// Counters describing what a tailer did before it stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailSummary {
    /// Log fetches issued
    pub fetches: usize,
    /// Fetches that returned the token that was sent
    pub idle_polls: usize,
    /// Lines handed to the sink
    pub emitted: usize,
    /// Lines dropped as already emitted
    pub duplicates: usize,
}

/// Ways the tailer can end other than a requested stop
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    #[error("failed to read logs from {locator}: {source}")]
    Fetch {
        locator: LogLocator,
        #[source]
        source: cbuild_client::ClientError,
    },

    #[error("log tailer task ended abnormally: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// Follows one build's log stream
pub struct LogTailer {
    source: Arc<dyn LogRepository>,
    sink: Arc<dyn LogSink>,
    cache: LogDedupCache,
    locator: LogLocator,
    idle_interval: Duration,
    poll_interval: Duration,
}

impl LogTailer {
    /// Creates a tailer for the stream at `locator`
    ///
    /// # Arguments
    /// * `source` - Where log pages are read from
    /// * `sink` - Where new lines are emitted
    /// * `locator` - The build's log group and stream
    /// * `dedup_capacity` - Number of recent lines remembered
    pub fn new(
        source: Arc<dyn LogRepository>,
        sink: Arc<dyn LogSink>,
        locator: LogLocator,
        dedup_capacity: usize,
    ) -> Self {
        Self {
            source,
            sink,
            cache: LogDedupCache::new(dedup_capacity),
            locator,
            idle_interval: crate::config::DEFAULT_IDLE_POLL_INTERVAL,
            poll_interval: crate::config::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the idle and steady poll intervals
    pub fn with_intervals(mut self, idle_interval: Duration, poll_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self.poll_interval = poll_interval;
        self
    }

    /// Runs the tailer on its own task
    ///
    /// The returned handle is the only way to stop it.
    pub fn spawn(mut self) -> TailerHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(async move { self.run(stop_rx).await });

        TailerHandle {
            stop: stop_tx,
            task,
        }
    }

    /// Tails the stream until `stop` fires or a fetch fails
    ///
    /// The stop signal is checked before each fetch, so no fetch starts after
    /// it has been observed. A fetch already in flight is allowed to finish.
    /// Dropping the sender counts as a stop.
    pub async fn run(
        &mut self,
        mut stop: oneshot::Receiver<()>,
    ) -> Result<TailSummary, TailError> {
        let mut summary = TailSummary::default();
        let mut token: Option<PageToken> = None;

        info!(
            "Reading logs for {} (remembering up to {} line(s))",
            self.locator,
            self.cache.capacity()
        );

        loop {
            match stop.try_recv() {
                Ok(()) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Empty) => {}
            }

            debug!("Fetching log page after {:?}", token);
            summary.fetches += 1;

            let page = match self.source.fetch_page(&self.locator, token.as_ref()).await {
                Ok(page) => page,
                Err(source) => {
                    error!("Failed to read logs from {}: {}", self.locator, source);
                    return Err(TailError::Fetch {
                        locator: self.locator.clone(),
                        source,
                    });
                }
            };

            if page.next_token == token {
                debug!("Token unchanged, no new log data");
                summary.idle_polls += 1;
                if pause(self.idle_interval, &mut stop).await {
                    break;
                }
                continue;
            }

            debug!("{} log line(s) returned", page.lines.len());

            for line in &page.lines {
                if self.cache.seen_or_record(&line.dedup_key()) {
                    summary.duplicates += 1;
                    continue;
                }
                self.sink.emit(line);
                summary.emitted += 1;
            }

            token = page.next_token;

            if pause(self.poll_interval, &mut stop).await {
                break;
            }
        }

        info!(
            "Stopped reading logs for {} ({} line(s) emitted, {} duplicate(s) skipped, {} remembered)",
            self.locator,
            summary.emitted,
            summary.duplicates,
            self.cache.len()
        );

        Ok(summary)
    }
}

/// Sleeps for `duration`, returning early with `true` if stop fires
async fn pause(duration: Duration, stop: &mut oneshot::Receiver<()>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = stop => true,
    }
}

/// Handle to a spawned tailer
///
/// Stopping consumes the handle, so the stop signal fires at most once.
pub struct TailerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<TailSummary, TailError>>,
}

impl TailerHandle {
    /// Signals the tailer to stop and waits until it has
    ///
    /// Once this returns the tailer will not emit another line.
    pub async fn stop(self) -> Result<TailSummary, TailError> {
        if self.stop.send(()).is_err() {
            debug!("Log tailer already finished before stop");
        }

        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Log tailer task failed: {}", e);
                Err(TailError::Aborted(e))
            }
        }
    }
}
