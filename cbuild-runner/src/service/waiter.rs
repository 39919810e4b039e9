//! Completion waiter
//!
//! Blocks until the build service reports a build as complete, polling the
//! batch status endpoint on a fixed interval with a bounded number of
//! attempts. It does not judge success or failure; the caller reads that from
//! the returned status.

use cbuild_core::domain::build::BuildStatus;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::repository::StatusRepository;

/// Reasons a wait ends without a completed build
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("build {build_id} did not complete after {attempts} status checks")]
    Timeout { build_id: String, attempts: u32 },

    #[error("wait for build {build_id} was cancelled")]
    Cancelled { build_id: String },

    #[error("failed to query status of build {build_id}: {source}")]
    Status {
        build_id: String,
        #[source]
        source: cbuild_client::ClientError,
    },
}

/// Polls build status until the build completes
pub struct CompletionWaiter {
    status: Arc<dyn StatusRepository>,
    interval: Duration,
    max_attempts: u32,
}

impl CompletionWaiter {
    /// Creates a waiter
    ///
    /// # Arguments
    /// * `status` - Status query capability
    /// * `interval` - Delay between polls
    /// * `max_attempts` - Number of polls before timing out
    pub fn new(status: Arc<dyn StatusRepository>, interval: Duration, max_attempts: u32) -> Self {
        Self {
            status,
            interval,
            max_attempts,
        }
    }

    /// Waits until `build_id` is reported complete
    ///
    /// The first poll is issued immediately and there is no sleep after the
    /// last one, so a timeout happens after exactly `max_attempts` polls.
    /// When `cancel` resolves, the in-flight poll or sleep is dropped and
    /// [`WaitError::Cancelled`] is returned.
    pub async fn wait_until_done<C>(&self, build_id: &str, cancel: C) -> Result<BuildStatus, WaitError>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);

        let ids = vec![build_id.to_string()];
        let cancelled = || WaitError::Cancelled {
            build_id: build_id.to_string(),
        };

        info!("Waiting for build {} to complete", build_id);

        for attempt in 1..=self.max_attempts {
            let statuses = tokio::select! {
                biased;
                _ = &mut cancel => return Err(cancelled()),
                result = self.status.batch_status(&ids) => result.map_err(|source| WaitError::Status {
                    build_id: build_id.to_string(),
                    source,
                })?,
            };

            if let Some(status) = completed(build_id, statuses) {
                info!(
                    "Build {} complete with status {} after {} check(s)",
                    build_id, status.build_status, attempt
                );
                return Ok(status);
            }

            debug!(
                "Build {} still running (check {}/{})",
                build_id, attempt, self.max_attempts
            );

            if attempt == self.max_attempts {
                break;
            }

            tokio::select! {
                biased;
                _ = &mut cancel => return Err(cancelled()),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        Err(WaitError::Timeout {
            build_id: build_id.to_string(),
            attempts: self.max_attempts,
        })
    }
}

/// Returns a status once every returned status is complete
///
/// The status whose id matches `build_id` is preferred; the service may
/// report the build under another id form, in which case the first one is
/// used. An empty answer never counts as complete.
fn completed(build_id: &str, mut statuses: Vec<BuildStatus>) -> Option<BuildStatus> {
    if statuses.is_empty() || !statuses.iter().all(|s| s.build_complete) {
        return None;
    }

    let index = statuses.iter().position(|s| s.id == build_id).unwrap_or(0);
    Some(statuses.swap_remove(index))
}
