//! Build orchestrator
//!
//! Runs one build end to end:
//! - submits it and derives where its logs are written
//! - spawns the log tailer
//! - waits for the build to complete on the calling task
//! - stops the tailer and waits for it to acknowledge, whatever the wait returned
//!
//! Per run: Idle -> Submitted -> Running (tailing + waiting) -> Stopping -> Done.
//! Done is only reached after the tailer has exited, so no log line is
//! printed after `run` returns.

use cbuild_client::BuildServiceClient;
use cbuild_core::domain::build::BuildStatus;
use cbuild_core::domain::job::{Job, WaitState};
use cbuild_core::dto::build::SubmitBuild;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::RunnerError;
use crate::repository::{
    BuildRepository, HttpBuildRepository, HttpLogRepository, HttpStatusRepository, LogRepository,
    StatusRepository,
};
use crate::service::{CompletionWaiter, LogSink, LogTailer, TailError, TailSummary};

/// What to build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Build project on the remote service
    pub project: String,
    /// `<bucket>/<key>` of the uploaded source archive
    pub source_location: String,
    /// Buildspec replacing the project's default
    pub buildspec: Option<String>,
}

/// Result of a completed wait
#[derive(Debug)]
pub struct BuildOutcome {
    pub job: Job,
    /// Final status as reported by the build service
    pub status: BuildStatus,
    pub state: WaitState,
    /// How log tailing ended; a failure here did not interrupt the wait
    pub logs: Result<TailSummary, TailError>,
}

impl BuildOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == WaitState::Succeeded
    }
}

/// Coordinates submission, log tailing and waiting for one build
pub struct BuildOrchestrator {
    config: Config,
    builds: Arc<dyn BuildRepository>,
    logs: Arc<dyn LogRepository>,
    status: Arc<dyn StatusRepository>,
    sink: Arc<dyn LogSink>,
}

impl BuildOrchestrator {
    /// Creates an orchestrator over explicit repositories
    pub fn new(
        config: Config,
        builds: Arc<dyn BuildRepository>,
        logs: Arc<dyn LogRepository>,
        status: Arc<dyn StatusRepository>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config,
            builds,
            logs,
            status,
            sink,
        }
    }

    /// Creates an orchestrator talking HTTP to the build service
    pub fn with_client(
        config: Config,
        client: Arc<BuildServiceClient>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self::new(
            config,
            Arc::new(HttpBuildRepository::new(Arc::clone(&client))),
            Arc::new(HttpLogRepository::new(Arc::clone(&client))),
            Arc::new(HttpStatusRepository::new(client)),
            sink,
        )
    }

    /// Submits a build and follows it to completion
    ///
    /// An invalid configuration or a failed submission ends the run before
    /// anything is spawned.
    ///
    /// # Arguments
    /// * `request` - Project, source location and buildspec
    /// * `cancel` - Resolves when the caller wants to stop waiting
    pub async fn run<C>(&self, request: BuildRequest, cancel: C) -> Result<BuildOutcome, RunnerError>
    where
        C: Future<Output = ()>,
    {
        self.config.validate()?;

        info!(
            "Starting build of {} for project {}",
            request.source_location, request.project
        );

        let build_id = self
            .builds
            .submit_build(&SubmitBuild {
                project: request.project.clone(),
                source_location: request.source_location,
                buildspec_override: request.buildspec,
            })
            .await
            .map_err(RunnerError::Submit)?;

        let job = Job::new(request.project, build_id.as_str())
            .ok_or(RunnerError::InvalidBuildId(build_id))?
            .submitted();

        self.track(job, cancel).await
    }

    /// Follows an already submitted build to completion
    ///
    /// The submission time is unknown here, so the outcome's job carries
    /// none.
    pub async fn follow<C>(
        &self,
        project: &str,
        build_id: &str,
        cancel: C,
    ) -> Result<BuildOutcome, RunnerError>
    where
        C: Future<Output = ()>,
    {
        self.config.validate()?;

        let job = Job::new(project, build_id)
            .ok_or_else(|| RunnerError::InvalidBuildId(build_id.to_string()))?;

        self.track(job, cancel).await
    }

    /// Tails the job's logs while waiting for it
    ///
    /// The tailer is stopped and joined on every path out of the wait.
    async fn track<C>(&self, job: Job, cancel: C) -> Result<BuildOutcome, RunnerError>
    where
        C: Future<Output = ()>,
    {
        info!(
            "Following build {} (group {}, stream {})",
            job.id, job.log_locator.group, job.log_locator.stream
        );

        let tailer = LogTailer::new(
            Arc::clone(&self.logs),
            Arc::clone(&self.sink),
            job.log_locator.clone(),
            self.config.dedup_capacity,
        )
        .with_intervals(self.config.idle_poll_interval, self.config.poll_interval)
        .spawn();

        let waiter = CompletionWaiter::new(
            Arc::clone(&self.status),
            self.config.wait_poll_interval,
            self.config.max_wait_attempts,
        );

        let waited = waiter.wait_until_done(&job.id, cancel).await;

        let logs = tailer.stop().await;
        if let Err(e) = &logs {
            warn!("Log tailing for build {} failed: {}", job.id, e);
        }

        let status = waited?;

        let logs = match logs {
            Err(e) if self.config.fail_on_log_error => return Err(RunnerError::Logs(e)),
            logs => logs,
        };

        let state = status.wait_state();
        info!("Finished build {} ({})", job.id, state);

        Ok(BuildOutcome {
            job,
            status,
            state,
            logs,
        })
    }
}
