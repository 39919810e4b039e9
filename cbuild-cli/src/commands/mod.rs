//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod build;
mod logs;

use anyhow::{Context, Result, bail};
use cbuild_client::BuildServiceClient;
use cbuild_runner::{BuildOutcome, Config, RunnerError};
use clap::Subcommand;
use std::sync::Arc;
use tracing::{debug, warn};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Package the working directory, build it remotely and stream the log
    Build(build::BuildArgs),
    /// Stream the log of a build that is already running
    Logs(logs::LogsArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The runner configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Build(args) => build::handle_build_command(args, config).await,
        Commands::Logs(args) => logs::handle_logs_command(args, config).await,
    }
}

/// Resolves when the user presses Ctrl-C
///
/// If the signal handler cannot be installed this never resolves.
pub(crate) async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    warn!("Interrupted, stopping");
}

/// Client for the configured service, bounded by the request timeout
pub(crate) fn service_client(config: &Config) -> Result<Arc<BuildServiceClient>> {
    let client =
        BuildServiceClient::with_timeout(config.service_url.clone(), config.request_timeout)
            .context("Failed to create build service client")?;
    debug!("Using build service at {}", client.base_url());

    Ok(Arc::new(client))
}

/// Adds what to do next when the wait ended without a final status
pub(crate) fn explain(err: RunnerError) -> anyhow::Error {
    let hint = if err.is_timeout() {
        "Gave up waiting; the build may still be running, follow it with `cbuild logs`"
    } else if err.is_cancelled() {
        "Stopped waiting; the remote build was not stopped"
    } else {
        return err.into();
    };

    anyhow::Error::new(err).context(hint)
}

/// Turns a failed build into a failed command
pub(crate) fn ensure_succeeded(outcome: &BuildOutcome) -> Result<()> {
    if !outcome.succeeded() {
        bail!(
            "build {} finished with status {}",
            outcome.job.id,
            outcome.status.build_status
        );
    }

    Ok(())
}
