//! Logs command handler
//!
//! Attaches to a build that was started elsewhere and streams its log until
//! it completes.

use anyhow::{Result, bail};
use cbuild_core::domain::job::BUILD_ID_SEPARATOR;
use cbuild_runner::{BuildOrchestrator, Config};
use clap::Args;
use std::sync::Arc;

use crate::output::{ConsoleLogSink, print_outcome};

/// Arguments of `cbuild logs`
#[derive(Args)]
pub struct LogsArgs {
    /// Build ID (`<project>:<run>`)
    build_id: String,

    /// Build project name, defaults to the build ID's project segment
    #[arg(long, env = "CBUILD_PROJECT")]
    project: Option<String>,
}

/// Handle `cbuild logs`
pub async fn handle_logs_command(args: LogsArgs, config: &Config) -> Result<()> {
    let project = resolve_project(&args.build_id, args.project)?;

    let client = super::service_client(config)?;
    let orchestrator =
        BuildOrchestrator::with_client(config.clone(), client, Arc::new(ConsoleLogSink::new()));

    let outcome = orchestrator
        .follow(&project, &args.build_id, super::interrupted())
        .await
        .map_err(super::explain)?;

    print_outcome(&outcome);

    super::ensure_succeeded(&outcome)
}

fn resolve_project(build_id: &str, project: Option<String>) -> Result<String> {
    if let Some(project) = project.filter(|p| !p.trim().is_empty()) {
        return Ok(project);
    }

    match build_id.split_once(BUILD_ID_SEPARATOR) {
        Some((project, _)) if !project.is_empty() => Ok(project.to_string()),
        _ => bail!(
            "cannot derive project from build id {:?}; pass --project",
            build_id
        ),
    }
}
