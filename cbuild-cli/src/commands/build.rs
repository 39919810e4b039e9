//! Build command handler
//!
//! Packages the source tree, uploads it, starts the remote build and follows
//! it to completion.

use anyhow::{Context, Result};
use cbuild_runner::{BuildOrchestrator, BuildRequest, Config};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::archive::{self, DEFAULT_IGNORE_FILE};
use crate::buildspec::{self, DEFAULT_BUILDSPEC};
use crate::config::Settings;
use crate::output::{ConsoleLogSink, print_outcome};

/// Arguments of `cbuild build`
#[derive(Args)]
pub struct BuildArgs {
    /// Build project name
    #[arg(long, env = "CBUILD_PROJECT")]
    project: Option<String>,

    /// Bucket receiving the source archive
    #[arg(long, env = "CBUILD_SOURCE_BUCKET")]
    source_bucket: Option<String>,

    /// Key prefix for the source archive
    #[arg(long, env = "CBUILD_SOURCE_PREFIX")]
    source_prefix: Option<String>,

    /// Buildspec file overriding the project's default (skipped if absent)
    #[arg(long, default_value = DEFAULT_BUILDSPEC)]
    buildspec: PathBuf,

    /// Ignore file, relative to the source directory
    #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
    ignore_file: PathBuf,

    /// Source directory to package
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

/// Handle `cbuild build`
pub async fn handle_build_command(args: BuildArgs, config: &Config) -> Result<()> {
    let settings = Settings::new(args.project, args.source_bucket, args.source_prefix)?;

    info!("Building source archive");
    let (dir, ignore_file) = (args.dir, args.ignore_file);
    let archive = tokio::task::spawn_blocking(move || archive::build(&dir, &ignore_file))
        .await
        .context("Archive task failed")?
        .context("Failed to build source archive")?;
    info!(
        "Packaged {} file(s), {} byte(s)",
        archive.entries(),
        archive.size()
    );

    let client = super::service_client(config)?;

    let key = settings.source_key(&Uuid::new_v4().to_string());
    let body = archive
        .open()
        .await
        .context("Failed to open source archive")?;
    let uploaded = client
        .upload_object(&settings.source_bucket, &key, body)
        .await
        .context("Failed to upload source archive")?;
    info!("Uploaded source archive to {}", uploaded.location);

    debug!("Removing temporary archive {:?}", archive.path());
    archive
        .cleanup()
        .context("Failed to clean up source archive")?;

    let buildspec = buildspec::load(&args.buildspec).context("Failed to load buildspec")?;

    let orchestrator =
        BuildOrchestrator::with_client(config.clone(), client, Arc::new(ConsoleLogSink::new()));

    let outcome = orchestrator
        .run(
            BuildRequest {
                project: settings.project.clone(),
                source_location: settings.source_location(&key),
                buildspec,
            },
            super::interrupted(),
        )
        .await
        .map_err(super::explain)?;

    print_outcome(&outcome);

    super::ensure_succeeded(&outcome)
}
