//! cbuild CLI
//!
//! Packages the current directory, runs it as a remote container build and
//! streams the build log to the terminal until the build finishes.

mod archive;
mod buildspec;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cbuild", version)]
#[command(about = "Run a remote container build and stream its logs", long_about = None)]
struct Cli {
    /// Build service URL
    #[arg(
        long,
        global = true,
        env = "CBUILD_SERVICE_URL",
        default_value = "http://localhost:8080"
    )]
    service_url: String,

    /// Verbose mode
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = config::load_runner_config(cli.service_url)?;

    handle_command(cli.command, &config).await
}

/// Diagnostics go to stderr so stdout carries only the build log
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cbuild=debug,cbuild_runner=debug,cbuild_client=debug"
    } else {
        "cbuild=info,cbuild_runner=info,cbuild_client=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
