//! Terminal output
//!
//! Build log lines go to stdout as they arrive; the final summary follows
//! once the build has completed.

use cbuild_core::domain::build::BuildPhase;
use cbuild_core::domain::log::LogLine;
use cbuild_runner::{BuildOutcome, LogSink};
use colored::*;
use std::io::Write;

/// Writes log lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleLogSink;

impl ConsoleLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for ConsoleLogSink {
    fn emit(&self, line: &LogLine) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", format_line(line));
    }
}

fn format_line(line: &LogLine) -> String {
    format!(
        "{} {}",
        line.timestamp.format("%H:%M:%S").to_string().dimmed(),
        line.message.trim_end_matches(['\r', '\n'])
    )
}

/// Print the summary of a finished build
pub fn print_outcome(outcome: &BuildOutcome) {
    let status = &outcome.status;

    println!();
    println!("{}", "Build Summary:".bold());
    println!("  ID:        {}", outcome.job.id.cyan());
    println!("  Project:   {}", outcome.job.project);
    println!("  Status:    {}", colorize_phase(status.build_status));
    if let Some(phase) = &status.current_phase {
        println!("  Phase:     {}", phase.dimmed());
    }
    if let Some(submitted) = outcome.job.submitted_at {
        println!("  Submitted: {}", submitted.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(started) = status.start_time {
        println!("  Started:   {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(ended) = status.end_time {
        println!("  Ended:     {}", ended.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  Logs:      {}", outcome.job.log_locator.to_string().dimmed());

    match &outcome.logs {
        Ok(summary) => println!(
            "  Lines:     {} ({} duplicate(s) skipped)",
            summary.emitted, summary.duplicates
        ),
        Err(e) => println!("  Lines:     {}", format!("log tailing failed: {}", e).yellow()),
    }
}

/// Colorize build phase for display
fn colorize_phase(phase: BuildPhase) -> ColoredString {
    let phase_str = phase.to_string();
    match phase {
        BuildPhase::InProgress => phase_str.cyan(),
        BuildPhase::Succeeded => phase_str.green(),
        BuildPhase::Failed | BuildPhase::Fault | BuildPhase::TimedOut => phase_str.red(),
        BuildPhase::Stopped => phase_str.dimmed(),
    }
}
