//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every log group the build service writes to.
pub const LOG_GROUP_PREFIX: &str = "/remote";

/// Separator between the project and the run identifier in a build id.
pub const BUILD_ID_SEPARATOR: char = ':';

/// A remote build being followed
///
/// Never mutated once tracking starts. `submitted_at` is only known when
/// the build was submitted by this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub project: String,
    pub log_locator: LogLocator,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Creates a job for a build id returned by the service
    ///
    /// Returns `None` when the build id does not follow the
    /// `<project>:<run>` convention, since the log stream cannot be located.
    pub fn new(project: impl Into<String>, id: impl Into<String>) -> Option<Self> {
        let project = project.into();
        let id = id.into();
        let log_locator = LogLocator::for_build(&project, &id)?;

        Some(Self {
            id,
            project,
            log_locator,
            submitted_at: None,
        })
    }

    /// Marks the job as submitted just now
    pub fn submitted(mut self) -> Self {
        self.submitted_at = Some(Utc::now());
        self
    }
}

/// Location of a build's log stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogLocator {
    pub group: String,
    pub stream: String,
}

impl LogLocator {
    pub fn new(group: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            stream: stream.into(),
        }
    }

    /// Derives the log locator the build service uses for a build
    ///
    /// The group is keyed by project and the stream is the second
    /// `:`-separated segment of the build id. This mirrors the service's
    /// naming and must not change.
    pub fn for_build(project: &str, build_id: &str) -> Option<Self> {
        let stream = build_id.split(BUILD_ID_SEPARATOR).nth(1)?;

        Some(Self::new(format!("{}/{}", LOG_GROUP_PREFIX, project), stream))
    }
}

impl std::fmt::Display for LogLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.stream)
    }
}

/// Client-side view of a build's lifecycle
///
/// Starts as `Running` and moves to one of the terminal states exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitState {
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for WaitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitState::Running => write!(f, "Running"),
            WaitState::Succeeded => write!(f, "Succeeded"),
            WaitState::Failed => write!(f, "Failed"),
        }
    }
}
