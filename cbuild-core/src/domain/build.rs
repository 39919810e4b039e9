//! Build status domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::WaitState;

/// Status of a build as reported by the build service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub id: String,
    pub build_complete: bool,
    pub build_status: BuildPhase,
    #[serde(default)]
    pub current_phase: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl BuildStatus {
    /// Collapses the service status into the client-side lifecycle
    ///
    /// Anything that is complete but not `SUCCEEDED` counts as failed.
    pub fn wait_state(&self) -> WaitState {
        if !self.build_complete {
            return WaitState::Running;
        }

        match self.build_status {
            BuildPhase::Succeeded => WaitState::Succeeded,
            _ => WaitState::Failed,
        }
    }
}

/// Outcome phase of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildPhase {
    InProgress,
    Succeeded,
    Failed,
    Fault,
    TimedOut,
    Stopped,
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildPhase::InProgress => write!(f, "IN_PROGRESS"),
            BuildPhase::Succeeded => write!(f, "SUCCEEDED"),
            BuildPhase::Failed => write!(f, "FAILED"),
            BuildPhase::Fault => write!(f, "FAULT"),
            BuildPhase::TimedOut => write!(f, "TIMED_OUT"),
            BuildPhase::Stopped => write!(f, "STOPPED"),
        }
    }
}
