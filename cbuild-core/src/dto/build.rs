//! Build DTOs

use serde::{Deserialize, Serialize};

use crate::domain::build::BuildStatus;

/// Request to start a build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitBuild {
    pub project: String,
    /// `<bucket>/<key>` of the uploaded source archive
    pub source_location: String,
    /// Buildspec text replacing the project's default, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildspec_override: Option<String>,
}

/// Response to a build submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedBuild {
    pub build_id: String,
}

/// Batch status query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGetBuilds {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGetBuildsResponse {
    #[serde(default)]
    pub builds: Vec<BuildStatus>,
}
