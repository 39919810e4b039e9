//! Log DTOs

use serde::{Deserialize, Serialize};

use crate::domain::log::{LogLine, PageToken};

/// One page of log events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    #[serde(default)]
    pub lines: Vec<LogLine>,
    #[serde(default)]
    pub next_token: Option<PageToken>,
}

impl LogPage {
    /// A page with no lines and no continuation token
    ///
    /// Returned for streams that do not exist yet.
    pub fn empty() -> Self {
        Self::default()
    }
}
