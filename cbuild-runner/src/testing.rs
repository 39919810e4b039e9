//! Test doubles for the repository traits

use async_trait::async_trait;
use cbuild_client::{ClientError, Result};
use cbuild_core::domain::build::{BuildPhase, BuildStatus};
use cbuild_core::domain::job::LogLocator;
use cbuild_core::domain::log::{LogLine, PageToken};
use cbuild_core::dto::build::SubmitBuild;
use cbuild_core::dto::log::LogPage;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::repository::{BuildRepository, LogRepository, StatusRepository};
use crate::service::LogSink;

/// Log line `secs` seconds into a fixed day
pub fn line(secs: i64, message: &str) -> LogLine {
    LogLine::new(timestamp(secs), message)
}

pub fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(secs)
}

pub fn page(token: &str, lines: Vec<LogLine>) -> LogPage {
    LogPage {
        lines,
        next_token: Some(PageToken::from(token)),
    }
}

/// Serves scripted pages in order, then echoes back whatever token it gets
#[derive(Default)]
pub struct ScriptedLogSource {
    pages: Mutex<VecDeque<Result<LogPage>>>,
    tokens: Mutex<Vec<Option<PageToken>>>,
    locators: Mutex<Vec<LogLocator>>,
    calls: AtomicUsize,
}

impl ScriptedLogSource {
    pub fn new(pages: Vec<Result<LogPage>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens_sent(&self) -> Vec<Option<PageToken>> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn locators(&self) -> Vec<LogLocator> {
        self.locators.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogRepository for ScriptedLogSource {
    async fn fetch_page(
        &self,
        locator: &LogLocator,
        token: Option<&PageToken>,
    ) -> Result<LogPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.cloned());
        self.locators.lock().unwrap().push(locator.clone());

        match self.pages.lock().unwrap().pop_front() {
            Some(page) => page,
            None => Ok(LogPage {
                lines: Vec::new(),
                next_token: token.cloned(),
            }),
        }
    }
}

/// Sink that keeps everything it receives
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<LogLine>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|l| l.message).collect()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, line: &LogLine) {
        self.lines.lock().unwrap().push(line.clone());
    }
}

enum StatusScript {
    CompleteAfter(usize, BuildPhase),
    Never,
    Empty,
    FailAfter(usize),
}

/// Answers status queries according to a simple script
pub struct ScriptedStatusSource {
    build_id: String,
    script: StatusScript,
    calls: AtomicUsize,
}

impl ScriptedStatusSource {
    /// Reports running for `running_polls` polls, then complete with `phase`
    pub fn complete_after(build_id: &str, running_polls: usize, phase: BuildPhase) -> Self {
        Self::with_script(build_id, StatusScript::CompleteAfter(running_polls, phase))
    }

    pub fn never_complete(build_id: &str) -> Self {
        Self::with_script(build_id, StatusScript::Never)
    }

    /// Knows no builds at all
    pub fn empty() -> Self {
        Self::with_script("", StatusScript::Empty)
    }

    /// Reports running for `running_polls` polls, then errors
    pub fn failing(build_id: &str, running_polls: usize) -> Self {
        Self::with_script(build_id, StatusScript::FailAfter(running_polls))
    }

    fn with_script(build_id: &str, script: StatusScript) -> Self {
        Self {
            build_id: build_id.to_string(),
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn status(build_id: &str, complete: bool, phase: BuildPhase) -> BuildStatus {
        BuildStatus {
            id: build_id.to_string(),
            build_complete: complete,
            build_status: phase,
            current_phase: None,
            start_time: None,
            end_time: None,
        }
    }
}

#[async_trait]
impl StatusRepository for ScriptedStatusSource {
    async fn batch_status(&self, _build_ids: &[String]) -> Result<Vec<BuildStatus>> {
        let previous = self.calls.fetch_add(1, Ordering::SeqCst);
        let running = Self::status(&self.build_id, false, BuildPhase::InProgress);

        match &self.script {
            StatusScript::CompleteAfter(n, phase) if previous >= *n => {
                Ok(vec![Self::status(&self.build_id, true, *phase)])
            }
            StatusScript::FailAfter(n) if previous >= *n => Err(ClientError::api_error(
                503,
                "status service unavailable",
            )),
            StatusScript::Empty => Ok(Vec::new()),
            _ => Ok(vec![running]),
        }
    }
}

/// Accepts or rejects every submission
pub struct ScriptedBuildSource {
    response: std::result::Result<String, String>,
    requests: Mutex<Vec<SubmitBuild>>,
}

impl ScriptedBuildSource {
    pub fn accepting(build_id: &str) -> Self {
        Self {
            response: Ok(build_id.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SubmitBuild> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildRepository for ScriptedBuildSource {
    async fn submit_build(&self, req: &SubmitBuild) -> Result<String> {
        self.requests.lock().unwrap().push(req.clone());

        match &self.response {
            Ok(id) => Ok(id.clone()),
            Err(message) => Err(ClientError::api_error(400, message.clone())),
        }
    }
}
