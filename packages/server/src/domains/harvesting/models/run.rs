use std::fmt;
use std::future::Future;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Identity of one workflow execution. Only ever used as a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One call type per workflow; also the second path segment in the raw store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    SerpTaskPost,
    BacklinksLive,
    BulkRanks,
    BulkReferringDomains,
    #[serde(rename = "bulk_newlost")]
    BulkNewLost,
    OnPage,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::SerpTaskPost => "serp_task_post",
            CallType::BacklinksLive => "backlinks_live",
            CallType::BulkRanks => "bulk_ranks",
            CallType::BulkReferringDomains => "bulk_referring_domains",
            CallType::BulkNewLost => "bulk_newlost",
            CallType::OnPage => "on_page",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinator states. Only visible in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    FetchingSource,
    Paging,
    Flushing,
    ReportingSuccess,
    ReportingFailure,
}

/// Build `raw/in/{connector}/{callType}/{yyyy}/{M}/{d}/{leaf}`.
pub fn raw_path(connector: &str, call_type: CallType, date: DateTime<Utc>, leaf: &str) -> String {
    format!(
        "raw/in/{}/{}/{}/{}/{}/{}",
        connector,
        call_type,
        date.year(),
        date.month(),
        date.day(),
        leaf
    )
}

/// Per-execution context: identity, store location, and detached follow-up tasks.
pub struct RunContext {
    pub run_id: RunId,
    pub connector: String,
    pub call_type: CallType,
    /// Date segments of every path written by this run come from here
    pub started_at: DateTime<Utc>,
    state: RunState,
    background: Vec<JoinHandle<()>>,
}

impl RunContext {
    pub fn start(connector: impl Into<String>, call_type: CallType) -> Self {
        Self {
            run_id: RunId::new(),
            connector: connector.into(),
            call_type,
            started_at: Utc::now(),
            state: RunState::FetchingSource,
            background: Vec::new(),
        }
    }

    /// Directory holding this run's payloads and settings.
    pub fn directory(&self) -> String {
        raw_path(
            &self.connector,
            self.call_type,
            self.started_at,
            &self.run_id.to_string(),
        )
    }

    /// Directory keyed by a provider task id instead of the run id.
    pub fn task_directory(&self, task_key: &str) -> String {
        raw_path(&self.connector, self.call_type, self.started_at, task_key)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn enter(&mut self, state: RunState) {
        if self.state != state {
            tracing::debug!(
                run_id = %self.run_id,
                call_type = %self.call_type,
                from = ?self.state,
                to = ?state,
                "Run state changed"
            );
            self.state = state;
        }
    }

    /// Spawn a task that outlives the coordinator loop. Not awaited by the run.
    pub fn spawn_detached<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.background.push(tokio::spawn(task));
    }

    pub fn take_background(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn raw_path_has_unpadded_date_segments() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        let path = raw_path("dataforseo", CallType::BulkNewLost, date, "abc");
        assert_eq!(path, "raw/in/dataforseo/bulk_newlost/2024/3/7/abc");
    }

    #[test]
    fn run_directory_ends_with_run_id() {
        let run = RunContext::start("dataforseo", CallType::BulkRanks);
        let dir = run.directory();
        assert!(dir.starts_with("raw/in/dataforseo/bulk_ranks/"));
        assert!(dir.ends_with(&run.run_id.to_string()));
    }

    #[test]
    fn task_directory_swaps_run_id_for_task_key() {
        let run = RunContext::start("dataforseo", CallType::OnPage);
        let dir = run.task_directory("task-7");
        assert!(dir.starts_with("raw/in/dataforseo/on_page/"));
        assert!(dir.ends_with("/task-7"));
        assert_eq!(
            dir.rsplit_once('/').map(|(parent, _)| parent),
            run.directory().rsplit_once('/').map(|(parent, _)| parent)
        );
    }

    #[test]
    fn every_run_gets_a_fresh_id() {
        let a = RunContext::start("dataforseo", CallType::OnPage);
        let b = RunContext::start("dataforseo", CallType::OnPage);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn call_type_serializes_to_path_segment() {
        for call_type in [
            CallType::SerpTaskPost,
            CallType::BacklinksLive,
            CallType::BulkRanks,
            CallType::BulkReferringDomains,
            CallType::BulkNewLost,
            CallType::OnPage,
        ] {
            let json = serde_json::to_value(call_type).unwrap();
            assert_eq!(json, call_type.as_str());
        }
    }
}
