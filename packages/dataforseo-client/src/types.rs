use serde::{Deserialize, Serialize};

/// Envelope status for a successful call.
pub const STATUS_OK: i64 = 20000;

/// Task status returned by `task_post` endpoints for an accepted task.
pub const STATUS_TASK_CREATED: i64 = 20100;

/// Top-level response wrapper shared by every v3 endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub tasks: Vec<TaskEnvelope>,
}

/// Per-task wrapper inside an [`Envelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEnvelope {
    pub id: String,
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub result: Option<Vec<serde_json::Value>>,
}

/// Options applied to every SERP task in a `task_post` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpTaskOptions {
    pub location_code: u32,
    pub language_code: String,
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl Default for SerpTaskOptions {
    fn default() -> Self {
        Self {
            // Netherlands
            location_code: 2528,
            language_code: "nl".to_string(),
            depth: 100,
            priority: None,
        }
    }
}

/// One task of `serp/google/organic/task_post`.
#[derive(Debug, Clone, Serialize)]
pub struct SerpTask<'a> {
    pub keyword: &'a str,
    pub location_code: u32,
    pub language_code: &'a str,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

/// How backlinks are grouped in `backlinks/backlinks/live`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklinksMode {
    #[default]
    AsIs,
    OnePerDomain,
    OnePerAnchor,
}

/// Which backlinks to include by liveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklinksStatusType {
    All,
    #[default]
    Live,
    Lost,
}

/// Filter for a backlinks cursor session on one target.
#[derive(Debug, Clone)]
pub struct BacklinksQuery {
    pub target: String,
    pub mode: BacklinksMode,
    pub include_subdomains: bool,
    pub status_type: BacklinksStatusType,
    pub limit: u32,
}

/// Max items per backlinks page accepted by the API.
pub const BACKLINKS_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct BacklinksTask<'a> {
    pub target: &'a str,
    pub mode: BacklinksMode,
    pub include_subdomains: bool,
    pub backlinks_status_type: BacklinksStatusType,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_after_token: Option<&'a str>,
}

/// The fields of a backlinks result needed to continue the cursor.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BacklinksResult {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items_count: u64,
    #[serde(default)]
    pub search_after_token: Option<String>,
}

/// One page of a cursor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage {
    /// Raw response body
    pub payload: String,
    /// Whether another call is needed for this target
    pub has_more: bool,
    pub next_token: Option<String>,
    /// Items returned so far, this page included
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct BulkTargetsTask<'a> {
    pub targets: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
}

/// Default crawl budget per on-page task.
pub const DEFAULT_MAX_CRAWL_PAGES: u32 = 25_000;

/// Max tasks per `task_post` call; extra tasks fail with 40006.
pub const MAX_TASKS_PER_POST: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct OnPageTask<'a> {
    pub target: &'a str,
    pub max_crawl_pages: u32,
}
