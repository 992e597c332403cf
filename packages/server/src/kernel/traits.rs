// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Workflow logic lives in domains/harvesting and drives these traits.
//
// Naming convention: Base* for trait names (e.g., BaseRawStore, BaseWebhook)

use anyhow::Result;
use async_trait::async_trait;
use dataforseo_client::{BacklinksQuery, CursorPage, SerpTaskOptions};

use crate::common::WebhookPayload;

// =============================================================================
// Source Set Trait (Infrastructure - read-only relational source)
// =============================================================================

#[async_trait]
pub trait BaseSourceSet: Send + Sync {
    /// Load every row of `schema.table`, projecting `columns` in order.
    ///
    /// No paging: the whole table is returned in memory.
    async fn fetch_all(&self, table: &str, schema: &str, columns: &[String])
        -> Result<Vec<Vec<String>>>;
}

// =============================================================================
// Raw Store Trait (Infrastructure - hierarchical blob store)
// =============================================================================

/// Handle to a directory in the raw store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryHandle {
    pub path: String,
}

#[async_trait]
pub trait BaseRawStore: Send + Sync {
    /// Create the directory at `path`, or return the existing one.
    async fn create_or_get_directory(&self, path: &str) -> Result<DirectoryHandle>;

    /// Write one payload as `{name}.{extension}`. Never overwrites an existing object.
    async fn upload_raw_data(
        &self,
        directory: &DirectoryHandle,
        payload: &str,
        name: &str,
        extension: &str,
    ) -> Result<()>;
}

// =============================================================================
// Data Provider Trait (Infrastructure - one call shape per workflow)
// =============================================================================

#[async_trait]
pub trait BaseDataProvider: Send + Sync {
    /// Queue one SERP task per keyword (fire page)
    async fn queue_serp_tasks(&self, keywords: &[String], options: &SerpTaskOptions)
        -> Result<String>;

    /// One cursor step of live backlinks for a single target
    async fn backlinks_page(
        &self,
        query: &BacklinksQuery,
        count: u64,
        token: Option<&str>,
    ) -> Result<CursorPage>;

    /// Bulk rank lookup for a whole batch
    async fn bulk_ranks(&self, targets: &[String]) -> Result<String>;

    /// Bulk referring domain lookup for a whole batch
    async fn bulk_referring_domains(&self, targets: &[String]) -> Result<String>;

    /// Bulk new/lost referring domains since `from_month`
    async fn bulk_new_lost(&self, targets: &[String], from_month: &str) -> Result<String>;

    /// Post on-page crawl tasks, returning their task ids
    async fn post_on_page_tasks(&self, targets: &[String], max_crawl_pages: u32)
        -> Result<Vec<String>>;

    /// Fetch the result of each task as `(task_id, payload)`
    async fn fetch_on_page_results(&self, task_ids: &[String]) -> Result<Vec<(String, String)>>;
}

// =============================================================================
// Webhook Trait (Infrastructure - outbound callback transport)
// =============================================================================

#[async_trait]
pub trait BaseWebhook: Send + Sync {
    /// Deliver the outcome payload to the callback URI (single attempt)
    async fn call_webhook(&self, payload: &WebhookPayload, callback_uri: &str) -> Result<()>;
}
