// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use dataforseo_client::{BacklinksQuery, CursorPage, SerpTaskOptions};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use super::{
    BaseDataProvider, BaseRawStore, BaseSourceSet, BaseWebhook, DirectoryHandle, ServerDeps,
};
use crate::common::WebhookPayload;
use crate::domains::harvesting::HarvestPlans;

// =============================================================================
// Mock Source Set
// =============================================================================

pub struct MockSourceSet {
    tables: Arc<Mutex<HashMap<String, Vec<String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockSourceSet {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Set the single-column contents of `table`
    pub fn with_table<I, S>(self, table: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.lock().unwrap().insert(
            table.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Fill `table` with `count` generated domains (`domain-0.nl`, ...)
    pub fn with_domains(self, table: &str, count: usize) -> Self {
        self.with_table(table, (0..count).map(|i| format!("domain-{}.nl", i)))
    }

    /// Every fetch fails
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all `schema.table` reads
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseSourceSet for MockSourceSet {
    async fn fetch_all(
        &self,
        table: &str,
        schema: &str,
        _columns: &[String],
    ) -> Result<Vec<Vec<String>>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}.{}", schema, table));

        if self.fail {
            bail!("Source set {}.{} is unavailable", schema, table);
        }

        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(table)
            .map(|values| values.iter().map(|v| vec![v.clone()]).collect())
            .unwrap_or_default())
    }
}

// =============================================================================
// Memory Raw Store
// =============================================================================

/// An object written to the memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub directory: String,
    /// `{name}.{extension}`
    pub name: String,
    pub payload: String,
}

pub struct MemoryRawStore {
    directories: Arc<Mutex<BTreeSet<String>>>,
    objects: Arc<Mutex<Vec<StoredObject>>>,
    fail_after_uploads: Option<usize>,
}

impl MemoryRawStore {
    pub fn new() -> Self {
        Self {
            directories: Arc::new(Mutex::new(BTreeSet::new())),
            objects: Arc::new(Mutex::new(Vec::new())),
            fail_after_uploads: None,
        }
    }

    /// Uploads after the first `count` succeed fail
    pub fn fail_after_uploads(mut self, count: usize) -> Self {
        self.fail_after_uploads = Some(count);
        self
    }

    /// Get all objects in write order
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    /// Get the objects written directly into `directory`
    pub fn objects_in(&self, directory: &str) -> Vec<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.directory == directory)
            .cloned()
            .collect()
    }

    /// Get payload objects, excluding settings snapshots
    pub fn payloads(&self) -> Vec<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| !o.name.starts_with("_settings"))
            .cloned()
            .collect()
    }

    /// Get settings snapshots
    pub fn settings(&self) -> Vec<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.name.starts_with("_settings"))
            .cloned()
            .collect()
    }

    pub fn directories(&self) -> Vec<String> {
        self.directories.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl BaseRawStore for MemoryRawStore {
    async fn create_or_get_directory(&self, path: &str) -> Result<DirectoryHandle> {
        self.directories.lock().unwrap().insert(path.to_string());
        Ok(DirectoryHandle {
            path: path.to_string(),
        })
    }

    async fn upload_raw_data(
        &self,
        directory: &DirectoryHandle,
        payload: &str,
        name: &str,
        extension: &str,
    ) -> Result<()> {
        if !self.directories.lock().unwrap().contains(&directory.path) {
            bail!("Directory {} was never created", directory.path);
        }

        let mut objects = self.objects.lock().unwrap();
        if let Some(limit) = self.fail_after_uploads {
            if objects.len() >= limit {
                bail!("Raw store is full");
            }
        }

        let file_name = format!("{}.{}", name, extension);
        if objects
            .iter()
            .any(|o| o.directory == directory.path && o.name == file_name)
        {
            bail!("Object {}/{} already exists", directory.path, file_name);
        }

        objects.push(StoredObject {
            directory: directory.path.clone(),
            name: file_name,
            payload: payload.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Mock Data Provider
// =============================================================================

/// A provider call with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    SerpTasks { keywords: Vec<String> },
    BacklinksPage {
        target: String,
        count: u64,
        token: Option<String>,
    },
    BulkRanks { targets: Vec<String> },
    BulkReferringDomains { targets: Vec<String> },
    BulkNewLost {
        targets: Vec<String>,
        from_month: String,
    },
    OnPagePost {
        targets: Vec<String>,
        max_crawl_pages: u32,
    },
    OnPageFetch { task_ids: Vec<String> },
}

impl ProviderCall {
    /// Number of source items the call carried
    pub fn item_count(&self) -> usize {
        match self {
            ProviderCall::SerpTasks { keywords } => keywords.len(),
            ProviderCall::BacklinksPage { .. } => 1,
            ProviderCall::BulkRanks { targets }
            | ProviderCall::BulkReferringDomains { targets }
            | ProviderCall::BulkNewLost { targets, .. }
            | ProviderCall::OnPagePost { targets, .. } => targets.len(),
            ProviderCall::OnPageFetch { task_ids } => task_ids.len(),
        }
    }
}

pub struct MockDataProvider {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    /// Scripted cursor pages per target, consumed front to back
    cursor_pages: Arc<Mutex<HashMap<String, Vec<CursorPage>>>>,
    endless_cursor: bool,
    fail_at_call: Option<usize>,
    fail_on_page_fetch: bool,
    next_task: Arc<Mutex<usize>>,
}

impl MockDataProvider {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            cursor_pages: Arc::new(Mutex::new(HashMap::new())),
            endless_cursor: false,
            fail_at_call: None,
            fail_on_page_fetch: false,
            next_task: Arc::new(Mutex::new(0)),
        }
    }

    /// The `n`th call (1-based) fails with a provider error
    pub fn failing_at_call(mut self, n: usize) -> Self {
        self.fail_at_call = Some(n);
        self
    }

    /// Script the cursor pages returned for `target`
    pub fn with_cursor_pages(self, target: &str, pages: Vec<CursorPage>) -> Self {
        self.cursor_pages
            .lock()
            .unwrap()
            .insert(target.to_string(), pages);
        self
    }

    /// Unscripted cursor calls always report more data
    pub fn with_endless_cursor(mut self) -> Self {
        self.endless_cursor = true;
        self
    }

    /// Result fetches for on-page tasks fail
    pub fn failing_on_page_fetch(mut self) -> Self {
        self.fail_on_page_fetch = true;
        self
    }

    /// Get all calls in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Record a call, returning its 1-based position, or fail if scripted to
    fn record(&self, call: ProviderCall) -> Result<usize> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        let n = calls.len();
        if self.fail_at_call == Some(n) {
            bail!("DataForSEO returned status 50000 on call {}", n);
        }
        Ok(n)
    }
}

#[async_trait]
impl BaseDataProvider for MockDataProvider {
    async fn queue_serp_tasks(
        &self,
        keywords: &[String],
        _options: &SerpTaskOptions,
    ) -> Result<String> {
        let n = self.record(ProviderCall::SerpTasks {
            keywords: keywords.to_vec(),
        })?;
        Ok(format!(r#"{{"call":{},"tasks_count":{}}}"#, n, keywords.len()))
    }

    async fn backlinks_page(
        &self,
        query: &BacklinksQuery,
        count: u64,
        token: Option<&str>,
    ) -> Result<CursorPage> {
        let n = self.record(ProviderCall::BacklinksPage {
            target: query.target.clone(),
            count,
            token: token.map(str::to_string),
        })?;

        let scripted = {
            let mut pages = self.cursor_pages.lock().unwrap();
            pages
                .get_mut(&query.target)
                .filter(|queue| !queue.is_empty())
                .map(|queue| queue.remove(0))
        };
        if let Some(page) = scripted {
            return Ok(page);
        }

        Ok(CursorPage {
            payload: format!(r#"{{"call":{},"target":"{}"}}"#, n, query.target),
            has_more: self.endless_cursor,
            next_token: self.endless_cursor.then(|| format!("token-{}", n)),
            count: count + 1,
        })
    }

    async fn bulk_ranks(&self, targets: &[String]) -> Result<String> {
        let n = self.record(ProviderCall::BulkRanks {
            targets: targets.to_vec(),
        })?;
        Ok(format!(r#"{{"call":{},"items_count":{}}}"#, n, targets.len()))
    }

    async fn bulk_referring_domains(&self, targets: &[String]) -> Result<String> {
        let n = self.record(ProviderCall::BulkReferringDomains {
            targets: targets.to_vec(),
        })?;
        Ok(format!(r#"{{"call":{},"items_count":{}}}"#, n, targets.len()))
    }

    async fn bulk_new_lost(&self, targets: &[String], from_month: &str) -> Result<String> {
        let n = self.record(ProviderCall::BulkNewLost {
            targets: targets.to_vec(),
            from_month: from_month.to_string(),
        })?;
        Ok(format!(r#"{{"call":{},"items_count":{}}}"#, n, targets.len()))
    }

    async fn post_on_page_tasks(
        &self,
        targets: &[String],
        max_crawl_pages: u32,
    ) -> Result<Vec<String>> {
        self.record(ProviderCall::OnPagePost {
            targets: targets.to_vec(),
            max_crawl_pages,
        })?;

        let mut next = self.next_task.lock().unwrap();
        Ok(targets
            .iter()
            .map(|_| {
                *next += 1;
                format!("task-{}", *next)
            })
            .collect())
    }

    async fn fetch_on_page_results(&self, task_ids: &[String]) -> Result<Vec<(String, String)>> {
        self.record(ProviderCall::OnPageFetch {
            task_ids: task_ids.to_vec(),
        })?;
        if self.fail_on_page_fetch {
            bail!("On-page summary is not ready");
        }

        Ok(task_ids
            .iter()
            .map(|id| (id.clone(), format!(r#"{{"task_id":"{}"}}"#, id)))
            .collect())
    }
}

// =============================================================================
// Mock Webhook
// =============================================================================

/// A delivered webhook with its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookCall {
    pub payload: WebhookPayload,
    pub callback_uri: String,
}

pub struct MockWebhook {
    calls: Arc<Mutex<Vec<WebhookCall>>>,
    fail: bool,
}

impl MockWebhook {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Record calls but report a transport error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all webhook calls
    pub fn calls(&self) -> Vec<WebhookCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the only webhook call, panicking if there is not exactly one
    pub fn single(&self) -> WebhookCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one webhook call");
        calls[0].clone()
    }
}

#[async_trait]
impl BaseWebhook for MockWebhook {
    async fn call_webhook(&self, payload: &WebhookPayload, callback_uri: &str) -> Result<()> {
        self.calls.lock().unwrap().push(WebhookCall {
            payload: payload.clone(),
            callback_uri: callback_uri.to_string(),
        });
        if self.fail {
            bail!("Webhook {} is unreachable", callback_uri);
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub source_set: Arc<MockSourceSet>,
    pub raw_store: Arc<MemoryRawStore>,
    pub provider: Arc<MockDataProvider>,
    pub webhook: Arc<MockWebhook>,
    pub plans: HarvestPlans,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            source_set: Arc::new(MockSourceSet::new()),
            raw_store: Arc::new(MemoryRawStore::new()),
            provider: Arc::new(MockDataProvider::new()),
            webhook: Arc::new(MockWebhook::new()),
            plans: HarvestPlans::default(),
        }
    }

    /// Set a mock source set
    pub fn mock_source_set(mut self, source_set: MockSourceSet) -> Self {
        self.source_set = Arc::new(source_set);
        self
    }

    /// Set a memory raw store
    pub fn mock_raw_store(mut self, raw_store: MemoryRawStore) -> Self {
        self.raw_store = Arc::new(raw_store);
        self
    }

    /// Set a mock data provider
    pub fn mock_provider(mut self, provider: MockDataProvider) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Set a mock webhook
    pub fn mock_webhook(mut self, webhook: MockWebhook) -> Self {
        self.webhook = Arc::new(webhook);
        self
    }

    /// Override the workflow plans
    pub fn with_plans(mut self, plans: HarvestPlans) -> Self {
        self.plans = plans;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn server_deps(&self) -> Arc<ServerDeps> {
        Arc::new(
            ServerDeps::new(
                self.source_set.clone(),
                self.raw_store.clone(),
                self.provider.clone(),
                self.webhook.clone(),
            )
            .with_plans(self.plans.clone()),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
