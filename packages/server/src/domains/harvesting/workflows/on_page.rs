//! On-page crawling: post task pages now, fetch their results later.
//!
//! Each posted page gets its own detached poll task that sleeps for the poll
//! delay and then stores every task result under a directory keyed by the
//! task id. Poll tasks run concurrently with each other and with the post
//! loop; their failures are logged and never reach the webhook.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domains::harvesting::models::{CallType, OnPageRequest, RunContext, RunState};
use crate::domains::harvesting::pagination::OffsetPager;
use crate::domains::harvesting::sink::ResultSink;
use crate::domains::harvesting::throttle::Throttle;
use crate::domains::harvesting::workflow::Workflow;
use crate::kernel::{BaseDataProvider, BaseRawStore, ServerDeps};

impl OnPageRequest {
    /// Requested domains, or the fallback list when none were given.
    pub fn domains_or(&self, fallback: &[String]) -> Vec<String> {
        match &self.domains {
            Some(domains) if !domains.is_empty() => domains.clone(),
            _ => fallback.to_vec(),
        }
    }
}

/// Everything a detached poll needs, owned so it can outlive the run loop.
struct PollJob {
    provider: Arc<dyn BaseDataProvider>,
    store: Arc<dyn BaseRawStore>,
    delay: Duration,
    page: usize,
    task_ids: Vec<String>,
    /// Result directory per task id
    directories: HashMap<String, String>,
}

impl PollJob {
    async fn run(self) {
        tokio::time::sleep(self.delay).await;

        if let Err(e) = self.fetch_and_store().await {
            tracing::error!(
                page = self.page,
                tasks = self.task_ids.len(),
                error = ?e,
                "On-page poll failed"
            );
        }
    }

    async fn fetch_and_store(&self) -> Result<()> {
        let results = self.provider.fetch_on_page_results(&self.task_ids).await?;

        for (task_id, payload) in results {
            let directory = self
                .directories
                .get(&task_id)
                .with_context(|| format!("Provider returned unknown on-page task {}", task_id))?;
            let mut sink = ResultSink::new(self.store.clone(), directory.clone());
            sink.push(payload);
            sink.flush()
                .await
                .with_context(|| format!("Failed to store on-page result for task {}", task_id))?;

            tracing::debug!(task_id = %task_id, page = self.page, "On-page result stored");
        }
        Ok(())
    }
}

#[async_trait]
impl Workflow for OnPageRequest {
    const CALL_TYPE: CallType = CallType::OnPage;

    fn callback_uri(&self) -> Option<&str> {
        self.callback_uri.as_deref()
    }

    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize> {
        let plan = &deps.plans.on_page;
        let domains = self.domains_or(&plan.fallback_domains);

        let mut throttle = Throttle::new(plan.throttle);

        for page in OffsetPager::new(&domains, self.batch_size)? {
            run.enter(RunState::Paging);
            if page.is_empty() {
                continue;
            }

            let task_ids = deps
                .provider
                .post_on_page_tasks(page.items, plan.max_crawl_pages)
                .await
                .with_context(|| format!("On-page post for page {} failed", page.index))?;

            tracing::debug!(
                run_id = %run.run_id,
                page = page.index,
                tasks = task_ids.len(),
                "On-page tasks posted"
            );

            let directories = task_ids
                .iter()
                .map(|id| (id.clone(), run.task_directory(id)))
                .collect();
            let job = PollJob {
                provider: deps.provider.clone(),
                store: deps.raw_store.clone(),
                delay: plan.poll_delay,
                page: page.index,
                task_ids,
                directories,
            };
            run.spawn_detached(job.run());

            throttle.tick().await;
        }

        ResultSink::new(deps.raw_store.clone(), run.directory())
            .save_settings(self)
            .await?;
        Ok(domains.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_domain_list_falls_back() {
        let fallback = vec!["a.nl".to_string()];
        let request = OnPageRequest {
            domains: Some(Vec::new()),
            ..OnPageRequest::default()
        };
        assert_eq!(request.domains_or(&fallback), fallback);
    }

    #[test]
    fn requested_domains_win() {
        let request = OnPageRequest {
            domains: Some(vec!["b.nl".to_string()]),
            ..OnPageRequest::default()
        };
        assert_eq!(request.domains_or(&["a.nl".to_string()]), vec!["b.nl"]);
    }
}
