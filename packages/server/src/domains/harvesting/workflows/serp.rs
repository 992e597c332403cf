//! SERP task queueing over offset pages of keywords.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domains::harvesting::models::{CallType, RunContext, RunState, SerpRequest};
use crate::domains::harvesting::pagination::OffsetPager;
use crate::domains::harvesting::sink::ResultSink;
use crate::domains::harvesting::throttle::Throttle;
use crate::domains::harvesting::workflow::{fetch_source, Workflow};
use crate::kernel::ServerDeps;

#[async_trait]
impl Workflow for SerpRequest {
    const CALL_TYPE: CallType = CallType::SerpTaskPost;

    fn callback_uri(&self) -> Option<&str> {
        Some(&self.callback_uri)
    }

    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize> {
        let plan = &deps.plans.serp;
        let keywords = fetch_source(deps, &plan.source).await?;
        let options = self.task_options();

        let mut sink = ResultSink::new(deps.raw_store.clone(), run.directory());
        let mut throttle = Throttle::new(plan.throttle);

        for page in OffsetPager::new(&keywords, plan.page_size)? {
            run.enter(RunState::Paging);
            if page.is_empty() {
                continue;
            }

            tracing::debug!(
                run_id = %run.run_id,
                page = page.index,
                keywords = page.items.len(),
                "Queueing SERP tasks"
            );
            let payload = deps
                .provider
                .queue_serp_tasks(page.items, &options)
                .await
                .with_context(|| format!("SERP page {} failed", page.index))?;

            run.enter(RunState::Flushing);
            sink.push(payload);
            sink.flush().await?;

            throttle.tick().await;
        }

        sink.save_settings(self).await?;
        Ok(keywords.len())
    }
}
