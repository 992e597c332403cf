//! Live backlinks, one cursor session per domain.

use anyhow::{Context, Result};
use async_trait::async_trait;
use dataforseo_client::{BacklinksQuery, BACKLINKS_PAGE_LIMIT};

use crate::domains::harvesting::models::{BacklinksRequest, CallType, RunContext, RunState};
use crate::domains::harvesting::pagination::drain_cursor;
use crate::domains::harvesting::sink::ResultSink;
use crate::domains::harvesting::throttle::Throttle;
use crate::domains::harvesting::workflow::{fetch_source, Workflow};
use crate::kernel::ServerDeps;

impl BacklinksRequest {
    fn query_for(&self, domain: &str) -> BacklinksQuery {
        BacklinksQuery {
            target: domain.to_string(),
            mode: self.mode,
            include_subdomains: self.include_subdomains,
            status_type: self.status_type,
            limit: BACKLINKS_PAGE_LIMIT,
        }
    }
}

#[async_trait]
impl Workflow for BacklinksRequest {
    const CALL_TYPE: CallType = CallType::BacklinksLive;

    fn callback_uri(&self) -> Option<&str> {
        Some(&self.callback_uri)
    }

    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize> {
        let plan = &deps.plans.backlinks;
        let domains = fetch_source(deps, &plan.source).await?;

        let mut sink = ResultSink::new(deps.raw_store.clone(), run.directory());
        let mut throttle = Throttle::new(plan.throttle);

        for domain in &domains {
            run.enter(RunState::Paging);
            let query = self.query_for(domain);
            let provider = deps.provider.clone();

            let drain = drain_cursor(|count, token| {
                let provider = provider.clone();
                let query = query.clone();
                async move { provider.backlinks_page(&query, count, token.as_deref()).await }
            })
            .await
            .with_context(|| format!("Backlinks cursor failed for {}", domain))?;

            tracing::debug!(
                run_id = %run.run_id,
                domain = %domain,
                calls = drain.calls,
                items = drain.count,
                "Backlinks cursor drained"
            );

            run.enter(RunState::Flushing);
            sink.extend(drain.payloads);
            sink.flush().await?;

            throttle.tick().await;
        }

        sink.save_settings(self).await?;
        Ok(domains.len())
    }
}
