//! The three bulk lookups. They share one batch loop and differ only in the
//! provider call.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::domains::harvesting::models::{
    BulkNewLostRequest, BulkRanksRequest, BulkReferringRequest, CallType, RunContext, RunState,
};
use crate::domains::harvesting::pagination::BulkBatches;
use crate::domains::harvesting::sink::ResultSink;
use crate::domains::harvesting::throttle::Throttle;
use crate::domains::harvesting::workflow::{fetch_source, Workflow};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy)]
enum BulkLookup<'a> {
    Ranks,
    ReferringDomains,
    NewLost { from_month: &'a str },
}

impl BulkLookup<'_> {
    async fn call(&self, deps: &ServerDeps, targets: &[String]) -> Result<String> {
        match self {
            BulkLookup::Ranks => deps.provider.bulk_ranks(targets).await,
            BulkLookup::ReferringDomains => deps.provider.bulk_referring_domains(targets).await,
            BulkLookup::NewLost { from_month } => {
                deps.provider.bulk_new_lost(targets, from_month).await
            }
        }
    }
}

async fn run_bulk<S: Serialize + Sync>(
    lookup: BulkLookup<'_>,
    settings: &S,
    run: &mut RunContext,
    deps: &ServerDeps,
) -> Result<usize> {
    let plan = &deps.plans.bulk;
    let domains = fetch_source(deps, &plan.source).await?;

    let mut sink = ResultSink::new(deps.raw_store.clone(), run.directory());
    let mut throttle = Throttle::new(plan.throttle);

    for batch in BulkBatches::new(&domains, plan.page_size)? {
        run.enter(RunState::Paging);
        tracing::debug!(
            run_id = %run.run_id,
            call_type = %run.call_type,
            batch = batch.index,
            targets = batch.items.len(),
            "Calling bulk lookup"
        );

        let payload = lookup
            .call(deps, batch.items)
            .await
            .with_context(|| format!("Bulk batch {} failed", batch.index))?;

        run.enter(RunState::Flushing);
        sink.push(payload);
        sink.flush().await?;

        throttle.tick().await;
    }

    sink.save_settings(settings).await?;
    Ok(domains.len())
}

#[async_trait]
impl Workflow for BulkRanksRequest {
    const CALL_TYPE: CallType = CallType::BulkRanks;

    fn callback_uri(&self) -> Option<&str> {
        Some(&self.callback_uri)
    }

    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize> {
        run_bulk(BulkLookup::Ranks, self, run, deps).await
    }
}

#[async_trait]
impl Workflow for BulkReferringRequest {
    const CALL_TYPE: CallType = CallType::BulkReferringDomains;

    fn callback_uri(&self) -> Option<&str> {
        Some(&self.callback_uri)
    }

    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize> {
        run_bulk(BulkLookup::ReferringDomains, self, run, deps).await
    }
}

#[async_trait]
impl Workflow for BulkNewLostRequest {
    const CALL_TYPE: CallType = CallType::BulkNewLost;

    fn callback_uri(&self) -> Option<&str> {
        Some(&self.callback_uri)
    }

    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize> {
        let lookup = BulkLookup::NewLost {
            from_month: &self.from_month,
        };
        run_bulk(lookup, self, run, deps).await
    }
}
