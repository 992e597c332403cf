//! Run coordinator shared by every workflow.
//!
//! A workflow only describes its loop ([`Workflow::execute`]). Starting the
//! run, converting any error into the failure payload and delivering the one
//! terminal report happen here.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;

use super::models::{CallType, RunContext, RunId, RunState};
use super::outcome::OutcomeReporter;
use super::plan::SourceQuery;
use crate::common::WebhookPayload;
use crate::kernel::ServerDeps;

#[async_trait]
pub trait Workflow: Serialize + Send + Sync + 'static {
    const CALL_TYPE: CallType;

    fn callback_uri(&self) -> Option<&str>;

    /// Drive the whole loop. Returns the number of source items processed.
    async fn execute(&self, run: &mut RunContext, deps: &ServerDeps) -> Result<usize>;
}

/// What a finished run produced, for callers that want to observe it.
pub struct RunReport {
    pub run_id: RunId,
    pub payload: WebhookPayload,
    /// Whether the webhook was called
    pub delivered: bool,
    /// Follow-up tasks still running after the run itself ended
    pub background: Vec<JoinHandle<()>>,
}

/// Load a source set and keep its first column.
pub async fn fetch_source(deps: &ServerDeps, query: &SourceQuery) -> Result<Vec<String>> {
    let rows = deps
        .source_set
        .fetch_all(&query.table, &query.schema, &query.columns)
        .await
        .with_context(|| format!("Failed to fetch source set {}.{}", query.schema, query.table))?;

    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().next().unwrap_or_default())
        .collect())
}

/// Execute one run to its terminal state and report the outcome.
///
/// Errors only when the outcome report itself fails.
pub async fn run_workflow<W: Workflow>(request: W, deps: Arc<ServerDeps>) -> Result<RunReport> {
    let mut run = RunContext::start(deps.connector_name.clone(), W::CALL_TYPE);
    tracing::info!(
        run_id = %run.run_id,
        call_type = %run.call_type,
        directory = %run.directory(),
        "Run started"
    );

    let payload = match request.execute(&mut run, &deps).await {
        Ok(processed) => {
            run.enter(RunState::ReportingSuccess);
            tracing::info!(
                run_id = %run.run_id,
                call_type = %run.call_type,
                processed,
                "Run succeeded"
            );
            WebhookPayload::ok(W::CALL_TYPE.success_message(processed))
        }
        Err(e) => {
            run.enter(RunState::ReportingFailure);
            tracing::error!(
                run_id = %run.run_id,
                call_type = %run.call_type,
                error = %e,
                "Run failed"
            );
            WebhookPayload::bad_request(W::CALL_TYPE.failure_message(), format!("{:?}", e))
        }
    };

    let reporter = OutcomeReporter::new(deps.webhook.clone(), W::CALL_TYPE.report_policy());
    let delivered = reporter.report(&payload, request.callback_uri()).await?;

    Ok(RunReport {
        run_id: run.run_id,
        payload,
        delivered,
        background: run.take_background(),
    })
}

/// Start a run detached from the caller. The handle is usually dropped.
pub fn spawn_workflow<W: Workflow>(request: W, deps: Arc<ServerDeps>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = run_workflow(request, deps).await {
            tracing::warn!(
                call_type = %W::CALL_TYPE,
                error = %e,
                "Outcome report failed"
            );
        }
    })
}
