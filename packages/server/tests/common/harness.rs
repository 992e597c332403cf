//! Test harness for workflow and route integration tests.
//!
//! Every harness owns its own in-memory doubles, so tests never share state.

use std::sync::Arc;

use harvester_core::domains::harvesting::{run_workflow, HarvestPlans, RunReport, Workflow};
use harvester_core::kernel::test_dependencies::{
    MemoryRawStore, MockDataProvider, MockSourceSet, MockWebhook, TestDependencies,
};
use harvester_core::kernel::ServerDeps;
use test_context::AsyncTestContext;

pub const CALLBACK_URI: &str = "https://hooks.example/harvest";

/// Test harness wrapping the mock dependencies.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let report = ctx.run(BulkRanksRequest { .. }).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new(TestDependencies::new())
    }

    async fn teardown(self) {
        // Doubles are dropped with the harness
    }
}

impl TestHarness {
    pub fn new(deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self { deps }
    }

    pub fn with_source(source_set: MockSourceSet) -> Self {
        Self::new(TestDependencies::new().mock_source_set(source_set))
    }

    pub fn source_set(&self) -> &MockSourceSet {
        &self.deps.source_set
    }

    pub fn raw_store(&self) -> &MemoryRawStore {
        &self.deps.raw_store
    }

    pub fn provider(&self) -> &MockDataProvider {
        &self.deps.provider
    }

    pub fn webhook(&self) -> &MockWebhook {
        &self.deps.webhook
    }

    pub fn plans(&self) -> HarvestPlans {
        self.deps.plans.clone()
    }

    pub fn server_deps(&self) -> Arc<ServerDeps> {
        self.deps.server_deps()
    }

    /// Run a workflow to completion on the current task.
    pub async fn run<W: Workflow>(&self, request: W) -> RunReport {
        run_workflow(request, self.server_deps())
            .await
            .expect("outcome report should succeed")
    }

    /// Wait for every detached follow-up task of a run.
    pub async fn settle(&self, report: &mut RunReport) {
        for handle in report.background.drain(..) {
            handle.await.expect("background task panicked");
        }
    }
}
