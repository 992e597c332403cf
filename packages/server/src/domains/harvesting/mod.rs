//! Bulk harvesting of DataForSEO data into the raw store.

pub mod models;
pub mod outcome;
pub mod pagination;
pub mod plan;
pub mod sink;
pub mod throttle;
pub mod workflow;
pub mod workflows;

pub use models::*;
pub use outcome::{OutcomeReporter, ReportPolicy};
pub use plan::{
    HarvestPlans, OnPagePlan, SourceQuery, WorkflowPlan, DEFAULT_ON_PAGE_DOMAINS,
    ON_PAGE_POLL_DELAY,
};
pub use sink::ResultSink;
pub use throttle::{Throttle, ThrottleConfig};
pub use workflow::{run_workflow, spawn_workflow, RunReport, Workflow};
