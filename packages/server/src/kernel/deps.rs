//! Server dependencies for workflows (using traits for testability)
//!
//! This module provides the central dependency container handed to every run.
//! All external services use trait abstractions to enable testing.

use std::sync::Arc;

use crate::domains::harvesting::HarvestPlans;
use crate::kernel::{
    BaseDataProvider, BaseRawStore, BaseSourceSet, BaseWebhook, DEFAULT_CONNECTOR_NAME,
};

/// Server dependencies accessible to workflows (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub source_set: Arc<dyn BaseSourceSet>,
    pub raw_store: Arc<dyn BaseRawStore>,
    pub provider: Arc<dyn BaseDataProvider>,
    pub webhook: Arc<dyn BaseWebhook>,
    /// First path segment under `raw/in/`
    pub connector_name: String,
    pub plans: HarvestPlans,
}

impl ServerDeps {
    /// Create new ServerDeps with production plans
    pub fn new(
        source_set: Arc<dyn BaseSourceSet>,
        raw_store: Arc<dyn BaseRawStore>,
        provider: Arc<dyn BaseDataProvider>,
        webhook: Arc<dyn BaseWebhook>,
    ) -> Self {
        Self {
            source_set,
            raw_store,
            provider,
            webhook,
            connector_name: DEFAULT_CONNECTOR_NAME.to_string(),
            plans: HarvestPlans::default(),
        }
    }

    pub fn with_connector_name(mut self, connector_name: impl Into<String>) -> Self {
        self.connector_name = connector_name.into();
        self
    }

    pub fn with_plans(mut self, plans: HarvestPlans) -> Self {
        self.plans = plans;
        self
    }
}
