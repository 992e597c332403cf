//! Per-workflow constants: where the source set comes from, how it is paged,
//! and how hard the provider is throttled.

use std::time::Duration;

use dataforseo_client::{DEFAULT_MAX_CRAWL_PAGES, MAX_TASKS_PER_POST};

use super::throttle::ThrottleConfig;

/// Pause length shared by every throttled workflow.
pub const THROTTLE_PAUSE: Duration = Duration::from_secs(60);

/// Delay between posting on-page tasks and fetching their results.
pub const ON_PAGE_POLL_DELAY: Duration = Duration::from_secs(60);

/// Bulk endpoints accept up to this many targets per call.
pub const BULK_MAX_PER_CALL: usize = 1000;

/// Crawled when an on-page request names no domains.
pub const DEFAULT_ON_PAGE_DOMAINS: &[&str] = &[
    "Triggre.com",
    "Smart-promotions.nl",
    "Vloerenmantegels.nl",
    "Tegelpaleis.nl",
    "Moneypenny.nl",
    "Hasci.nl",
    "Goossenswonen.nl",
    "Drone-zaak.nl",
    "Bloedwaardentest.nl",
    "711.nl",
    "Kansino.nl",
    "fairplaycasino.nl",
    "Bagageonline.nl",
    "Perfectviewcrm.nl",
    "Mijnlabtest.nl",
    "Body-supplies.nl",
    "Plent.nl",
    "Leef.nl",
    "Procardio.nl",
    "Wildstore.nl",
    "Partly.nl",
    "Fixje.nl",
    "Refurbished.nl",
];

/// Table and column a workflow reads its source set from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub table: String,
    pub schema: String,
    pub columns: Vec<String>,
}

impl SourceQuery {
    pub fn new(table: &str, schema: &str, column: &str) -> Self {
        Self {
            table: table.to_string(),
            schema: schema.to_string(),
            columns: vec![column.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPlan {
    pub source: SourceQuery,
    /// Offset page or bulk batch size; unused by cursor workflows
    pub page_size: usize,
    pub throttle: ThrottleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnPagePlan {
    pub throttle: ThrottleConfig,
    pub poll_delay: Duration,
    pub max_crawl_pages: u32,
    pub fallback_domains: Vec<String>,
}

/// Every workflow's plan. `Default` carries the production values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestPlans {
    pub serp: WorkflowPlan,
    pub backlinks: WorkflowPlan,
    pub bulk: WorkflowPlan,
    pub on_page: OnPagePlan,
}

impl Default for HarvestPlans {
    fn default() -> Self {
        Self {
            serp: WorkflowPlan {
                source: SourceQuery::new("Keywords50000", "dbo", "keyword"),
                page_size: MAX_TASKS_PER_POST,
                throttle: ThrottleConfig::every(1000, THROTTLE_PAUSE),
            },
            backlinks: WorkflowPlan {
                source: SourceQuery::new("Domains", "dbo", "domain"),
                page_size: 1,
                throttle: ThrottleConfig::every(2000, THROTTLE_PAUSE),
            },
            bulk: WorkflowPlan {
                source: SourceQuery::new("DataForSEOMergedSerpHouse", "dbo", "domain"),
                page_size: BULK_MAX_PER_CALL,
                throttle: ThrottleConfig::unthrottled(),
            },
            on_page: OnPagePlan {
                throttle: ThrottleConfig::every(2000, THROTTLE_PAUSE),
                poll_delay: ON_PAGE_POLL_DELAY,
                max_crawl_pages: DEFAULT_MAX_CRAWL_PAGES,
                fallback_domains: DEFAULT_ON_PAGE_DOMAINS
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
            },
        }
    }
}
