//! Kernel module - server infrastructure and dependencies.

pub mod dataforseo_client;
pub mod deps;
pub mod raw_store;
pub mod source_set;
pub mod test_dependencies;
pub mod traits;
pub mod webhook;

/// Connector segment used in raw store paths unless configured otherwise.
pub const DEFAULT_CONNECTOR_NAME: &str = "dataforseo";

pub use dataforseo_client::DataForSeoProvider;
pub use deps::ServerDeps;
pub use raw_store::LocalRawStore;
pub use source_set::PostgresSourceSet;
pub use traits::*;
pub use webhook::HttpWebhookClient;
