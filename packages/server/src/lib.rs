// DataForSEO Harvester - Orchestrator Core
//
// Drives rate-limited bulk calls against the DataForSEO API, persists every
// raw response into a run-scoped raw store, and reports the outcome of each
// run through a webhook callback.
//
// Workflows live in domains/harvesting/workflows/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
