pub mod requests;
pub mod run;

pub use requests::{
    BacklinksRequest, BulkNewLostRequest, BulkRanksRequest, BulkReferringRequest, OnPageRequest,
    SerpRequest,
};
pub use run::{raw_path, CallType, RunContext, RunId, RunState};
