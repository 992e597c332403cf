//! `Workflow` implementations, one per request type.

mod backlinks;
mod bulk;
mod on_page;
mod serp;
