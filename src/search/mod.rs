// file: src/search/mod.rs
// description: gazette search module exports
// reference: internal module structure

pub mod client;
pub mod orchestrator;
pub mod patterns;
pub mod signature;

pub use client::{DouClient, SearchClient};
pub use orchestrator::{SCRAPING_INTERVAL, SearchOrchestrator, SearchParams, TermResultMap};
pub use signature::{SignatureFilter, is_signature_match, normalize};
