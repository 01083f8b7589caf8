// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod terms;
pub mod utils;

pub use config::{Config, JobsConfig, ReportConfig, SearchConfig};
pub use error::{PipelineError, Result};
pub use jobs::{JobDefinition, JobRegistry, ReportSettings, TermSpec, hash_offset};
pub use models::{
    Field, GroupedReport, ReportGroup, ReportRow, SearchDate, SearchResult, Section, TermResults,
    TermSet,
};
pub use pipeline::{JobRunner, ProgressTracker, RunStats, RunSummary};
pub use report::{DeliveryManifest, ReportWriter, assemble, render_html, rows, to_csv};
pub use search::{
    DouClient, SearchClient, SearchOrchestrator, SearchParams, SignatureFilter, TermResultMap,
};
pub use terms::{ConfigVariableStore, SqliteQueryRunner, TermSourceResolver};
pub use utils::Validator;
