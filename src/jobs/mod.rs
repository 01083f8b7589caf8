// file: src/jobs/mod.rs
// description: job definition, schedule and registry module exports
// reference: internal module structure

pub mod definition;
pub mod registry;
pub mod schedule;

pub use definition::{DEFAULT_SUBJECT, JobDefinition, ReportSettings, TermSpec};
pub use registry::JobRegistry;
pub use schedule::{MINUTES_PER_HOUR, effective_schedule, hash_offset};
