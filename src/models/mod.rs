// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod report;
pub mod search_result;
pub mod term_set;

pub use report::{GroupedReport, ReportGroup, ReportRow, TermResults};
pub use search_result::{Field, SearchDate, SearchResult, Section};
pub use term_set::TermSet;
