// file: src/models/report.rs
// description: grouped report structure and flattened export rows
// reference: group -> term -> results hierarchy

use crate::models::SearchResult;
use serde::Serialize;

/// Results kept for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermResults {
    pub term: String,
    pub results: Vec<SearchResult>,
}

impl TermResults {
    pub fn new(term: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            term: term.into(),
            results,
        }
    }
}

/// A labelled group, or the implicit single group when `label` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportGroup {
    pub label: Option<String>,
    pub terms: Vec<TermResults>,
}

impl ReportGroup {
    pub fn term(&self, term: &str) -> Option<&TermResults> {
        self.terms.iter().find(|t| t.term == term)
    }

    pub fn result_count(&self) -> usize {
        self.terms.iter().map(|t| t.results.len()).sum()
    }
}

/// Every group holds at least one term, and every term at least one result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedReport {
    groups: Vec<ReportGroup>,
}

impl GroupedReport {
    /// Drops empty terms, then groups left without terms.
    pub fn new(groups: Vec<ReportGroup>) -> Self {
        let groups = groups
            .into_iter()
            .map(|mut group| {
                group.terms.retain(|t| !t.results.is_empty());
                group
            })
            .filter(|group| !group.terms.is_empty())
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[ReportGroup] {
        &self.groups
    }

    pub fn group(&self, label: &str) -> Option<&ReportGroup> {
        self.groups
            .iter()
            .find(|g| g.label.as_deref() == Some(label))
    }

    pub fn implicit_group(&self) -> Option<&ReportGroup> {
        self.groups.iter().find(|g| g.label.is_none())
    }

    /// Labels in report order; `None` stands for the implicit group.
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.groups.iter().map(|g| g.label.as_deref()).collect()
    }

    /// False when the only group present is the implicit one.
    pub fn is_grouped(&self) -> bool {
        self.groups.iter().any(|g| g.label.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn result_count(&self) -> usize {
        self.groups.iter().map(ReportGroup::result_count).sum()
    }
}

/// One exported line per result. `group` is `None` for ungrouped reports,
/// in which case the column is left out of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub group: Option<String>,
    pub term: String,
    pub section: String,
    pub url: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub date: String,
}
