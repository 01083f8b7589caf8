// file: src/report/assembler.rs
// description: folds per-term results into the group -> term -> results report
// reference: deterministic ordering independent of request order

use crate::models::{GroupedReport, ReportGroup, TermResults};
use crate::search::TermResultMap;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Without a group map all terms with results go, in search order, into the
/// implicit group. With one, groups are sorted by label and terms by text.
/// Empty terms and groups never appear in the result.
pub fn assemble(results: &TermResultMap, groups: Option<&HashMap<String, String>>) -> GroupedReport {
    let Some(group_map) = groups else {
        let terms = results
            .iter()
            .filter(|entry| !entry.results.is_empty())
            .cloned()
            .collect();
        return GroupedReport::new(vec![ReportGroup { label: None, terms }]);
    };

    let labels: BTreeSet<&String> = group_map.values().collect();
    let mut pairs: Vec<(&String, &String)> = group_map.iter().collect();
    pairs.sort();

    let report_groups = labels
        .into_iter()
        .map(|label| {
            let terms = pairs
                .iter()
                .filter(|(_, group)| *group == label)
                .filter_map(|(term, _)| {
                    let found = results.get(term.as_str())?;
                    (!found.is_empty()).then(|| TermResults::new(term.as_str(), found.to_vec()))
                })
                .collect();

            ReportGroup {
                label: Some(label.clone()),
                terms,
            }
        })
        .collect();

    let report = GroupedReport::new(report_groups);
    debug!(
        "Assembled {} groups with {} results",
        report.groups().len(),
        report.result_count()
    );
    report
}
