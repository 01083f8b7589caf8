// file: src/search/orchestrator.rs
// description: sequential per-term search with request pacing and signature filtering
// reference: one request at a time against a shared public service

use crate::error::Result;
use crate::models::{Field, SearchDate, SearchResult, Section, TermResults};
use crate::pipeline::ProgressTracker;
use crate::search::client::SearchClient;
use crate::search::signature::SignatureFilter;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Mean pause between two search requests.
pub const SCRAPING_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub sections: Vec<Section>,
    pub date: SearchDate,
    pub field: Field,
    pub is_exact_search: bool,
    pub ignore_signature_match: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            sections: vec![Section::Todos],
            date: SearchDate::Dia,
            field: Field::Tudo,
            is_exact_search: true,
            ignore_signature_match: false,
        }
    }
}

/// Filtered results per term, in search order. Terms without results are
/// kept with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermResultMap {
    entries: Vec<TermResults>,
}

impl TermResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the results of a term already present.
    pub fn insert(&mut self, term: impl Into<String>, results: Vec<SearchResult>) {
        let term = term.into();
        match self.entries.iter_mut().find(|e| e.term == term) {
            Some(entry) => entry.results = results,
            None => self.entries.push(TermResults::new(term, results)),
        }
    }

    pub fn get(&self, term: &str) -> Option<&[SearchResult]> {
        self.entries
            .iter()
            .find(|e| e.term == term)
            .map(|e| e.results.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TermResults> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn result_count(&self) -> usize {
        self.entries.iter().map(|e| e.results.len()).sum()
    }
}

impl FromIterator<(String, Vec<SearchResult>)> for TermResultMap {
    fn from_iter<T: IntoIterator<Item = (String, Vec<SearchResult>)>>(iter: T) -> Self {
        let mut map = TermResultMap::new();
        for (term, results) in iter {
            map.insert(term, results);
        }
        map
    }
}

/// Uniform in `[0, 2 * base)`.
fn jitter(base: Duration) -> Duration {
    let factor: f64 = rand::rng().random();
    base.mul_f64(factor * 2.0)
}

pub struct SearchOrchestrator {
    client: Arc<dyn SearchClient>,
    base_interval: Duration,
}

impl SearchOrchestrator {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self {
            client,
            base_interval: SCRAPING_INTERVAL,
        }
    }

    pub fn with_base_interval(mut self, base_interval: Duration) -> Self {
        self.base_interval = base_interval;
        self
    }

    /// Searches every term in order. The first failing request aborts the
    /// whole run; nothing is retried here.
    pub async fn search_all(
        &self,
        terms: &[String],
        params: &SearchParams,
        progress: &ProgressTracker,
    ) -> Result<TermResultMap> {
        let filter = SignatureFilter::new(params.ignore_signature_match);
        info!(
            "Searching {} terms (exact: {}, signature filter: {})",
            terms.len(),
            params.is_exact_search,
            filter.is_enabled()
        );

        let mut map = TermResultMap::new();

        for term in terms {
            progress.set_message(format!("Searching {}", term));

            let raw = self
                .client
                .search(
                    term,
                    &params.sections,
                    params.date,
                    params.field,
                    params.is_exact_search,
                )
                .await?;

            let (kept, discarded) = filter.apply(raw, term);
            if discarded > 0 {
                debug!("Discarded {} signature matches for {:?}", discarded, term);
            }

            progress.record_term(kept.len(), discarded);
            map.insert(term.clone(), kept);

            tokio::time::sleep(jitter(self.base_interval)).await;
        }

        Ok(map)
    }
}
