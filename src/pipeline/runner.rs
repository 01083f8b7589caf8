// file: src/pipeline/runner.rs
// description: runs one job end to end, from term resolution to report files
// reference: resolve -> search -> assemble -> render

use crate::config::Config;
use crate::error::Result;
use crate::jobs::JobDefinition;
use crate::models::{GroupedReport, TermSet};
use crate::pipeline::progress::{ProgressTracker, RunStats};
use crate::report::{DeliveryManifest, ReportWriter, assemble};
use crate::search::{DouClient, SearchClient, SearchOrchestrator};
use crate::terms::{ConfigVariableStore, SqliteQueryRunner, TermSourceResolver};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub report: GroupedReport,
    /// `None` when no term had results and nothing was written.
    pub manifest: Option<DeliveryManifest>,
    pub stats: RunStats,
}

pub struct JobRunner {
    resolver: TermSourceResolver,
    orchestrator: SearchOrchestrator,
    writer: ReportWriter,
    show_progress: bool,
    colored: bool,
}

impl JobRunner {
    pub fn new(
        resolver: TermSourceResolver,
        orchestrator: SearchOrchestrator,
        writer: ReportWriter,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
            writer,
            show_progress: false,
            colored: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client: Arc<dyn SearchClient> = Arc::new(DouClient::new(&config.search)?);
        let resolver = TermSourceResolver::new(
            Arc::new(ConfigVariableStore::new(config.variables.clone())),
            Arc::new(SqliteQueryRunner::new(config.connections.clone())),
        );
        let writer = ReportWriter::new(config.report.output_dir.clone())?;

        Ok(Self::new(resolver, SearchOrchestrator::new(client), writer))
    }

    /// Draws progress bars while searching.
    pub fn with_progress(mut self, colored: bool) -> Self {
        self.show_progress = true;
        self.colored = colored;
        self
    }

    pub async fn resolve_terms(&self, job: &JobDefinition) -> Result<TermSet> {
        self.resolver.resolve(&job.terms).await
    }

    /// Runs `job` with its own term source, or with `terms` when given.
    pub async fn run(&self, job: &JobDefinition, terms: Option<TermSet>) -> Result<RunSummary> {
        self.run_on(job, terms, Local::now().date_naive()).await
    }

    pub async fn run_on(
        &self,
        job: &JobDefinition,
        terms: Option<TermSet>,
        date: NaiveDate,
    ) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        info!("Starting run {} of job {}", run_id, job.id);

        let terms = match terms {
            Some(terms) => terms,
            None => self.resolve_terms(job).await?,
        };

        if terms.is_empty() {
            warn!("Job {} has no search terms", job.id);
        }

        let progress = if self.show_progress {
            ProgressTracker::with_color(terms.len(), self.colored)
        } else {
            ProgressTracker::hidden(terms.len())
        };

        let results = self
            .orchestrator
            .search_all(terms.terms(), &job.search, &progress)
            .await?;
        progress.finish();
        let stats = progress.get_stats();

        let report = assemble(&results, terms.group_map().as_ref());

        let manifest = if report.is_empty() {
            info!("No results for job {}, nothing to deliver", job.id);
            None
        } else {
            Some(
                self.writer
                    .write(&job.id, run_id, &job.report, &report, date)?,
            )
        };

        Ok(RunSummary {
            run_id,
            report,
            manifest,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::jobs::{ReportSettings, TermSpec};
    use crate::models::{Field, SearchDate, SearchResult, Section};
    use crate::search::SearchParams;
    use crate::terms::{QueryRunner, Table};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FakeClient(HashMap<String, Vec<SearchResult>>);

    #[async_trait]
    impl SearchClient for FakeClient {
        async fn search(
            &self,
            term: &str,
            _sections: &[Section],
            _date: SearchDate,
            _field: Field,
            _exact: bool,
        ) -> Result<Vec<SearchResult>> {
            Ok(self.0.get(term).cloned().unwrap_or_default())
        }
    }

    struct NoQuery;

    #[async_trait]
    impl QueryRunner for NoQuery {
        async fn run_query(&self, _sql: &str, _connection: &str) -> Result<Table> {
            Err(PipelineError::ExternalService("unavailable".to_string()))
        }
    }

    fn job(terms: TermSpec) -> JobDefinition {
        JobDefinition {
            id: "test_job".to_string(),
            description: "test".to_string(),
            schedule: "0 2 * * *".to_string(),
            tags: vec![],
            terms,
            search: SearchParams::default(),
            report: ReportSettings {
                emails: vec!["a@example.com".to_string()],
                subject: "Test".to_string(),
                attach_csv: true,
            },
            source: PathBuf::from("test.yaml"),
        }
    }

    fn runner(temp: &TempDir, responses: Vec<(&str, Vec<SearchResult>)>) -> JobRunner {
        let client = FakeClient(
            responses
                .into_iter()
                .map(|(t, r)| (t.to_string(), r))
                .collect(),
        );
        let resolver = TermSourceResolver::new(
            Arc::new(ConfigVariableStore::default()),
            Arc::new(NoQuery),
        );
        let orchestrator =
            SearchOrchestrator::new(Arc::new(client)).with_base_interval(Duration::ZERO);
        JobRunner::new(resolver, orchestrator, ReportWriter::new(temp.path()).unwrap())
    }

    fn result() -> SearchResult {
        SearchResult::new(Section::Secao1, "ATO", "url", "Nomear <b>X</b>", "16/10/2026")
    }

    #[tokio::test]
    async fn test_run_writes_report() {
        let temp = TempDir::new().unwrap();
        let runner = runner(&temp, vec![("x", vec![result()])]);

        let summary = runner
            .run(&job(TermSpec::List(vec!["x".to_string(), "y".to_string()])), None)
            .await
            .unwrap();

        assert_eq!(summary.stats.terms_searched, 2);
        assert_eq!(summary.report.result_count(), 1);
        let manifest = summary.manifest.unwrap();
        assert_eq!(manifest.run_id, summary.run_id);
        assert!(temp.path().join("test_job/report.html").exists());
    }

    #[tokio::test]
    async fn test_run_without_results_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = runner(&temp, vec![]);

        let summary = runner
            .run(&job(TermSpec::List(vec!["x".to_string()])), None)
            .await
            .unwrap();

        assert!(summary.report.is_empty());
        assert!(summary.manifest.is_none());
        assert!(!temp.path().join("test_job").exists());
    }

    #[tokio::test]
    async fn test_term_override_skips_resolution() {
        let temp = TempDir::new().unwrap();
        let runner = runner(&temp, vec![("x", vec![result()])]);
        let spec = TermSpec::Query {
            query: "SELECT 1".to_string(),
            connection: "db".to_string(),
        };

        assert!(runner.run(&job(spec.clone()), None).await.is_err());

        let summary = runner
            .run(&job(spec), Some(TermSet::from_terms(["x"])))
            .await
            .unwrap();
        assert_eq!(summary.report.result_count(), 1);
    }
}
