// file: src/jobs/registry.rs
// description: discovery of job definition files into an explicit registry
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::jobs::definition::JobDefinition;
use crate::utils::Validator;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// All job definitions found in a configuration directory, sorted by id.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Vec<JobDefinition>,
}

impl JobRegistry {
    pub fn discover(dir: &Path, default_schedule: &str) -> Result<Self> {
        Validator::validate_directory(dir)?;
        info!("Discovering job definitions in {}", dir.display());

        let mut jobs = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() || !is_yaml(entry.path()) {
                continue;
            }

            debug!("Loading job definition {}", entry.path().display());
            jobs.push(JobDefinition::from_file(entry.path(), default_schedule)?);
        }

        Self::from_jobs(jobs)
    }

    pub fn from_jobs(mut jobs: Vec<JobDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for job in &jobs {
            if !seen.insert(job.id.clone()) {
                return Err(PipelineError::Config(format!(
                    "job id `{}` is defined more than once (last seen in {})",
                    job.id,
                    job.source.display()
                )));
            }
        }

        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { jobs })
    }

    pub fn jobs(&self) -> &[JobDefinition] {
        &self.jobs
    }

    pub fn get(&self, id: &str) -> Option<&JobDefinition> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
