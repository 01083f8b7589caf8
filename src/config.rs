// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEDULE: &str = "0 2 * * *";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub jobs: JobsConfig,
    pub report: ReportConfig,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    pub connections: HashMap<String, PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub api_url: String,
    pub web_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobsConfig {
    pub config_dir: PathBuf,
    pub default_schedule: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GAZETTE_WATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            search: SearchConfig {
                api_url: "https://www.in.gov.br/consulta/-/buscar/dou".to_string(),
                web_url: "https://www.in.gov.br/web/dou/-/".to_string(),
                request_timeout_secs: 60,
            },
            jobs: JobsConfig {
                config_dir: PathBuf::from("./jobs"),
                default_schedule: DEFAULT_SCHEDULE.to_string(),
            },
            report: ReportConfig {
                output_dir: PathBuf::from("./reports"),
            },
            variables: HashMap::new(),
            connections: HashMap::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.search.api_url)
            .and_then(|_| Validator::validate_url(&self.search.web_url))
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.search.request_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Validator::validate_schedule(&self.jobs.default_schedule)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[search]
api_url = "http://localhost:9999/consulta"
web_url = "http://localhost:9999/web/"
request_timeout_secs = 5

[jobs]
config_dir = "./jobs"
default_schedule = "0 2 * * *"

[report]
output_dir = "./out"

[variables]
watched_people = "['Maria Silva', 'João Souza']"

[connections]
terms_db = "data/terms.db"
"#;

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.search.request_timeout_secs, 5);
        assert_eq!(config.jobs.default_schedule, DEFAULT_SCHEDULE);
        assert!(config.variables.contains_key("watched_people"));
        assert_eq!(
            config.connections.get("terms_db"),
            Some(&PathBuf::from("data/terms.db"))
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.toml");
        fs::write(&path, SAMPLE.replace("http://localhost:9999/consulta", "localhost")).unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default_config().validate().is_ok());
    }
}
