// file: src/jobs/definition.rs
// description: job definition parsing from YAML configuration files
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use crate::jobs::schedule::effective_schedule;
use crate::models::{Field, SearchDate, Section};
use crate::search::SearchParams;
use crate::utils::Validator;
use std::fs;
use std::path::{Path, PathBuf};
use yaml_rust::{Yaml, YamlLoader};

pub const DEFAULT_SUBJECT: &str = "Extração do DOU";
const DEFAULT_TAGS: [&str; 2] = ["dou", "generated_job"];

/// Where a job's search terms come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSpec {
    List(Vec<String>),
    NamedVariable(String),
    Query { query: String, connection: String },
}

impl TermSpec {
    pub fn describe(&self) -> String {
        match self {
            TermSpec::List(terms) => format!("{} inline terms", terms.len()),
            TermSpec::NamedVariable(name) => format!("variable `{}`", name),
            TermSpec::Query { connection, .. } => format!("query on `{}`", connection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub emails: Vec<String>,
    pub subject: String,
    pub attach_csv: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub id: String,
    pub description: String,
    /// Schedule after the default-schedule minute jitter is applied.
    pub schedule: String,
    pub tags: Vec<String>,
    pub terms: TermSpec,
    pub search: SearchParams,
    pub report: ReportSettings,
    pub source: PathBuf,
}

/// Field lookup that reports missing fields against the file they belong to.
struct Reader<'a> {
    file: &'a str,
}

impl<'a> Reader<'a> {
    fn error(&self, message: impl AsRef<str>) -> PipelineError {
        PipelineError::Config(format!("Error in file {}: {}", self.file, message.as_ref()))
    }

    fn require<'y>(&self, node: &'y Yaml, field: &str) -> Result<&'y Yaml> {
        match &node[field] {
            Yaml::BadValue | Yaml::Null => Err(self.error(format!("field `{}` is required", field))),
            value => Ok(value),
        }
    }

    fn optional<'y>(&self, node: &'y Yaml, field: &str) -> Option<&'y Yaml> {
        match &node[field] {
            Yaml::BadValue | Yaml::Null => None,
            value => Some(value),
        }
    }

    fn string(&self, value: &Yaml, field: &str) -> Result<String> {
        match value {
            Yaml::String(s) => Ok(s.clone()),
            Yaml::Integer(i) => Ok(i.to_string()),
            Yaml::Real(r) => Ok(r.clone()),
            _ => Err(self.error(format!("field `{}` must be a string", field))),
        }
    }

    fn required_string(&self, node: &Yaml, field: &str) -> Result<String> {
        let value = self.require(node, field)?;
        self.string(value, field)
    }

    fn string_list(&self, value: &Yaml, field: &str) -> Result<Vec<String>> {
        match value {
            Yaml::Array(items) => items.iter().map(|item| self.string(item, field)).collect(),
            _ => Err(self.error(format!("field `{}` must be a list", field))),
        }
    }

    fn bool_or(&self, node: &Yaml, field: &str, default: bool) -> Result<bool> {
        match self.optional(node, field) {
            None => Ok(default),
            Some(Yaml::Boolean(b)) => Ok(*b),
            Some(_) => Err(self.error(format!("field `{}` must be true or false", field))),
        }
    }

    fn enum_or<T>(
        &self,
        node: &Yaml,
        field: &str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        match self.optional(node, field) {
            None => Ok(default),
            Some(value) => {
                let name = self.string(value, field)?;
                parse(&name)
                    .ok_or_else(|| self.error(format!("invalid value `{}` for field `{}`", name, field)))
            }
        }
    }

    fn terms(&self, search: &Yaml) -> Result<TermSpec> {
        let terms = self.require(search, "terms")?;

        match terms {
            Yaml::Array(_) => Ok(TermSpec::List(self.string_list(terms, "terms")?)),
            Yaml::Hash(_) => {
                if let Some(name) = self.optional(terms, "from_named_variable") {
                    Ok(TermSpec::NamedVariable(
                        self.string(name, "from_named_variable")?,
                    ))
                } else if let Some(from_query) = self.optional(terms, "from_query") {
                    Ok(TermSpec::Query {
                        query: self.required_string(from_query, "query")?,
                        connection: self.required_string(from_query, "connection")?,
                    })
                } else {
                    Err(self.terms_shape_error())
                }
            }
            _ => Err(self.terms_shape_error()),
        }
    }

    fn terms_shape_error(&self) -> PipelineError {
        self.error(
            "field `terms` accepts a list of strings, `from_named_variable` or `from_query`",
        )
    }

    fn sections(&self, search: &Yaml) -> Result<Vec<Section>> {
        match self.optional(search, "sections") {
            None => Ok(vec![Section::Todos]),
            Some(value) => self
                .string_list(value, "sections")?
                .iter()
                .map(|name| {
                    Section::from_name(name).ok_or_else(|| {
                        self.error(format!("invalid value `{}` for field `sections`", name))
                    })
                })
                .collect(),
        }
    }
}

impl JobDefinition {
    pub fn from_file(path: &Path, default_schedule: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        let mut job = Self::from_yaml_str(&content, &path.display().to_string(), default_schedule)?;
        job.source = path.to_path_buf();
        Ok(job)
    }

    pub fn from_yaml_str(content: &str, file: &str, default_schedule: &str) -> Result<Self> {
        let reader = Reader { file };

        let docs = YamlLoader::load_from_str(content)
            .map_err(|e| reader.error(format!("YAML parse error: {}", e)))?;
        let root = docs
            .first()
            .ok_or_else(|| reader.error("file is empty"))?;

        let job = reader.require(root, "job")?;
        let id = reader.required_string(job, "id")?;
        Validator::validate_job_id(&id).map_err(|e| reader.error(e.to_string()))?;
        let description = reader.required_string(job, "description")?;

        let report = reader.require(job, "report")?;
        let emails = reader.string_list(reader.require(report, "emails")?, "emails")?;
        for email in &emails {
            Validator::validate_email(email).map_err(|e| reader.error(e.to_string()))?;
        }

        let search = reader.require(job, "search")?;
        let terms = reader.terms(search)?;

        let search_params = SearchParams {
            sections: reader.sections(search)?,
            date: reader.enum_or(search, "date", SearchDate::Dia, SearchDate::from_name)?,
            field: reader.enum_or(search, "field", Field::Tudo, Field::from_name)?,
            is_exact_search: reader.bool_or(search, "is_exact_search", true)?,
            ignore_signature_match: reader.bool_or(search, "ignore_signature_match", false)?,
        };

        let schedule = match reader.optional(job, "schedule") {
            Some(value) => Some(reader.string(value, "schedule")?),
            None => None,
        };
        let schedule = effective_schedule(&id, schedule.as_deref(), default_schedule);
        Validator::validate_schedule(&schedule).map_err(|e| reader.error(e.to_string()))?;

        let mut tags = match reader.optional(job, "tags") {
            Some(value) => reader.string_list(value, "tags")?,
            None => Vec::new(),
        };
        for tag in DEFAULT_TAGS {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let subject = match reader.optional(report, "subject") {
            Some(value) => reader.string(value, "subject")?,
            None => DEFAULT_SUBJECT.to_string(),
        };

        Ok(Self {
            id,
            description,
            schedule,
            tags,
            terms,
            search: search_params,
            report: ReportSettings {
                emails,
                subject,
                attach_csv: reader.bool_or(report, "attach_csv", false)?,
            },
            source: PathBuf::from(file),
        })
    }
}
