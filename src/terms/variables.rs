// file: src/terms/variables.rs
// description: named variable store holding literal term lists
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use yaml_rust::{Yaml, YamlLoader};

const ENV_PREFIX: &str = "GAZETTE_WATCH_VAR_";

/// Externally stored values looked up by name.
pub trait VariableStore: Send + Sync {
    fn get(&self, name: &str) -> Result<String>;
}

/// Variables from the `[variables]` config table, then from
/// `GAZETTE_WATCH_VAR_<NAME>` environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigVariableStore {
    values: HashMap<String, String>,
}

impl ConfigVariableStore {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl VariableStore for ConfigVariableStore {
    fn get(&self, name: &str) -> Result<String> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }

        let env_name = format!("{}{}", ENV_PREFIX, name.to_uppercase());
        std::env::var(&env_name).map_err(|_| {
            PipelineError::Config(format!(
                "variable `{}` is not defined (config [variables] or {})",
                name, env_name
            ))
        })
    }
}

/// Parses a list literal such as `['Maria Silva', "João Souza",]`.
pub fn parse_list_literal(name: &str, literal: &str) -> Result<Vec<String>> {
    let invalid = |detail: &str| {
        PipelineError::Config(format!(
            "variable `{}` must hold a list of strings: {}",
            name, detail
        ))
    };

    if !literal.trim_start().starts_with('[') {
        return Err(invalid("value is not a list"));
    }

    let docs = YamlLoader::load_from_str(literal).map_err(|e| invalid(&e.to_string()))?;
    match docs.first() {
        Some(Yaml::Array(items)) => items
            .iter()
            .map(|item| match item {
                Yaml::String(s) => Ok(s.clone()),
                other => Err(invalid(&format!("unexpected item {:?}", other))),
            })
            .collect(),
        _ => Err(invalid("value is not a list")),
    }
}
