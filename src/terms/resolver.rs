// file: src/terms/resolver.rs
// description: resolves a job's term specification into an ordered term set
// reference: inline list, named variable or tabular query

use crate::error::{PipelineError, Result};
use crate::jobs::TermSpec;
use crate::models::TermSet;
use crate::terms::query::{QueryRunner, Table};
use crate::terms::variables::{VariableStore, parse_list_literal};
use std::sync::Arc;
use tracing::info;

fn clean_cell(cell: Option<&Option<String>>) -> String {
    cell.and_then(|c| c.as_deref())
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

/// First column holds the terms, the optional second one their group.
/// Cells are trimmed and NULL becomes the empty string.
pub fn term_set_from_table(table: &Table) -> Result<TermSet> {
    match table.columns.len() {
        0 => Err(PipelineError::Validation(
            "term query returned no columns".to_string(),
        )),
        1 => Ok(TermSet::from_terms(
            table.rows.iter().map(|row| clean_cell(row.first())),
        )),
        _ => Ok(TermSet::from_grouped(table.rows.iter().map(|row| {
            (clean_cell(row.first()), clean_cell(row.get(1)))
        }))),
    }
}

pub struct TermSourceResolver {
    variables: Arc<dyn VariableStore>,
    queries: Arc<dyn QueryRunner>,
}

impl TermSourceResolver {
    pub fn new(variables: Arc<dyn VariableStore>, queries: Arc<dyn QueryRunner>) -> Self {
        Self { variables, queries }
    }

    pub async fn resolve(&self, spec: &TermSpec) -> Result<TermSet> {
        let set = match spec {
            TermSpec::List(terms) => TermSet::from_terms(terms.iter().cloned()),
            TermSpec::NamedVariable(name) => {
                let literal = self.variables.get(name)?;
                TermSet::from_terms(parse_list_literal(name, &literal)?)
            }
            TermSpec::Query { query, connection } => {
                let table = self.queries.run_query(query, connection).await?;
                term_set_from_table(&table)?
            }
        };

        info!(
            "Resolved {} terms from {}{}",
            set.len(),
            spec.describe(),
            if set.is_grouped() { " (grouped)" } else { "" }
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::variables::ConfigVariableStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FixedQuery(Table);

    #[async_trait]
    impl QueryRunner for FixedQuery {
        async fn run_query(&self, _sql: &str, _connection: &str) -> Result<Table> {
            Ok(self.0.clone())
        }
    }

    fn table(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.map(String::from)).collect())
                .collect(),
        }
    }

    fn resolver(table: Table) -> TermSourceResolver {
        let mut values = HashMap::new();
        values.insert("people".to_string(), "['Maria Silva', 'João Souza']".to_string());
        TermSourceResolver::new(
            Arc::new(ConfigVariableStore::new(values)),
            Arc::new(FixedQuery(table)),
        )
    }

    fn query_spec() -> TermSpec {
        TermSpec::Query {
            query: "SELECT name, area FROM people".to_string(),
            connection: "db".to_string(),
        }
    }

    #[tokio::test]
    async fn test_inline_list_kept_as_is() {
        let set = resolver(Table::default())
            .resolve(&TermSpec::List(vec![" b ".to_string(), "a".to_string()]))
            .await
            .unwrap();

        assert_eq!(set.terms(), &[" b ", "a"]);
        assert!(!set.is_grouped());
    }

    #[tokio::test]
    async fn test_named_variable() {
        let set = resolver(Table::default())
            .resolve(&TermSpec::NamedVariable("people".to_string()))
            .await
            .unwrap();

        assert_eq!(set.terms(), &["Maria Silva", "João Souza"]);
    }

    #[tokio::test]
    async fn test_query_trims_and_replaces_nulls() {
        let table = table(
            &["name", "area"],
            vec![
                vec![Some("  Maria Silva "), None],
                vec![None, Some(" B ")],
                vec![Some("João Souza"), Some("A")],
            ],
        );

        let set = resolver(table).resolve(&query_spec()).await.unwrap();

        assert_eq!(set.terms(), &["Maria Silva", "", "João Souza"]);
        assert_eq!(set.group_of("Maria Silva"), Some(""));
        assert_eq!(set.group_of(""), Some("B"));
        for term in set.terms() {
            assert!(!term.contains("None") && !term.contains("null"));
        }
    }

    #[tokio::test]
    async fn test_query_duplicate_term_last_group_wins() {
        let table = table(
            &["name", "area"],
            vec![
                vec![Some("Maria Silva"), Some("A")],
                vec![Some("João Souza"), Some("B")],
                vec![Some("Maria Silva "), Some("C")],
            ],
        );

        let set = resolver(table).resolve(&query_spec()).await.unwrap();

        assert_eq!(set.terms(), &["Maria Silva", "João Souza"]);
        assert_eq!(set.group_of("Maria Silva"), Some("C"));
    }

    #[tokio::test]
    async fn test_single_column_query_is_ungrouped() {
        let table = table(&["name"], vec![vec![Some("x")], vec![Some("y")]]);
        let set = resolver(table).resolve(&query_spec()).await.unwrap();

        assert_eq!(set.terms(), &["x", "y"]);
        assert!(set.group_map().is_none());
    }

    #[test]
    fn test_table_without_columns() {
        assert!(term_set_from_table(&Table::default()).is_err());
    }
}
