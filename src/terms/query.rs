// file: src/terms/query.rs
// description: tabular query capability used as a term source
// reference: https://docs.rs/rusqlite

use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Query result with nullable text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run_query(&self, sql: &str, connection: &str) -> Result<Table>;
}

/// Runs queries against SQLite databases named in `[connections]`.
#[derive(Debug, Clone, Default)]
pub struct SqliteQueryRunner {
    connections: HashMap<String, PathBuf>,
}

impl SqliteQueryRunner {
    pub fn new(connections: HashMap<String, PathBuf>) -> Self {
        Self { connections }
    }
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn query_blocking(path: PathBuf, sql: String) -> Result<Table> {
    let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let mut stmt = conn.prepare(&sql)?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(cell_text))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Table { columns, rows })
}

#[async_trait]
impl QueryRunner for SqliteQueryRunner {
    async fn run_query(&self, sql: &str, connection: &str) -> Result<Table> {
        let path = self.connections.get(connection).cloned().ok_or_else(|| {
            PipelineError::Config(format!(
                "connection `{}` is not defined in [connections]",
                connection
            ))
        })?;

        debug!("Running term query on {}", path.display());
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || query_blocking(path, sql))
            .await
            .map_err(|e| PipelineError::ExternalService(format!("Query task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_db(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("terms.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE people (name TEXT, area TEXT, code INTEGER);
             INSERT INTO people VALUES ('  Maria Silva ', 'A', 1);
             INSERT INTO people VALUES ('João Souza', NULL, 2);",
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_run_query() {
        let temp = TempDir::new().unwrap();
        let path = create_db(&temp);
        let runner = SqliteQueryRunner::new(HashMap::from([("terms_db".to_string(), path)]));

        let table = runner
            .run_query("SELECT name, area, code FROM people ORDER BY code", "terms_db")
            .await
            .unwrap();

        assert_eq!(table.columns, vec!["name", "area", "code"]);
        assert_eq!(
            table.rows,
            vec![
                vec![
                    Some("  Maria Silva ".to_string()),
                    Some("A".to_string()),
                    Some("1".to_string())
                ],
                vec![Some("João Souza".to_string()), None, Some("2".to_string())],
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_connection() {
        let runner = SqliteQueryRunner::default();
        let err = runner.run_query("SELECT 1", "missing").await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[tokio::test]
    async fn test_bad_sql_is_external_error() {
        let temp = TempDir::new().unwrap();
        let path = create_db(&temp);
        let runner = SqliteQueryRunner::new(HashMap::from([("terms_db".to_string(), path)]));

        let err = runner
            .run_query("SELECT nope FROM missing_table", "terms_db")
            .await
            .unwrap_err();
        assert!(err.is_external());
    }
}
