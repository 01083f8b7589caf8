// file: src/terms/mod.rs
// description: term source module exports
// reference: internal module structure

pub mod query;
pub mod resolver;
pub mod variables;

pub use query::{QueryRunner, SqliteQueryRunner, Table};
pub use resolver::{TermSourceResolver, term_set_from_table};
pub use variables::{ConfigVariableStore, VariableStore, parse_list_literal};
