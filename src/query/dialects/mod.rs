//! Database dialect implementations for the fragment builder
//!
//! A dialect owns every backend-specific rendering rule: identifier and
//! value escaping, auto-increment syntax, and conflict handling on INSERT.

use crate::database::types::SqlValue;

/// Database backend types supported by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    MySQL,
    MariaDB,
}

/// How an INSERT reacts to a duplicate-key conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
    /// Let the backend report the conflict
    #[default]
    Error,
    /// Silently skip conflicting rows
    Ignore,
    /// Overwrite the conflicting row with the new values
    Update,
}

/// Trait for database-specific SQL generation
pub trait SqlDialect: Send + Sync {
    /// Backend this dialect renders for
    fn backend(&self) -> DatabaseBackend;

    /// Quote an identifier (table name, column name, possibly qualified)
    fn escape_identifier(&self, identifier: &str) -> String;

    /// Backend-native string escaping, without surrounding quotes
    fn escape_string(&self, value: &str) -> String;

    /// Render a literal value
    fn escape_value(&self, value: &SqlValue) -> String;

    /// Column modifiers for an auto-incrementing primary key
    fn auto_increment_syntax(&self) -> &'static str;

    /// Leading keywords of an INSERT for the given conflict strategy
    fn insert_keyword(&self, strategy: ConflictStrategy) -> &'static str;

    /// Trailing clause that turns an INSERT into an upsert over `columns`
    /// (already escaped)
    fn upsert_clause(&self, columns: &[String]) -> String;

    /// Statement that drops an index from a table (both already escaped)
    fn drop_index_syntax(&self, index: &str, table: &str) -> String;
}

pub mod mysql;

pub use mysql::MySQLDialect;

/// Factory function to create the appropriate dialect for a database backend
pub fn create_dialect(backend: DatabaseBackend) -> Box<dyn SqlDialect> {
    match backend {
        DatabaseBackend::MySQL | DatabaseBackend::MariaDB => Box::new(MySQLDialect::new()),
    }
}
