//! rustf-adapter - relational database adapter layer
//!
//! Sits between an ORM and a SQL backend:
//! - Connection management with one current session and stale cleanup
//! - Dialect-neutral query model rendered to MySQL SQL text
//! - Execution with result shaping and a single reconnect-and-retry
//! - A small migration DSL compiling to DDL

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod database;
pub mod error;
pub mod migrations;
pub mod query;

pub use database::{
    AdapterConfig, ConnectionConfig, ConnectionHandle, ConnectionManager, QueryExecutor,
    SqlValue, TabularResult,
};
pub use error::{Error, Result, RetryOutcome};
pub use migrations::{ColumnOptions, Schema};
pub use query::{
    render_insert_or_update, render_select, ConflictStrategy, Query, Statement, StatementKind,
};

use query::dialects::{MySQLDialect, SqlDialect};

/// Quote an identifier for the MySQL backend
pub fn escape_identifier(identifier: &str) -> String {
    MySQLDialect::new().escape_identifier(identifier)
}

/// Render a literal value for the MySQL backend
pub fn escape_value(value: impl Into<SqlValue>) -> String {
    MySQLDialect::new().escape_value(&value.into())
}
