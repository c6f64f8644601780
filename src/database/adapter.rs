//! Backend driver traits
//!
//! The adapter reaches the database only through these two traits: a
//! `DatabaseDriver` that opens sessions, and a `DriverSession` that runs SQL
//! text on one open session. The MySQL implementation lives in
//! `database::adapters::mysql`; tests plug in scripted drivers.

use crate::database::config::ConnectionConfig;
use crate::database::types::SqlValue;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for statements that modify data or schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Number of rows affected by the statement
    pub rows_affected: u64,
    /// Last inserted ID (if applicable)
    pub last_insert_id: Option<u64>,
}

/// Rows returned by a SELECT-like statement, before shaping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

/// Opens sessions against a backend
///
/// Errors must be mapped so that session loss surfaces as
/// `Error::TransientBackend`, rejected connection attempts as
/// `Error::Connection`, and everything else as `Error::Backend`.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Short backend name used in log output
    fn name(&self) -> &str;

    /// Open a new session
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn DriverSession>>;
}

/// One open backend session
#[async_trait]
pub trait DriverSession: Send + Sync {
    /// Run a statement that returns rows
    async fn query(&self, sql: &str) -> Result<RawResultSet>;

    /// Run a statement that modifies data or schema
    async fn execute(&self, sql: &str) -> Result<QueryResult>;

    /// Close the session; closing twice is a no-op
    async fn close(&self) -> Result<()>;

    /// Whether `close` has been called
    fn is_closed(&self) -> bool;
}
