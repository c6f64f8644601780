//! Database access: connections, execution and results
//!
//! The connection manager owns backend sessions opened through a
//! [`DatabaseDriver`], the executor runs statements on them and every reply
//! is shaped into a [`TabularResult`].

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod connection;
pub mod executor;
pub mod result;
pub mod types;

// Re-export main types for convenience
pub use adapter::{DatabaseDriver, DriverSession, QueryResult, RawResultSet};
pub use adapters::{MySqlDriver, MySqlSession};
pub use config::{AdapterConfig, ConnectionConfig, ConnectionConfigBuilder};
pub use connection::{ConnectionHandle, ConnectionManager};
pub use executor::QueryExecutor;
pub use result::{TabularColumn, TabularResult};
pub use types::{type_keyword, ColumnType, SqlValue};
