//! Driver implementations for database backends

pub mod mysql;

pub use mysql::{is_transient_code, MySqlDriver, MySqlSession, TRANSIENT_ERROR_CODES};
