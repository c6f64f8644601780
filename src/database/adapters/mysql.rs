//! MySQL driver implementation

use crate::database::adapter::{DatabaseDriver, DriverSession, QueryResult, RawResultSet};
use crate::database::config::ConnectionConfig;
use crate::database::types::MySqlTypeConverter;
use crate::error::{Error, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlDatabaseError, MySqlSslMode};
use sqlx::{Column, ConnectOptions, Connection, Executor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Client and server error numbers that mean the session is gone
///
/// 2006 server has gone away, 2013 lost connection during query,
/// 2055 lost connection (extended), 1053 server shutdown in progress,
/// 4031 disconnected by the server because of inactivity.
pub const TRANSIENT_ERROR_CODES: &[u16] = &[2006, 2013, 2055, 1053, 4031];

/// Whether a MySQL error number belongs to the session-loss class
pub fn is_transient_code(code: u16) -> bool {
    TRANSIENT_ERROR_CODES.contains(&code)
}

/// MySQL driver backed by sqlx
#[derive(Clone, Default)]
pub struct MySqlDriver;

impl MySqlDriver {
    /// Create a new MySQL driver
    pub fn new() -> Self {
        MySqlDriver
    }

    /// Translate a connection config into sqlx connect options
    pub fn connect_options(config: &ConnectionConfig) -> Result<MySqlConnectOptions> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .database(&config.database);

        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        for (name, value) in &config.options {
            options = match name.as_str() {
                "charset" => options.charset(value),
                "collation" => options.collation(value),
                "timezone" => options.timezone(value.clone()),
                "socket" => options.socket(value),
                "ssl_ca" => options.ssl_ca(value),
                "ssl_mode" => {
                    let mode = value.parse::<MySqlSslMode>().map_err(|e| {
                        Error::config(format!("Invalid ssl_mode '{}': {}", value, e))
                    })?;
                    options.ssl_mode(mode)
                }
                "statement_cache_capacity" => {
                    let capacity = value.parse::<usize>().map_err(|e| {
                        Error::config(format!(
                            "Invalid statement_cache_capacity '{}': {}",
                            value, e
                        ))
                    })?;
                    options.statement_cache_capacity(capacity)
                }
                "pipes_as_concat" => {
                    let flag = value.parse::<bool>().map_err(|e| {
                        Error::config(format!("Invalid pipes_as_concat '{}': {}", value, e))
                    })?;
                    options.pipes_as_concat(flag)
                }
                other => {
                    log::warn!("Ignoring unknown MySQL option '{}'", other);
                    options
                }
            };
        }

        Ok(options)
    }
}

#[async_trait]
impl DatabaseDriver for MySqlDriver {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn DriverSession>> {
        let options = Self::connect_options(config)?;

        log::debug!("Opening MySQL session to {}", config.to_url());

        let conn = options
            .connect()
            .await
            .map_err(|e| Error::connection(format!("Failed to connect to MySQL: {}", e)))?;

        Ok(Arc::new(MySqlSession::new(conn)))
    }
}

/// A single MySQL connection
pub struct MySqlSession {
    conn: Mutex<Option<MySqlConnection>>,
    closed: AtomicBool,
    converter: MySqlTypeConverter,
}

impl MySqlSession {
    fn new(conn: MySqlConnection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            closed: AtomicBool::new(false),
            converter: MySqlTypeConverter::new(),
        }
    }
}

#[async_trait]
impl DriverSession for MySqlSession {
    async fn query(&self, sql: &str) -> Result<RawResultSet> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| Error::not_connected("MySQL session has been closed"))?;

        // Unbound text runs over the plain query protocol
        let rows = Executor::fetch_all(&mut *conn, sql)
            .await
            .map_err(map_sqlx_error)?;

        let columns = match rows.first() {
            Some(row) => MySqlTypeConverter::column_names(row),
            // No rows to read names from; ask the server for the statement's shape
            None => match Executor::describe(&mut *conn, sql).await {
                Ok(describe) => describe
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect(),
                Err(e) => {
                    log::debug!("Could not describe empty result set: {}", e);
                    Vec::new()
                }
            },
        };

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            values.push(self.converter.row_values(row)?);
        }

        Ok(RawResultSet {
            columns,
            rows: values,
        })
    }

    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| Error::not_connected("MySQL session has been closed"))?;

        let result = Executor::execute(&mut *conn, sql)
            .await
            .map_err(map_sqlx_error)?;

        Ok(QueryResult {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_id()),
        })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);

        let conn = self.conn.lock().await.take();
        if let Some(conn) = conn {
            // A session that already lost its socket cannot say goodbye
            if let Err(e) = conn.close().await {
                log::debug!("Error while closing MySQL session: {}", e);
            }
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Map a sqlx error into the adapter's error kinds
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db) => {
            let code = db
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(|e| e.number());
            if code.is_some_and(is_transient_code) {
                Error::transient(code, db.message())
            } else {
                Error::backend(code, db.message())
            }
        }
        sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => Error::transient(None, err.to_string()),
        _ => Error::backend(None, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: T) {}

    // Compile-time check: session work can move across tokio worker threads
    #[allow(dead_code)]
    fn session_futures_are_send(conn: &mut MySqlConnection, session: &MySqlSession) {
        assert_send(Executor::fetch_all(&mut *conn, "SELECT 1"));
        assert_send(session.query("SELECT 1"));
        assert_send(session.execute("DELETE FROM t"));
    }

    #[test]
    fn test_transient_codes() {
        assert!(is_transient_code(2006));
        assert!(is_transient_code(2013));
        assert!(!is_transient_code(1064));
        assert!(!is_transient_code(1062));
    }

    #[test]
    fn test_io_error_is_transient() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        assert!(map_sqlx_error(sqlx::Error::Io(io)).is_transient());
    }

    #[test]
    fn test_other_errors_are_not_transient() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(!err.is_transient());
        assert!(matches!(err, Error::Backend { code: None, .. }));
    }

    #[test]
    fn test_connect_options_reject_bad_values() {
        let mut config = ConnectionConfig::new("localhost", "root", "test");
        config
            .options
            .insert("statement_cache_capacity".to_string(), "lots".to_string());
        assert!(matches!(
            MySqlDriver::connect_options(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_connect_options_accept_known_values() {
        let mut config = ConnectionConfig::new("localhost", "root", "test");
        config
            .options
            .insert("charset".to_string(), "utf8mb4".to_string());
        config
            .options
            .insert("ssl_mode".to_string(), "disabled".to_string());
        assert!(MySqlDriver::connect_options(&config).is_ok());
    }
}
