//! Query executor
//!
//! Sends SQL to the current session, shapes the reply by statement kind and
//! recovers from a lost session by reconnecting and retrying once.

use crate::database::config::AdapterConfig;
use crate::database::connection::{ConnectionHandle, ConnectionManager};
use crate::database::result::TabularResult;
use crate::error::{Result, RetryOutcome, RetryableError};
use crate::query::statement::{Statement, StatementKind};
use std::sync::Arc;
use std::time::Instant;

pub struct QueryExecutor {
    manager: Arc<ConnectionManager>,
    log_queries: bool,
}

impl QueryExecutor {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            manager,
            log_queries: false,
        }
    }

    /// Connect a MySQL-backed manager using `config`
    pub async fn from_config(config: AdapterConfig) -> Result<Self> {
        let manager = Arc::new(ConnectionManager::mysql());
        manager.connect(config.connection).await?;
        Ok(Self::new(manager).with_query_logging(config.log_queries))
    }

    /// Log every non-internal statement with its elapsed time
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    /// Run hand-written SQL, classifying it by its leading keyword
    pub async fn execute_sql(&self, sql: &str, internal: bool) -> Result<TabularResult> {
        let statement = Statement::classify(sql);
        self.execute_with_outcome(&statement, internal)
            .await?
            .into_result()
    }

    /// Run hand-written SQL on a specific handle
    pub async fn execute_sql_on(
        &self,
        handle: &ConnectionHandle,
        sql: &str,
        internal: bool,
    ) -> Result<TabularResult> {
        self.execute_on(handle, &Statement::classify(sql), internal)
            .await
    }

    /// Run a built statement on the current connection
    pub async fn execute(&self, statement: &Statement) -> Result<TabularResult> {
        self.execute_with_outcome(statement, false)
            .await?
            .into_result()
    }

    /// Run a statement on a specific handle
    pub async fn execute_on(
        &self,
        handle: &ConnectionHandle,
        statement: &Statement,
        internal: bool,
    ) -> Result<TabularResult> {
        self.run_with_retry(handle, statement, internal)
            .await?
            .into_result()
    }

    /// Run a statement and report whether the retry path was taken
    ///
    /// Non-transient errors on the first attempt come back as `Err`;
    /// `Exhausted` means a transient error was followed by a failed
    /// reconnect or a failed retry.
    pub async fn execute_with_outcome(
        &self,
        statement: &Statement,
        internal: bool,
    ) -> Result<RetryOutcome<TabularResult>> {
        let handle = self.manager.active_connection().await?;
        self.run_with_retry(&handle, statement, internal).await
    }

    /// Run once on the current connection, without reconnecting
    pub async fn execute_internal_once(&self, statement: &Statement) -> Result<TabularResult> {
        let handle = self.manager.active_connection().await?;
        self.run(&handle, statement, true).await.inspect_err(|e| {
            log::error!("Internal statement failed: {} [{}]", e, statement.sql());
        })
    }

    async fn run_with_retry(
        &self,
        handle: &ConnectionHandle,
        statement: &Statement,
        internal: bool,
    ) -> Result<RetryOutcome<TabularResult>> {
        let error = match self.run(handle, statement, internal).await {
            Ok(result) => return Ok(RetryOutcome::Success(result)),
            Err(e) => e,
        };

        if !error.is_retryable() {
            log::error!("Query failed: {} [{}]", error, statement.sql());
            return Err(error);
        }

        log::warn!(
            "Lost connection while running query ({}), retrying once [{}]",
            error,
            statement.sql()
        );

        let fresh = match self.manager.reconnect(handle).await {
            Ok(fresh) => fresh,
            Err(e) => {
                log::error!("Reconnect failed: {}", e);
                return Ok(RetryOutcome::Exhausted(e));
            }
        };

        match self.run(&fresh, statement, internal).await {
            Ok(result) => {
                if let Err(e) = self.manager.retire(handle).await {
                    log::debug!("Failed to close lost handle {}: {}", handle.id(), e);
                }
                self.manager.close_stale().await;
                Ok(RetryOutcome::RetriedSuccess(result))
            }
            Err(e) => {
                log::error!("Query failed after reconnect: {} [{}]", e, statement.sql());
                Ok(RetryOutcome::Exhausted(e))
            }
        }
    }

    async fn run(
        &self,
        handle: &ConnectionHandle,
        statement: &Statement,
        internal: bool,
    ) -> Result<TabularResult> {
        let start = Instant::now();
        let session = handle.session();

        let result = match statement.kind() {
            StatementKind::Select => TabularResult::from_raw(session.query(statement.sql()).await?),
            StatementKind::Insert => {
                let outcome = session.execute(statement.sql()).await?;
                TabularResult::inserted(outcome.last_insert_id)
            }
            StatementKind::Update | StatementKind::Delete | StatementKind::Ddl => {
                let outcome = session.execute(statement.sql()).await?;
                TabularResult::status(outcome.rows_affected)
            }
        };

        if self.log_queries && !internal {
            log::info!("{} in {:?}", statement.sql(), start.elapsed());
        }

        Ok(result)
    }
}
