//! Schema migration DSL
//!
//! `Schema` runs DDL built by [`schema`] against the current connection.
//! Every statement is internal (never logged as a user query) and runs
//! exactly once: a failed schema change is not safely retryable, so errors
//! propagate to the caller untouched.
//!
//! Deciding which migrations to run is left to an external runner; the
//! bookkeeping helpers here only maintain the `schema_migrations` table.

pub mod schema;

pub use schema::{column, column_id, column_id_named, ColumnOptions, MIGRATIONS_TABLE};

use crate::database::executor::QueryExecutor;
use crate::database::types::SqlValue;
use crate::error::Result;
use crate::query::dialects::{MySQLDialect, SqlDialect};
use crate::query::statement::Statement;
use std::sync::Arc;

pub struct Schema {
    executor: Arc<QueryExecutor>,
    dialect: Box<dyn SqlDialect>,
}

impl Schema {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self::with_dialect(executor, Box::new(MySQLDialect::new()))
    }

    pub fn with_dialect(executor: Arc<QueryExecutor>, dialect: Box<dyn SqlDialect>) -> Self {
        Self { executor, dialect }
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    async fn run(&self, statement: Statement) -> Result<()> {
        log::debug!("Migration: {}", statement.sql());
        self.executor.execute_internal_once(&statement).await?;
        Ok(())
    }

    /// Create a table from the column definitions `columns` returns
    ///
    /// ```ignore
    /// schema.create_table("posts", "ENGINE=InnoDB", |d| {
    ///     Ok(vec![
    ///         column_id(d),
    ///         column(d, "title", "string", &ColumnOptions::new().limit(200)?)?,
    ///     ])
    /// }).await?;
    /// ```
    pub async fn create_table<F>(&self, name: &str, table_options: &str, columns: F) -> Result<()>
    where
        F: FnOnce(&dyn SqlDialect) -> Result<Vec<String>>,
    {
        let columns = columns(self.dialect())?;
        let statement = schema::create_table(name, &columns, table_options)?;
        self.run(statement).await
    }

    pub async fn drop_table(&self, name: &str) -> Result<()> {
        self.run(schema::drop_table(name)).await
    }

    pub async fn add_column(
        &self,
        table: &str,
        name: &str,
        type_tag: &str,
        options: &ColumnOptions,
    ) -> Result<()> {
        let definition = schema::column(self.dialect(), name, type_tag, options)?;
        self.run(schema::add_column(table, &definition)).await
    }

    pub async fn remove_column(&self, table: &str, column: &str) -> Result<()> {
        self.run(schema::remove_column(table, column)).await
    }

    /// Create an index, named `index_<table>_on_<cols>` unless `name` is given
    pub async fn add_index(
        &self,
        table: &str,
        columns: &[&str],
        unique: bool,
        name: Option<&str>,
    ) -> Result<()> {
        self.run(schema::add_index(table, columns, unique, name)?)
            .await
    }

    pub async fn remove_index(
        &self,
        table: &str,
        columns: &[&str],
        name: Option<&str>,
    ) -> Result<()> {
        self.run(schema::remove_index(self.dialect(), table, columns, name)?)
            .await
    }

    pub async fn create_migrations_table(&self) -> Result<()> {
        self.run(schema::create_migrations_table()).await
    }

    pub async fn record_version(&self, version: &str) -> Result<()> {
        self.run(schema::record_version(self.dialect(), version))
            .await
    }

    pub async fn forget_version(&self, version: &str) -> Result<()> {
        self.run(schema::forget_version(self.dialect(), version))
            .await
    }

    /// Applied versions in ascending order
    pub async fn applied_versions(&self) -> Result<Vec<String>> {
        let result = self
            .executor
            .execute_internal_once(&schema::applied_versions())
            .await?;

        Ok(result
            .column("version")
            .map(|c| c.values.iter().filter_map(SqlValue::as_string).collect())
            .unwrap_or_default())
    }
}
