//! INSERT / UPDATE / DELETE rendering

use super::core::Condition;
use super::dialects::{ConflictStrategy, SqlDialect};
use super::fragments::{collapse_whitespace, where_clause};
use super::statement::Statement;
use crate::database::types::SqlValue;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Ordered column -> value map for write statements
pub type FieldMap = IndexMap<String, SqlValue>;

fn ensure_fields(table: &str, fields: &FieldMap) -> Result<()> {
    if fields.is_empty() {
        return Err(Error::invalid_query(format!(
            "No fields given for write to '{}'",
            table
        )));
    }
    Ok(())
}

/// Render an INSERT, optionally handling duplicate keys
///
/// Column order follows the map's insertion order.
pub fn render_insert_or_update(
    dialect: &dyn SqlDialect,
    table: &str,
    fields: &FieldMap,
    strategy: ConflictStrategy,
) -> Result<Statement> {
    ensure_fields(table, fields)?;

    let columns: Vec<String> = fields
        .keys()
        .map(|name| dialect.escape_identifier(name))
        .collect();
    let values: Vec<String> = fields
        .values()
        .map(|value| dialect.escape_value(value))
        .collect();

    let mut sql = format!(
        "{} {} ({}) VALUES ({})",
        dialect.insert_keyword(strategy),
        dialect.escape_identifier(table),
        columns.join(", "),
        values.join(", ")
    );

    if strategy == ConflictStrategy::Update {
        sql.push(' ');
        sql.push_str(&dialect.upsert_clause(&columns));
    }

    log::debug!("Rendered INSERT: {}", sql);
    Ok(Statement::insert(sql))
}

pub fn render_update(
    dialect: &dyn SqlDialect,
    table: &str,
    fields: &FieldMap,
    conditions: &[Condition],
) -> Result<Statement> {
    ensure_fields(table, fields)?;

    let assignments = fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{} = {}",
                dialect.escape_identifier(name),
                dialect.escape_value(value)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let sql = collapse_whitespace(&format!(
        "UPDATE {} SET {} {}",
        dialect.escape_identifier(table),
        assignments,
        where_clause(dialect, conditions)
    ));

    log::debug!("Rendered UPDATE: {}", sql);
    Ok(Statement::update(sql))
}

/// Render a DELETE; no conditions deletes every row
pub fn render_delete(dialect: &dyn SqlDialect, table: &str, conditions: &[Condition]) -> Statement {
    let sql = collapse_whitespace(&format!(
        "DELETE FROM {} {}",
        dialect.escape_identifier(table),
        where_clause(dialect, conditions)
    ));

    log::debug!("Rendered DELETE: {}", sql);
    Statement::delete(sql)
}
