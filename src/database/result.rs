//! Uniform tabular results
//!
//! Every executed statement comes back as a `TabularResult`: an ordered list
//! of named columns, each holding one value per row. SELECT results mirror
//! the backend's columns; INSERT and write/DDL statements get small synthetic
//! shapes so callers never have to branch on the statement kind.

use crate::database::adapter::RawResultSet;
use crate::database::types::SqlValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Column holding the generated id of an INSERT
pub const INSERT_ID_COLUMN: &str = "last_insert_id";
/// Status column of write/DDL results
pub const STATUS_COLUMN: &str = "status";
/// Affected-row count column of write/DDL results
pub const AFFECTED_ROWS_COLUMN: &str = "affected_rows";
/// Status marker for a successful write/DDL statement
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularColumn {
    pub name: String,
    pub values: Vec<SqlValue>,
}

impl TabularColumn {
    pub fn new(name: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Column-oriented result of one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularResult {
    columns: Vec<TabularColumn>,
}

impl TabularResult {
    pub fn new(columns: Vec<TabularColumn>) -> Self {
        Self { columns }
    }

    /// Transpose a row-oriented result set
    ///
    /// Short rows are padded with `Null`; cells beyond the named columns are
    /// dropped.
    pub fn from_raw(raw: RawResultSet) -> Self {
        let row_count = raw.rows.len();
        let mut columns: Vec<TabularColumn> = raw
            .columns
            .into_iter()
            .map(|name| TabularColumn::new(name, Vec::with_capacity(row_count)))
            .collect();

        for row in raw.rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(SqlValue::Null));
            }
        }

        Self { columns }
    }

    /// Single-row result carrying the generated id of an INSERT
    pub fn inserted(last_insert_id: Option<u64>) -> Self {
        let id = last_insert_id.map(SqlValue::UnsignedBigInt).unwrap_or(SqlValue::Null);
        Self::new(vec![TabularColumn::new(INSERT_ID_COLUMN, vec![id])])
    }

    /// Single-row status result for writes and DDL
    pub fn status(affected_rows: u64) -> Self {
        Self::new(vec![
            TabularColumn::new(STATUS_COLUMN, vec![SqlValue::String(STATUS_OK.to_string())]),
            TabularColumn::new(
                AFFECTED_ROWS_COLUMN,
                vec![SqlValue::UnsignedBigInt(affected_rows)],
            ),
        ])
    }

    pub fn columns(&self) -> &[TabularColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&TabularColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Values of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&SqlValue>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&SqlValue>> + '_ {
        (0..self.row_count()).filter_map(move |i| self.row(i))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&SqlValue> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Generated id of an INSERT result
    pub fn last_insert_id(&self) -> Option<u64> {
        self.value(0, INSERT_ID_COLUMN).and_then(SqlValue::as_u64)
    }

    /// Affected-row count of a write/DDL result
    pub fn affected_rows(&self) -> Option<u64> {
        self.value(0, AFFECTED_ROWS_COLUMN).and_then(SqlValue::as_u64)
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_rows(&self) -> Vec<JsonValue> {
        (0..self.row_count())
            .map(|i| {
                let mut object = Map::new();
                for column in &self.columns {
                    object.insert(column.name.clone(), column.values[i].to_json());
                }
                JsonValue::Object(object)
            })
            .collect()
    }
}
