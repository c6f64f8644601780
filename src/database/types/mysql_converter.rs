//! MySQL-specific row conversion
//!
//! Decodes `MySqlRow` cells into `SqlValue` based on the column's reported
//! type name. Used by the MySQL driver to fill raw result sets.

use super::value::SqlValue;
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlColumn, MySqlRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// MySQL type converter
#[derive(Clone, Default)]
pub struct MySqlTypeConverter;

impl MySqlTypeConverter {
    /// Create a new MySQL type converter
    pub fn new() -> Self {
        MySqlTypeConverter
    }

    /// Column names of a row, in result-set order
    pub fn column_names(row: &MySqlRow) -> Vec<String> {
        row.columns().iter().map(|c| c.name().to_string()).collect()
    }

    /// Decode every cell of a row
    pub fn row_values(&self, row: &MySqlRow) -> Result<Vec<SqlValue>> {
        (0..row.columns().len())
            .map(|index| self.extract_value(row, index))
            .collect()
    }

    /// Decode a single cell
    pub fn extract_value(&self, row: &MySqlRow, index: usize) -> Result<SqlValue> {
        let column = row
            .columns()
            .get(index)
            .ok_or_else(|| decode_error(format!("Column index {} out of bounds", index)))?;

        let raw = row.try_get_raw(index).map_err(|e| {
            decode_error(format!("Failed to get raw value at column {}: {}", index, e))
        })?;
        if raw.is_null() {
            return Ok(SqlValue::Null);
        }

        let type_name = column.type_info().name().to_string();

        match type_name.as_str() {
            "BOOLEAN" | "BOOL" => Self::extract_boolean(row, index),
            "TINYINT" => Self::extract_tinyint(row, index),
            "SMALLINT" => Ok(SqlValue::SmallInt(Self::get(row, index, column)?)),
            "MEDIUMINT" | "INT" | "INTEGER" => Ok(SqlValue::Int(Self::get(row, index, column)?)),
            "BIGINT" => Ok(SqlValue::BigInt(Self::get(row, index, column)?)),
            "FLOAT" => Ok(SqlValue::Float(Self::get(row, index, column)?)),
            "DOUBLE" | "REAL" => Ok(SqlValue::Double(Self::get(row, index, column)?)),
            "DECIMAL" | "NUMERIC" => Self::extract_decimal(row, index, column),
            "VARCHAR" | "CHAR" | "ENUM" | "SET" => {
                Ok(SqlValue::String(Self::get(row, index, column)?))
            }
            "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" => {
                Ok(SqlValue::Text(Self::get(row, index, column)?))
            }
            "JSON" => Ok(SqlValue::Json(Self::get::<JsonValue>(row, index, column)?)),
            "DATE" => Self::extract_date(row, index, column),
            "TIME" => Self::extract_time(row, index, column),
            "DATETIME" | "TIMESTAMP" => Self::extract_datetime(row, index, column),
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                Ok(SqlValue::Bytes(Self::get(row, index, column)?))
            }
            "YEAR" => Ok(SqlValue::SmallInt(Self::get(row, index, column)?)),
            name if name.contains("UNSIGNED") => Self::extract_unsigned(row, index, column, name),
            name => {
                if let Ok(s) = row.try_get::<String, _>(index) {
                    Ok(SqlValue::String(s))
                } else if let Ok(bytes) = row.try_get::<Vec<u8>, _>(index) {
                    Ok(SqlValue::Bytes(bytes))
                } else {
                    log::warn!(
                        "Unknown MySQL type '{}' for column '{}', returning NULL",
                        name,
                        column.name()
                    );
                    Ok(SqlValue::Null)
                }
            }
        }
    }

    fn get<'r, T>(row: &'r MySqlRow, index: usize, column: &MySqlColumn) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
    {
        row.try_get::<T, _>(index).map_err(|e| {
            decode_error(format!(
                "Failed to decode column '{}' ({}): {}",
                column.name(),
                column.type_info().name(),
                e
            ))
        })
    }

    /// TINYINT(1) may come back as bool from newer servers
    fn extract_tinyint(row: &MySqlRow, index: usize) -> Result<SqlValue> {
        if let Ok(val) = row.try_get::<i8, _>(index) {
            return Ok(SqlValue::TinyInt(val));
        }
        if let Ok(val) = row.try_get::<bool, _>(index) {
            return Ok(SqlValue::TinyInt(i8::from(val)));
        }
        Err(decode_error(format!(
            "Could not extract TINYINT at index {}",
            index
        )))
    }

    fn extract_boolean(row: &MySqlRow, index: usize) -> Result<SqlValue> {
        if let Ok(val) = row.try_get::<bool, _>(index) {
            return Ok(SqlValue::Bool(val));
        }
        if let Ok(val) = row.try_get::<i8, _>(index) {
            return Ok(SqlValue::Bool(val != 0));
        }
        Err(decode_error(format!(
            "Could not extract BOOLEAN at index {}",
            index
        )))
    }

    fn extract_unsigned(
        row: &MySqlRow,
        index: usize,
        column: &MySqlColumn,
        type_name: &str,
    ) -> Result<SqlValue> {
        if type_name.contains("BIGINT") {
            Ok(SqlValue::UnsignedBigInt(Self::get(row, index, column)?))
        } else if type_name.contains("TINYINT") {
            Ok(SqlValue::UnsignedTinyInt(Self::get(row, index, column)?))
        } else if type_name.contains("SMALLINT") {
            Ok(SqlValue::UnsignedSmallInt(Self::get(row, index, column)?))
        } else {
            Ok(SqlValue::UnsignedInt(Self::get(row, index, column)?))
        }
    }

    fn extract_decimal(row: &MySqlRow, index: usize, column: &MySqlColumn) -> Result<SqlValue> {
        if let Ok(d) = row.try_get::<rust_decimal::Decimal, _>(index) {
            return Ok(SqlValue::Decimal(d));
        }

        // Text protocol may hand the digits back as a string
        let s: String = Self::get(row, index, column)?;
        s.parse::<rust_decimal::Decimal>()
            .map(SqlValue::Decimal)
            .map_err(|e| decode_error(format!("Invalid DECIMAL '{}': {}", s, e)))
    }

    fn extract_date(row: &MySqlRow, index: usize, column: &MySqlColumn) -> Result<SqlValue> {
        if let Ok(date) = row.try_get::<NaiveDate, _>(index) {
            return Ok(date.into());
        }
        Ok(SqlValue::Date(Self::get(row, index, column)?))
    }

    fn extract_time(row: &MySqlRow, index: usize, column: &MySqlColumn) -> Result<SqlValue> {
        if let Ok(time) = row.try_get::<NaiveTime, _>(index) {
            return Ok(time.into());
        }
        Ok(SqlValue::Time(Self::get(row, index, column)?))
    }

    fn extract_datetime(row: &MySqlRow, index: usize, column: &MySqlColumn) -> Result<SqlValue> {
        if let Ok(dt) = row.try_get::<NaiveDateTime, _>(index) {
            return Ok(dt.into());
        }
        if let Ok(dt) = row.try_get::<chrono::DateTime<chrono::Utc>, _>(index) {
            return Ok(dt.into());
        }
        Ok(SqlValue::DateTime(Self::get(row, index, column)?))
    }
}

fn decode_error(message: String) -> Error {
    Error::backend(None, message)
}
