//! MySQL/MariaDB dialect implementation
//!
//! Identifiers are backtick-quoted per dot-separated segment. Literal strings
//! use the same backslash escapes as the server's own escaping routine
//! (`mysql_real_escape_string`).

use super::{ConflictStrategy, DatabaseBackend, SqlDialect};
use crate::database::types::value::hex_encode;
use crate::database::types::SqlValue;

/// MySQL/MariaDB dialect
pub struct MySQLDialect;

impl MySQLDialect {
    /// Create a new MySQL dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for MySQLDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for MySQLDialect {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::MySQL
    }

    fn escape_identifier(&self, identifier: &str) -> String {
        identifier
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    segment.to_string()
                } else {
                    // Backticks cannot be escaped reliably here, so they are replaced
                    format!("`{}`", segment.replace('`', "-"))
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn escape_string(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 8);
        for c in value.chars() {
            match c {
                '\0' => escaped.push_str("\\0"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\\' => escaped.push_str("\\\\"),
                '\'' => escaped.push_str("\\'"),
                '"' => escaped.push_str("\\\""),
                '\x1a' => escaped.push_str("\\Z"),
                c => escaped.push(c),
            }
        }
        escaped
    }

    fn escape_value(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            SqlValue::Bytes(bytes) => format!("X'{}'", hex_encode(bytes)),
            v if v.is_numeric() => v.to_string(),
            v => format!("'{}'", self.escape_string(&v.to_string())),
        }
    }

    fn auto_increment_syntax(&self) -> &'static str {
        "AUTO_INCREMENT PRIMARY KEY"
    }

    fn insert_keyword(&self, strategy: ConflictStrategy) -> &'static str {
        match strategy {
            ConflictStrategy::Ignore => "INSERT IGNORE INTO",
            ConflictStrategy::Error | ConflictStrategy::Update => "INSERT INTO",
        }
    }

    fn upsert_clause(&self, columns: &[String]) -> String {
        format!(
            "ON DUPLICATE KEY UPDATE {}",
            columns
                .iter()
                .map(|col| format!("{} = VALUES({})", col, col))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    fn drop_index_syntax(&self, index: &str, table: &str) -> String {
        format!("DROP INDEX {} ON {}", index, table)
    }
}
