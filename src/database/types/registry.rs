//! Type registry for migration column types
//!
//! Maps the abstract column-type tags used by the migration DSL to the
//! keywords the backend understands.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Abstract column type accepted by the migration DSL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Char,
    String,
    Text,
    Integer,
    Float,
    Decimal,
    DateTime,
    Timestamp,
    Time,
    Date,
    Binary,
    Boolean,
}

/// Every recognized tag with its column type, aliases included
const TAGS: &[(&str, ColumnType)] = &[
    ("char", ColumnType::Char),
    ("string", ColumnType::String),
    ("text", ColumnType::Text),
    ("integer", ColumnType::Integer),
    ("int", ColumnType::Integer),
    ("float", ColumnType::Float),
    ("decimal", ColumnType::Decimal),
    ("datetime", ColumnType::DateTime),
    ("timestamp", ColumnType::Timestamp),
    ("time", ColumnType::Time),
    ("date", ColumnType::Date),
    ("binary", ColumnType::Binary),
    ("boolean", ColumnType::Boolean),
    ("bool", ColumnType::Boolean),
];

impl ColumnType {
    /// Backend keyword for this type
    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnType::Char => "CHARACTER",
            ColumnType::String => "VARCHAR",
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "FLOAT",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Time => "TIME",
            ColumnType::Date => "DATE",
            ColumnType::Binary => "BLOB",
            ColumnType::Boolean => "BOOLEAN",
        }
    }

    /// Look up a tag such as `"string"` or `"bool"`
    pub fn from_tag(tag: &str) -> Result<Self> {
        TAGS.iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, column_type)| *column_type)
            .ok_or_else(|| Error::unknown_type(tag))
    }

    /// All recognized tags, in documentation order
    pub fn tags() -> impl Iterator<Item = &'static str> {
        TAGS.iter().map(|(name, _)| *name)
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Map a type tag straight to its backend keyword
pub fn type_keyword(tag: &str) -> Result<&'static str> {
    ColumnType::from_tag(tag).map(|t| t.keyword())
}
