//! Type system for the adapter
//!
//! Value representation, MySQL row decoding, and the column-type registry
//! used by the migration DSL.

pub mod mysql_converter;
pub mod registry;
pub mod value;

// Re-export the main types
pub use mysql_converter::MySqlTypeConverter;
pub use registry::{type_keyword, ColumnType};
pub use value::SqlValue;
