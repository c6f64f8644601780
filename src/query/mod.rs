//! Query rendering
//!
//! Turns the dialect-neutral [`Query`] model and write descriptions into
//! SQL text. Everything in this module is pure; execution lives in
//! [`crate::database::executor`].

pub mod core;
pub mod dialects;
pub mod fragments;
pub mod statement;
pub mod write;

pub use self::core::{
    CompareOp, Condition, Connective, Expr, JoinClause, JoinType, Limit, OrderByClause,
    OrderDirection, Predicate, Query, SelectItem,
};
pub use dialects::{create_dialect, ConflictStrategy, DatabaseBackend, MySQLDialect, SqlDialect};
pub use fragments::render_select;
pub use statement::{Statement, StatementKind};
pub use write::{render_delete, render_insert_or_update, render_update, FieldMap};
