//! Rendered SQL statements tagged with their kind
//!
//! Builders in this crate produce a `Statement` whose kind is known up
//! front, so the executor can pick the result shape without re-reading the
//! SQL text. Hand-written SQL goes through `Statement::classify`.

use std::fmt;

/// What a statement does, as far as result shaping is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows (SELECT, SHOW, and anything unrecognized)
    Select,
    /// Returns a generated id
    Insert,
    Update,
    Delete,
    /// ALTER / CREATE / DROP
    Ddl,
}

impl StatementKind {
    /// Classify raw SQL by its leading keyword
    ///
    /// The match is a case-sensitive literal prefix including the trailing
    /// space, so `insert into` or `INSERT\n` fall through to `Select`.
    pub fn classify(sql: &str) -> Self {
        const PREFIXES: &[(&str, StatementKind)] = &[
            ("INSERT ", StatementKind::Insert),
            ("ALTER ", StatementKind::Ddl),
            ("CREATE ", StatementKind::Ddl),
            ("DROP ", StatementKind::Ddl),
            ("DELETE ", StatementKind::Delete),
            ("UPDATE ", StatementKind::Update),
        ];

        PREFIXES
            .iter()
            .find(|(prefix, _)| sql.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(StatementKind::Select)
    }

    /// Whether results come back as a status row rather than a result set
    pub fn is_write(&self) -> bool {
        !matches!(self, StatementKind::Select)
    }
}

/// SQL text plus its statement kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
}

impl Statement {
    pub fn new(kind: StatementKind, sql: impl Into<String>) -> Self {
        Self {
            kind,
            sql: sql.into(),
        }
    }

    /// Wrap hand-written SQL, deriving the kind from its prefix
    pub fn classify(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            kind: StatementKind::classify(&sql),
            sql,
        }
    }

    pub fn select(sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Select, sql)
    }

    pub fn insert(sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Insert, sql)
    }

    pub fn update(sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Update, sql)
    }

    pub fn delete(sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Delete, sql)
    }

    pub fn ddl(sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Ddl, sql)
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
