//! Structured query model
//!
//! A `Query` is a value object describing a SELECT: target table, selected
//! columns, conditions, joins, grouping, ordering and paging. Builder methods
//! consume the query and return a new one; nothing mutates a query in place.

use super::dialects::SqlDialect;
use super::fragments;
use super::statement::Statement;
use crate::database::types::SqlValue;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A column or value reference inside a query
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// SQL fragment inserted verbatim
    Raw(String),
    /// Table or column name, escaped when rendered
    Identifier(String),
    /// Literal value, escaped and quoted when rendered
    Value(SqlValue),
}

impl Expr {
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn value(value: impl Into<SqlValue>) -> Self {
        Expr::Value(value.into())
    }

    /// Render with the dialect's escaping rules
    pub fn render(&self, dialect: &dyn SqlDialect) -> String {
        match self {
            Expr::Raw(sql) => sql.clone(),
            Expr::Identifier(name) => dialect.escape_identifier(name),
            Expr::Value(value) => dialect.escape_value(value),
        }
    }
}

impl From<&str> for Expr {
    fn from(sql: &str) -> Self {
        Expr::Raw(sql.to_string())
    }
}

impl From<String> for Expr {
    fn from(sql: String) -> Self {
        Expr::Raw(sql)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Expr::Value(value)
    }
}

/// One entry of the SELECT list
#[derive(Clone, Debug, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            alias: None,
        }
    }

    pub fn aliased(expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for SelectItem {
    fn from(sql: &str) -> Self {
        SelectItem::new(sql)
    }
}

impl From<String> for SelectItem {
    fn from(sql: String) -> Self {
        SelectItem::new(sql)
    }
}

impl From<Expr> for SelectItem {
    fn from(expr: Expr) -> Self {
        SelectItem::new(expr)
    }
}

/// Boolean connective joining a condition to the chain before it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn keyword(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// Binary comparison operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
        }
    }
}

/// The body of a WHERE/HAVING condition
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Raw(String),
    Compare {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    IsNull(Expr),
    IsNotNull(Expr),
    In {
        expr: Expr,
        values: Vec<Expr>,
        negated: bool,
    },
    Between {
        expr: Expr,
        low: Expr,
        high: Expr,
    },
}

impl Predicate {
    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    pub fn compare(left: impl Into<Expr>, op: CompareOp, right: impl Into<Expr>) -> Self {
        Predicate::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// `column = value`, with the value escaped
    pub fn eq(column: impl Into<Expr>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Eq, Expr::value(value))
    }

    pub fn is_in<V: Into<SqlValue>>(column: impl Into<Expr>, values: Vec<V>) -> Self {
        Predicate::In {
            expr: column.into(),
            values: values.into_iter().map(Expr::value).collect(),
            negated: false,
        }
    }

    pub fn not_in<V: Into<SqlValue>>(column: impl Into<Expr>, values: Vec<V>) -> Self {
        Predicate::In {
            expr: column.into(),
            values: values.into_iter().map(Expr::value).collect(),
            negated: true,
        }
    }

    pub fn between(
        column: impl Into<Expr>,
        low: impl Into<SqlValue>,
        high: impl Into<SqlValue>,
    ) -> Self {
        Predicate::Between {
            expr: column.into(),
            low: Expr::value(low),
            high: Expr::value(high),
        }
    }
}

/// A condition plus the connective that joins it to the chain
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub connective: Connective,
    pub predicate: Predicate,
}

impl Condition {
    pub fn and(predicate: Predicate) -> Self {
        Self {
            connective: Connective::And,
            predicate,
        }
    }

    pub fn or(predicate: Predicate) -> Self {
        Self {
            connective: Connective::Or,
            predicate,
        }
    }

    /// Raw SQL joined with AND
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::and(Predicate::raw(sql))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinType {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN descriptor; `on` is raw SQL
#[derive(Clone, Debug, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub alias: Option<String>,
    pub on: Option<String>,
}

impl JoinClause {
    pub fn new(join_type: JoinType, table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            join_type,
            table: table.into(),
            alias: None,
            on: Some(on.into()),
        }
    }

    pub fn inner(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(JoinType::Inner, table, on)
    }

    pub fn left(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(JoinType::Left, table, on)
    }

    pub fn right(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(JoinType::Right, table, on)
    }

    pub fn cross(table: impl Into<String>) -> Self {
        Self {
            join_type: JoinType::Cross,
            table: table.into(),
            alias: None,
            on: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderByClause {
    pub column: Expr,
    pub direction: OrderDirection,
}

impl OrderByClause {
    pub fn asc(column: impl Into<Expr>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<Expr>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }
}

/// Row limit; `All` is the "no limit" sentinel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Limit {
    #[default]
    All,
    Rows(u64),
}

impl From<u64> for Limit {
    fn from(n: u64) -> Self {
        Limit::Rows(n)
    }
}

impl FromStr for Limit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "ALL" {
            return Ok(Limit::All);
        }
        s.parse::<u64>()
            .map(Limit::Rows)
            .map_err(|_| Error::invalid_query(format!("Invalid limit '{}'", s)))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::All => write!(f, "ALL"),
            Limit::Rows(n) => write!(f, "{}", n),
        }
    }
}

/// Dialect-neutral SELECT description
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    table: String,
    columns: Vec<SelectItem>,
    joins: Vec<JoinClause>,
    conditions: Vec<Condition>,
    group_by: Vec<Expr>,
    having: Vec<Condition>,
    order_by: Vec<OrderByClause>,
    limit: Limit,
    offset: u64,
}

impl Query {
    /// Select everything from `table`
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: Limit::All,
            offset: 0,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[SelectItem] {
        &self.columns
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn group_by(&self) -> &[Expr] {
        &self.group_by
    }

    pub fn having(&self) -> &[Condition] {
        &self.having
    }

    pub fn order_by(&self) -> &[OrderByClause] {
        &self.order_by
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn with_table(self, table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..self
        }
    }

    /// Replace the SELECT list
    pub fn with_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SelectItem>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_joins(self, joins: Vec<JoinClause>) -> Self {
        Self { joins, ..self }
    }

    pub fn with_conditions(self, conditions: Vec<Condition>) -> Self {
        Self { conditions, ..self }
    }

    pub fn with_group_by<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Expr>,
    {
        Self {
            group_by: columns.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_having(self, having: Vec<Condition>) -> Self {
        Self { having, ..self }
    }

    pub fn with_order(self, order_by: Vec<OrderByClause>) -> Self {
        Self { order_by, ..self }
    }

    pub fn with_limit(self, rows: u64) -> Self {
        Self {
            limit: Limit::Rows(rows),
            ..self
        }
    }

    /// Drop any row limit
    pub fn unlimited(self) -> Self {
        Self {
            limit: Limit::All,
            ..self
        }
    }

    pub fn with_offset(self, offset: u64) -> Self {
        Self { offset, ..self }
    }

    /// Append a condition joined with AND
    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.conditions.push(Condition::and(predicate));
        self
    }

    /// Append a condition joined with OR
    pub fn or_where(mut self, predicate: Predicate) -> Self {
        self.conditions.push(Condition::or(predicate));
        self
    }

    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    pub fn order(mut self, clause: OrderByClause) -> Self {
        self.order_by.push(clause);
        self
    }

    /// Page through results, pages counted from 1
    pub fn paginate(self, page: u64, per_page: u64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        Self {
            limit: Limit::Rows(per_page),
            offset,
            ..self
        }
    }

    /// Render the full SELECT text
    pub fn render(&self, dialect: &dyn SqlDialect) -> String {
        fragments::render_select(dialect, self)
    }

    /// Render as a tagged statement ready for the executor
    pub fn to_statement(&self, dialect: &dyn SqlDialect) -> Statement {
        Statement::select(self.render(dialect))
    }
}
