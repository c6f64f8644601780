//! SQL fragment rendering
//!
//! Pure functions, one per clause. Each returns an empty string when its
//! clause has nothing to say, and `render_select` stitches the pieces
//! together with single spaces before collapsing whitespace.

use super::core::{
    Condition, Connective, Expr, JoinClause, Limit, OrderByClause, Predicate, Query, SelectItem,
};
use super::dialects::SqlDialect;
use once_cell::sync::Lazy;
use regex::Regex;

static DEGENERATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(WHERE|HAVING)\s+TRUE\s+AND\s+")
        .expect("fragments: invalid degenerate prefix regex")
});

/// Comma-joined SELECT list, `*` when empty
pub fn select_list(dialect: &dyn SqlDialect, columns: &[SelectItem]) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }

    columns
        .iter()
        .map(|item| match &item.alias {
            Some(alias) => format!("{} AS {}", item.expr.render(dialect), alias),
            None => item.expr.render(dialect),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn from_clause(dialect: &dyn SqlDialect, table: &str) -> String {
    format!("FROM {}", dialect.escape_identifier(table))
}

/// Space-joined JOIN clauses in input order
pub fn join_clause(dialect: &dyn SqlDialect, joins: &[JoinClause]) -> String {
    joins
        .iter()
        .map(|join| {
            let mut clause = format!(
                "{} {}",
                join.join_type.keyword(),
                dialect.escape_identifier(&join.table)
            );
            if let Some(alias) = &join.alias {
                clause.push_str(" AS ");
                clause.push_str(alias);
            }
            if let Some(on) = &join.on {
                clause.push_str(" ON ");
                clause.push_str(on);
            }
            clause
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a single predicate without its connective
pub fn predicate(dialect: &dyn SqlDialect, predicate: &Predicate) -> String {
    match predicate {
        Predicate::Raw(sql) => sql.clone(),
        Predicate::Compare { left, op, right } => format!(
            "{} {} {}",
            left.render(dialect),
            op.as_str(),
            right.render(dialect)
        ),
        Predicate::IsNull(expr) => format!("{} IS NULL", expr.render(dialect)),
        Predicate::IsNotNull(expr) => format!("{} IS NOT NULL", expr.render(dialect)),
        Predicate::In {
            expr,
            values,
            negated,
        } => {
            // An empty list would be a syntax error
            if values.is_empty() {
                return if *negated { "TRUE" } else { "FALSE" }.to_string();
            }
            let list = values
                .iter()
                .map(|v| v.render(dialect))
                .collect::<Vec<_>>()
                .join(", ");
            let keyword = if *negated { "NOT IN" } else { "IN" };
            format!("{} {} ({})", expr.render(dialect), keyword, list)
        }
        Predicate::Between { expr, low, high } => format!(
            "{} BETWEEN {} AND {}",
            expr.render(dialect),
            low.render(dialect),
            high.render(dialect)
        ),
    }
}

fn condition_chain(dialect: &dyn SqlDialect, keyword: &str, conditions: &[Condition]) -> String {
    let Some(first) = conditions.first() else {
        return String::new();
    };

    let seed = match first.connective {
        Connective::And => "TRUE",
        Connective::Or => "FALSE",
    };

    let mut sql = format!("{} {}", keyword, seed);
    for condition in conditions {
        sql.push(' ');
        sql.push_str(condition.connective.keyword());
        sql.push(' ');
        sql.push_str(&predicate(dialect, &condition.predicate));
    }

    DEGENERATE_PREFIX.replace(&sql, "${1} ").into_owned()
}

/// WHERE clause seeded with TRUE/FALSE so every condition can carry its
/// own connective
pub fn where_clause(dialect: &dyn SqlDialect, conditions: &[Condition]) -> String {
    condition_chain(dialect, "WHERE", conditions)
}

pub fn having_clause(dialect: &dyn SqlDialect, conditions: &[Condition]) -> String {
    condition_chain(dialect, "HAVING", conditions)
}

pub fn group_by_clause(dialect: &dyn SqlDialect, columns: &[Expr]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    format!(
        " GROUP BY {}",
        columns
            .iter()
            .map(|c| c.render(dialect))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// ORDER BY entries; unqualified identifiers are qualified with `table`
pub fn order_by_clause(dialect: &dyn SqlDialect, table: &str, order_by: &[OrderByClause]) -> String {
    if order_by.is_empty() {
        return String::new();
    }

    let entries = order_by
        .iter()
        .map(|entry| {
            let column = match &entry.column {
                Expr::Identifier(name) if !name.contains('.') => {
                    dialect.escape_identifier(&format!("{}.{}", table, name))
                }
                other => other.render(dialect),
            };
            format!("{} {}", column, entry.direction.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("ORDER BY {}", entries)
}

pub fn limit_clause(limit: Limit) -> String {
    match limit {
        Limit::All => String::new(),
        Limit::Rows(n) => format!("LIMIT {}", n),
    }
}

pub fn offset_clause(offset: u64) -> String {
    if offset == 0 {
        String::new()
    } else {
        format!("OFFSET {}", offset)
    }
}

/// Collapse whitespace runs to one space and trim
///
/// Text inside single- or double-quoted literals and backtick identifiers is
/// copied unchanged; backslash escapes inside literals are honored.
pub fn collapse_whitespace(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars();
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && q != '`' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if matches!(c, '\'' | '"' | '`') {
            quote = Some(c);
        }
        out.push(c);
    }

    out
}

/// Assemble a complete SELECT statement
pub fn render_select(dialect: &dyn SqlDialect, query: &Query) -> String {
    let parts = [
        "SELECT".to_string(),
        select_list(dialect, query.columns()),
        from_clause(dialect, query.table()),
        join_clause(dialect, query.joins()),
        where_clause(dialect, query.conditions()),
        group_by_clause(dialect, query.group_by()),
        having_clause(dialect, query.having()),
        order_by_clause(dialect, query.table(), query.order_by()),
        limit_clause(query.limit()),
        offset_clause(query.offset()),
    ];

    let sql = collapse_whitespace(&parts.join(" "));
    log::debug!("Rendered SELECT: {}", sql);
    sql
}
