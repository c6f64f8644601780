//! DDL rendering for the migration DSL
//!
//! Pure functions that turn column and index descriptions into DDL
//! statements. Names are emitted as given; values (column defaults, versions)
//! go through the dialect's escaper.

use crate::database::types::{type_keyword, SqlValue};
use crate::error::{Error, Result};
use crate::query::dialects::SqlDialect;
use crate::query::statement::Statement;

/// Bookkeeping table used by migration runners
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

/// Modifiers for one column definition
///
/// Setters that can reject input return `Result`, so an invalid record never
/// exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOptions {
    default: Option<SqlValue>,
    size: Option<ColumnSize>,
    not_null: bool,
    suffix: Option<String>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<SqlValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Length in parentheses after the type keyword, e.g. `VARCHAR(255)`
    pub fn limit(mut self, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::invalid_column("Column limit must be greater than zero"));
        }
        self.size = Some(ColumnSize::Length(limit));
        Ok(self)
    }

    /// Precision and scale for exact numerics, e.g. `DECIMAL(10,2)`
    pub fn precision(mut self, precision: u32, scale: u32) -> Result<Self> {
        if precision == 0 {
            return Err(Error::invalid_column(
                "Column precision must be greater than zero",
            ));
        }
        if scale > precision {
            return Err(Error::invalid_column(format!(
                "Column scale {} exceeds precision {}",
                scale, precision
            )));
        }
        self.size = Some(ColumnSize::Precision(precision, scale));
        Ok(self)
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Raw SQL appended to the definition, e.g. `UNSIGNED` or `COMMENT 'x'`
    pub fn suffix(mut self, suffix: impl Into<String>) -> Result<Self> {
        let suffix = suffix.into();
        if suffix.contains(';') {
            return Err(Error::invalid_column(format!(
                "Column suffix may not contain ';': {}",
                suffix
            )));
        }
        let suffix = suffix.trim().to_string();
        self.suffix = if suffix.is_empty() { None } else { Some(suffix) };
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnSize {
    Length(u32),
    Precision(u32, u32),
}

/// `<name> <KEYWORD>[(<limit>)|(<precision>,<scale>)] [DEFAULT <value>] [NOT NULL] [<suffix>]`
pub fn column(
    dialect: &dyn SqlDialect,
    name: &str,
    type_tag: &str,
    options: &ColumnOptions,
) -> Result<String> {
    let keyword = type_keyword(type_tag)?;

    let mut def = format!("{} {}", name, keyword);
    match options.size {
        Some(ColumnSize::Length(limit)) => def.push_str(&format!("({})", limit)),
        Some(ColumnSize::Precision(p, s)) => def.push_str(&format!("({},{})", p, s)),
        None => {}
    }
    if let Some(default) = &options.default {
        def.push_str(" DEFAULT ");
        def.push_str(&dialect.escape_value(default));
    }
    if options.not_null {
        def.push_str(" NOT NULL");
    }
    if let Some(suffix) = &options.suffix {
        def.push(' ');
        def.push_str(suffix);
    }
    Ok(def)
}

/// Auto-incrementing integer primary key named `id`
pub fn column_id(dialect: &dyn SqlDialect) -> String {
    column_id_named(dialect, "id", &ColumnOptions::new())
}

/// Auto-incrementing integer primary key; only the suffix option applies
pub fn column_id_named(dialect: &dyn SqlDialect, name: &str, options: &ColumnOptions) -> String {
    let mut def = format!(
        "{} INTEGER NOT NULL {}",
        name,
        dialect.auto_increment_syntax()
    );
    if let Some(suffix) = &options.suffix {
        def.push(' ');
        def.push_str(suffix);
    }
    def
}

pub fn create_table(name: &str, columns: &[String], table_options: &str) -> Result<Statement> {
    if columns.is_empty() {
        return Err(Error::invalid_query(format!(
            "Table '{}' needs at least one column",
            name
        )));
    }

    let mut sql = format!("CREATE TABLE {} ({})", name, columns.join(", "));
    let table_options = table_options.trim();
    if !table_options.is_empty() {
        sql.push(' ');
        sql.push_str(table_options);
    }
    Ok(Statement::ddl(sql))
}

pub fn drop_table(name: &str) -> Statement {
    Statement::ddl(format!("DROP TABLE {}", name))
}

pub fn add_column(table: &str, definition: &str) -> Statement {
    Statement::ddl(format!("ALTER TABLE {} ADD COLUMN {}", table, definition))
}

pub fn remove_column(table: &str, column: &str) -> Statement {
    Statement::ddl(format!("ALTER TABLE {} DROP COLUMN {}", table, column))
}

/// `index_<table>_on_<col1>_and_<col2>...`
pub fn default_index_name(table: &str, columns: &[&str]) -> String {
    format!("index_{}_on_{}", table, columns.join("_and_"))
}

pub fn add_index(
    table: &str,
    columns: &[&str],
    unique: bool,
    name: Option<&str>,
) -> Result<Statement> {
    if columns.is_empty() {
        return Err(Error::invalid_query(format!(
            "Index on '{}' needs at least one column",
            table
        )));
    }

    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| default_index_name(table, columns));
    let unique = if unique { "UNIQUE " } else { "" };

    Ok(Statement::ddl(format!(
        "CREATE {}INDEX {} ON {} ({})",
        unique,
        name,
        table,
        columns.join(", ")
    )))
}

/// Drop an index by explicit name, or by the default name for `columns`
pub fn remove_index(
    dialect: &dyn SqlDialect,
    table: &str,
    columns: &[&str],
    name: Option<&str>,
) -> Result<Statement> {
    let name = match name {
        Some(name) => name.to_string(),
        None if !columns.is_empty() => default_index_name(table, columns),
        None => {
            return Err(Error::invalid_query(
                "Removing an index needs a name or its columns",
            ))
        }
    };
    Ok(Statement::ddl(dialect.drop_index_syntax(&name, table)))
}

pub fn create_migrations_table() -> Statement {
    Statement::ddl(format!(
        "CREATE TABLE IF NOT EXISTS {} (version VARCHAR(255) NOT NULL PRIMARY KEY)",
        MIGRATIONS_TABLE
    ))
}

pub fn record_version(dialect: &dyn SqlDialect, version: &str) -> Statement {
    Statement::insert(format!(
        "INSERT INTO {} (version) VALUES ({})",
        MIGRATIONS_TABLE,
        dialect.escape_value(&SqlValue::from(version))
    ))
}

pub fn forget_version(dialect: &dyn SqlDialect, version: &str) -> Statement {
    Statement::delete(format!(
        "DELETE FROM {} WHERE version = {}",
        MIGRATIONS_TABLE,
        dialect.escape_value(&SqlValue::from(version))
    ))
}

pub fn applied_versions() -> Statement {
    Statement::select(format!(
        "SELECT version FROM {} ORDER BY version ASC",
        MIGRATIONS_TABLE
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dialects::MySQLDialect;
    use crate::query::statement::StatementKind;

    #[test]
    fn test_column_id_default() {
        assert_eq!(
            column_id(&MySQLDialect::new()),
            "id INTEGER NOT NULL AUTO_INCREMENT PRIMARY KEY"
        );
    }

    #[test]
    fn test_column_with_options() {
        let d = MySQLDialect::new();
        let options = ColumnOptions::new()
            .limit(120)
            .unwrap()
            .default_value("guest")
            .not_null();
        assert_eq!(
            column(&d, "name", "string", &options).unwrap(),
            "name VARCHAR(120) DEFAULT 'guest' NOT NULL"
        );

        let options = ColumnOptions::new().suffix("UNSIGNED").unwrap();
        assert_eq!(
            column(&d, "age", "integer", &options).unwrap(),
            "age INTEGER UNSIGNED"
        );

        assert_eq!(
            column(&d, "active", "bool", &ColumnOptions::new().default_value(true)).unwrap(),
            "active BOOLEAN DEFAULT 1"
        );
    }

    #[test]
    fn test_column_precision_and_scale() {
        let d = MySQLDialect::new();
        let options = ColumnOptions::new().precision(10, 2).unwrap().not_null();
        assert_eq!(
            column(&d, "price", "decimal", &options).unwrap(),
            "price DECIMAL(10,2) NOT NULL"
        );

        assert!(ColumnOptions::new().precision(0, 0).is_err());
        assert!(matches!(
            ColumnOptions::new().precision(4, 5).unwrap_err(),
            Error::InvalidColumn(_)
        ));
    }

    #[test]
    fn test_column_unknown_type() {
        let err = column(&MySQLDialect::new(), "x", "uuid", &ColumnOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownType(_)));
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(matches!(
            ColumnOptions::new().limit(0).unwrap_err(),
            Error::InvalidColumn(_)
        ));
        assert!(matches!(
            ColumnOptions::new().suffix("; DROP TABLE users").unwrap_err(),
            Error::InvalidColumn(_)
        ));
    }

    #[test]
    fn test_create_and_drop_table() {
        let d = MySQLDialect::new();
        let columns = vec![
            column_id(&d),
            column(&d, "title", "string", &ColumnOptions::new()).unwrap(),
        ];
        let stmt = create_table("posts", &columns, "ENGINE=InnoDB").unwrap();
        assert_eq!(stmt.kind(), StatementKind::Ddl);
        assert_eq!(
            stmt.sql(),
            "CREATE TABLE posts (id INTEGER NOT NULL AUTO_INCREMENT PRIMARY KEY, title VARCHAR) ENGINE=InnoDB"
        );
        assert!(create_table("empty", &[], "").is_err());
        assert_eq!(drop_table("posts").sql(), "DROP TABLE posts");
    }

    #[test]
    fn test_alter_columns() {
        assert_eq!(
            add_column("posts", "body TEXT").sql(),
            "ALTER TABLE posts ADD COLUMN body TEXT"
        );
        assert_eq!(
            remove_column("posts", "body").sql(),
            "ALTER TABLE posts DROP COLUMN body"
        );
    }

    #[test]
    fn test_indexes() {
        let d = MySQLDialect::new();
        assert_eq!(
            add_index("users", &["email"], true, None).unwrap().sql(),
            "CREATE UNIQUE INDEX index_users_on_email ON users (email)"
        );
        assert_eq!(
            add_index("users", &["last", "first"], false, Some("by_name"))
                .unwrap()
                .sql(),
            "CREATE INDEX by_name ON users (last, first)"
        );
        assert_eq!(
            remove_index(&d, "users", &["last", "first"], None).unwrap().sql(),
            "DROP INDEX index_users_on_last_and_first ON users"
        );
        assert!(add_index("users", &[], false, None).is_err());
        assert!(remove_index(&d, "users", &[], None).is_err());
    }

    #[test]
    fn test_bookkeeping_statements() {
        let d = MySQLDialect::new();
        assert_eq!(
            create_migrations_table().sql(),
            "CREATE TABLE IF NOT EXISTS schema_migrations (version VARCHAR(255) NOT NULL PRIMARY KEY)"
        );
        assert_eq!(
            record_version(&d, "20240115103000").sql(),
            "INSERT INTO schema_migrations (version) VALUES ('20240115103000')"
        );
        assert_eq!(
            forget_version(&d, "2024'x").sql(),
            "DELETE FROM schema_migrations WHERE version = '2024\\'x'"
        );
    }
}
