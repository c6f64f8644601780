mod common;

use common::{lost_connection, test_config, Reply, ScriptedDriver};
use rustf_adapter::database::RawResultSet;
use rustf_adapter::migrations::{column, column_id};
use rustf_adapter::{ColumnOptions, ConnectionManager, Error, QueryExecutor, Schema, SqlValue};
use std::sync::Arc;

async fn schema(driver: &Arc<ScriptedDriver>) -> Schema {
    let manager = Arc::new(ConnectionManager::new(driver.clone()));
    manager.connect(test_config()).await.unwrap();
    Schema::new(Arc::new(QueryExecutor::new(manager)))
}

#[tokio::test]
async fn test_create_table_runs_ddl() {
    let driver = ScriptedDriver::new();
    let schema = schema(&driver).await;

    schema
        .create_table("posts", "ENGINE=InnoDB", |d| {
            Ok(vec![
                column_id(d),
                column(d, "title", "string", &ColumnOptions::new().limit(200)?.not_null())?,
                column(d, "published", "boolean", &ColumnOptions::new().default_value(false))?,
            ])
        })
        .await
        .unwrap();

    assert_eq!(
        driver.executed_sql(),
        vec![
            "CREATE TABLE posts (id INTEGER NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             title VARCHAR(200) NOT NULL, published BOOLEAN DEFAULT 0) ENGINE=InnoDB"
        ]
    );
}

#[tokio::test]
async fn test_unknown_type_stops_before_backend() {
    let driver = ScriptedDriver::new();
    let schema = schema(&driver).await;

    let err = schema
        .create_table("posts", "", |d| {
            Ok(vec![column(d, "body", "jsonb", &ColumnOptions::new())?])
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownType(tag) if tag == "jsonb"));
    assert!(driver.executed_sql().is_empty());
}

#[tokio::test]
async fn test_alter_and_index_operations() {
    let driver = ScriptedDriver::new();
    let schema = schema(&driver).await;

    schema
        .add_column("posts", "views", "integer", &ColumnOptions::new().default_value(0))
        .await
        .unwrap();
    schema.remove_column("posts", "views").await.unwrap();
    schema
        .add_index("posts", &["author_id", "created_at"], false, None)
        .await
        .unwrap();
    schema
        .remove_index("posts", &["author_id", "created_at"], None)
        .await
        .unwrap();
    schema.drop_table("posts").await.unwrap();

    assert_eq!(
        driver.executed_sql(),
        vec![
            "ALTER TABLE posts ADD COLUMN views INTEGER DEFAULT 0",
            "ALTER TABLE posts DROP COLUMN views",
            "CREATE INDEX index_posts_on_author_id_and_created_at ON posts (author_id, created_at)",
            "DROP INDEX index_posts_on_author_id_and_created_at ON posts",
            "DROP TABLE posts",
        ]
    );
}

#[tokio::test]
async fn test_migration_errors_are_not_retried() {
    let driver = ScriptedDriver::new();
    driver.push(Reply::Fail(lost_connection()));
    let schema = schema(&driver).await;

    let err = schema.drop_table("posts").await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(driver.sessions_opened(), 1);
    assert_eq!(driver.executed_sql().len(), 1);
}

#[tokio::test]
async fn test_version_bookkeeping() {
    let driver = ScriptedDriver::new();
    let schema = schema(&driver).await;

    schema.create_migrations_table().await.unwrap();
    schema.record_version("20240115103000").await.unwrap();
    schema.forget_version("20240115103000").await.unwrap();

    driver.push(Reply::Rows(RawResultSet {
        columns: vec!["version".to_string()],
        rows: vec![
            vec![SqlValue::String("20240101000000".into())],
            vec![SqlValue::String("20240115103000".into())],
        ],
    }));
    let versions = schema.applied_versions().await.unwrap();

    assert_eq!(versions, vec!["20240101000000", "20240115103000"]);
    let executed = driver.executed_sql();
    assert_eq!(
        executed[0],
        "CREATE TABLE IF NOT EXISTS schema_migrations (version VARCHAR(255) NOT NULL PRIMARY KEY)"
    );
    assert_eq!(
        executed[1],
        "INSERT INTO schema_migrations (version) VALUES ('20240115103000')"
    );
    assert_eq!(
        executed[2],
        "DELETE FROM schema_migrations WHERE version = '20240115103000'"
    );
    assert_eq!(
        executed[3],
        "SELECT version FROM schema_migrations ORDER BY version ASC"
    );
}
