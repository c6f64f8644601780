mod common;

use common::{test_config, ScriptedDriver};
use log::{Level, LevelFilter, Log, Metadata, Record};
use rustf_adapter::{ConnectionManager, QueryExecutor, Statement};
use std::sync::{Arc, Mutex, OnceLock};

/// Collects info-level messages for the whole test binary
struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Info {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

fn logger() -> &'static CaptureLogger {
    static LOGGER: OnceLock<&'static CaptureLogger> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger {
            lines: Mutex::new(Vec::new()),
        }));
        log::set_logger(logger).unwrap();
        log::set_max_level(LevelFilter::Info);
        logger
    })
}

/// Whether any captured info line starts with `sql`
fn logged(sql: &str) -> bool {
    logger()
        .lines
        .lock()
        .unwrap()
        .iter()
        .any(|line| line.starts_with(&format!("{} in ", sql)))
}

async fn executor(log_queries: bool) -> QueryExecutor {
    let manager = Arc::new(ConnectionManager::new(ScriptedDriver::new()));
    manager.connect(test_config()).await.unwrap();
    QueryExecutor::new(manager).with_query_logging(log_queries)
}

#[tokio::test]
async fn test_user_statement_is_logged_with_timing() {
    logger();
    let executor = executor(true).await;

    executor
        .execute_sql("SELECT 'logged' FROM users", false)
        .await
        .unwrap();

    assert!(logged("SELECT 'logged' FROM users"));
}

#[tokio::test]
async fn test_internal_statements_are_not_logged() {
    logger();
    let executor = executor(true).await;

    executor
        .execute_sql("SELECT 'internal' FROM users", true)
        .await
        .unwrap();
    executor
        .execute_internal_once(&Statement::ddl("DROP TABLE internal_once"))
        .await
        .unwrap();

    assert!(!logged("SELECT 'internal' FROM users"));
    assert!(!logged("DROP TABLE internal_once"));
}

#[tokio::test]
async fn test_nothing_logged_when_disabled() {
    logger();
    let executor = executor(false).await;

    executor
        .execute_sql("SELECT 'quiet' FROM users", false)
        .await
        .unwrap();

    assert!(!logged("SELECT 'quiet' FROM users"));
}
