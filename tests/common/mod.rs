//! Scripted in-memory driver shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use rustf_adapter::database::{
    ConnectionConfig, DatabaseDriver, DriverSession, QueryResult, RawResultSet,
};
use rustf_adapter::{Error, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted backend reply, consumed in order by any session
pub enum Reply {
    Rows(RawResultSet),
    Done(QueryResult),
    Fail(Error),
}

#[derive(Default)]
struct Shared {
    replies: Mutex<VecDeque<Reply>>,
    /// (session number, sql) in execution order
    log: Mutex<Vec<(usize, String)>>,
    closed: Mutex<Vec<usize>>,
}

#[derive(Default)]
pub struct ScriptedDriver {
    shared: Arc<Shared>,
    opened: AtomicUsize,
    refuse: AtomicBool,
}

impl ScriptedDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Reply) {
        self.shared.replies.lock().unwrap().push_back(reply);
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<(usize, String)> {
        self.shared.log.lock().unwrap().clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|(_, sql)| sql).collect()
    }

    pub fn closed_sessions(&self) -> Vec<usize> {
        self.shared.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DatabaseDriver for ScriptedDriver {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn connect(&self, _config: &ConnectionConfig) -> Result<Arc<dyn DriverSession>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(Error::connection("Access denied for user"));
        }
        let number = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(ScriptedSession {
            number,
            shared: self.shared.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

pub struct ScriptedSession {
    number: usize,
    shared: Arc<Shared>,
    closed: AtomicBool,
}

impl ScriptedSession {
    fn next(&self, sql: &str) -> Option<Reply> {
        self.shared
            .log
            .lock()
            .unwrap()
            .push((self.number, sql.to_string()));
        self.shared.replies.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl DriverSession for ScriptedSession {
    async fn query(&self, sql: &str) -> Result<RawResultSet> {
        match self.next(sql) {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(e)) => Err(e),
            Some(Reply::Done(_)) | None => Ok(RawResultSet::default()),
        }
    }

    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        match self.next(sql) {
            Some(Reply::Done(result)) => Ok(result),
            Some(Reply::Fail(e)) => Err(e),
            Some(Reply::Rows(_)) | None => Ok(QueryResult {
                rows_affected: 0,
                last_insert_id: None,
            }),
        }
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.shared.closed.lock().unwrap().push(self.number);
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::builder()
        .host("localhost")
        .username("app")
        .database("app_test")
        .build()
        .unwrap()
}

pub fn lost_connection() -> Error {
    Error::transient(Some(2013), "Lost connection to MySQL server during query")
}
