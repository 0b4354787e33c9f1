//! In-memory backend that records statements instead of running them

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::db::MaintenanceBackend;
use crate::error::{Error, Result};
use crate::lifecycle::HostApplication;

pub type EventLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
pub struct FakeBackend {
    tables: Vec<Option<String>>,
    sequences: Vec<Option<String>>,
    failing: HashSet<String>,
    catalog_fails: bool,
    executed: EventLog,
    events: EventLog,
    closed: AtomicBool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, names: &[&str]) -> Self {
        self.tables.extend(names.iter().map(|n| Some(n.to_string())));
        self
    }

    pub fn with_unnamed_table(mut self) -> Self {
        self.tables.push(None);
        self
    }

    pub fn with_sequences(mut self, names: &[&str]) -> Self {
        self.sequences.extend(names.iter().map(|n| Some(n.to_string())));
        self
    }

    pub fn with_unnamed_sequence(mut self) -> Self {
        self.sequences.push(None);
        self
    }

    /// Fail any statement that targets this object
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn failing_catalog(mut self) -> Self {
        self.catalog_fails = true;
        self
    }

    pub fn sharing_events(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    /// Handle to the statements run so far; stays valid after the backend is boxed
    pub fn statements(&self) -> EventLog {
        self.executed.clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn catalog(&self, rows: &[Option<String>]) -> Result<Vec<Option<String>>> {
        if self.catalog_fails {
            return Err(Error::Database(sqlx::Error::Protocol(
                "catalog unavailable".to_string(),
            )));
        }
        Ok(rows.to_vec())
    }
}

#[async_trait]
impl MaintenanceBackend for FakeBackend {
    async fn fetch_tables(&self, _schema: &str) -> Result<Vec<Option<String>>> {
        self.catalog(&self.tables)
    }

    async fn fetch_sequences(&self, _schema: &str) -> Result<Vec<Option<String>>> {
        self.catalog(&self.sequences)
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        // Let sibling futures interleave, as they would on a real pool.
        tokio::task::yield_now().await;

        let target = self
            .failing
            .iter()
            .find(|name| sql.contains(&format!("\"{}\"", name)));
        if let Some(name) = target {
            return Err(Error::Database(sqlx::Error::Protocol(format!(
                "relation \"{}\" is locked",
                name
            ))));
        }

        self.executed.lock().unwrap().push(sql.to_string());
        Ok(0)
    }

    async fn server_version(&self) -> Result<String> {
        Ok("16.0 (fake)".to_string())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.record("backend closed".to_string());
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Host that writes its close into a shared event log
pub struct RecordingHost {
    pub events: EventLog,
}

#[async_trait]
impl HostApplication for RecordingHost {
    async fn close(&self) {
        self.events.lock().unwrap().push("host closed".to_string());
    }
}
