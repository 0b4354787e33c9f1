//! Maintenance client: connect, disconnect, truncate tables, reset sequences
//!
//! One client owns one connection pool for the life of the process. The
//! bulk operations read the catalog fresh on every call.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIGRATIONS_TABLE, DEFAULT_SCHEMA};
use crate::db::catalog::{restart_sequence_sql, truncate_table_sql};
use crate::db::{MaintenanceBackend, PgBackend};
use crate::error::{Error, Result};
use crate::lifecycle::{HostApplication, ShutdownHooks};

/// What the bulk operations act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceSettings {
    pub schema: String,
    /// Never truncated
    pub migrations_table: String,
    pub truncate_concurrency: usize,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            migrations_table: DEFAULT_MIGRATIONS_TABLE.to_string(),
            truncate_concurrency: DEFAULT_MAX_CONNECTIONS as usize,
        }
    }
}

impl From<&Config> for MaintenanceSettings {
    fn from(config: &Config) -> Self {
        Self {
            schema: config.schema.clone(),
            migrations_table: config.migrations_table.clone(),
            truncate_concurrency: config.truncate_concurrency.max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableFailure {
    pub table: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncateReport {
    pub schema: String,
    pub truncated: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<TableFailure>,
    pub finished_at: DateTime<Utc>,
}

impl TruncateReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetReport {
    pub schema: String,
    pub reset: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

pub struct MaintenanceDbClient {
    backend: Box<dyn MaintenanceBackend>,
    settings: MaintenanceSettings,
    hooks: ShutdownHooks,
    /// Set once `disconnect` has started
    closing: AtomicBool,
    /// Set once hosts are closed and the pool is going away
    disconnected: AtomicBool,
}

impl MaintenanceDbClient {
    /// Open the connection pool and return a connected client
    pub async fn initialize(config: &Config) -> Result<Self> {
        let backend = PgBackend::connect(config).await?;
        let client = Self::with_backend(Box::new(backend), MaintenanceSettings::from(config));
        info!(schema = %client.settings.schema, "Initialized and connected");
        Ok(client)
    }

    /// Wrap an already-connected backend
    pub fn with_backend(backend: Box<dyn MaintenanceBackend>, settings: MaintenanceSettings) -> Self {
        Self {
            backend,
            settings,
            hooks: ShutdownHooks::new(),
            closing: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn settings(&self) -> &MaintenanceSettings {
        &self.settings
    }

    pub fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst) && !self.backend.is_closed()
    }

    /// Close `host` when this client is about to disconnect
    pub fn register_shutdown(&self, host: Arc<dyn HostApplication>) {
        if self.closing.load(Ordering::SeqCst) {
            warn!("Host registered after disconnect started; it will not be closed");
            return;
        }
        self.hooks.register(host);
    }

    /// Notify registered hosts, then close the pool.
    ///
    /// Hosts run while the client still accepts queries. Only the first call
    /// does anything.
    pub async fn disconnect(&self) {
        if self.closing.swap(true, Ordering::SeqCst) {
            return;
        }

        let closed_hosts = self.hooks.fire().await;
        if closed_hosts > 0 {
            warn!(hosts = closed_hosts, "DB: graceful shutdown");
        }

        self.disconnected.store(true, Ordering::SeqCst);
        self.backend.close().await;
        debug!("Connection pool closed");
    }

    /// Run `f` with this client, disconnecting afterwards on every path
    pub async fn scoped<F, T>(self, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c MaintenanceDbClient) -> BoxFuture<'c, Result<T>>,
    {
        let result = f(&self).await;
        self.disconnect().await;
        result
    }

    pub async fn server_version(&self) -> Result<String> {
        self.ensure_connected()?;
        self.backend.server_version().await
    }

    /// Every named table in the schema, including the reserved one
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        self.ensure_connected()?;
        let rows = self.backend.fetch_tables(&self.settings.schema).await?;
        Ok(rows.into_iter().flatten().filter(|n| !n.is_empty()).collect())
    }

    pub async fn list_sequences(&self) -> Result<Vec<String>> {
        self.ensure_connected()?;
        let rows = self.backend.fetch_sequences(&self.settings.schema).await?;
        Ok(rows.into_iter().flatten().filter(|n| !n.is_empty()).collect())
    }

    pub fn is_reserved_table(&self, table: &str) -> bool {
        table == self.settings.migrations_table
    }

    /// Truncate every table in the schema except the migrations table.
    ///
    /// Tables are truncated concurrently and every outcome is collected
    /// before returning. A table that fails to truncate is logged and listed
    /// in the report; only a failing catalog query is an error.
    pub async fn truncate_all(&self) -> Result<TruncateReport> {
        self.ensure_connected()?;
        let schema = &self.settings.schema;
        let rows = self.backend.fetch_tables(schema).await?;
        let (targets, skipped) = self.partition_tables(rows);

        debug!(schema = %schema, tables = targets.len(), "Truncating tables");

        let outcomes: Vec<(String, Result<u64>)> = stream::iter(targets)
            .map(|table| async move {
                let result = self.truncate_table(&table).await;
                (table, result)
            })
            .buffered(self.settings.truncate_concurrency.max(1))
            .collect()
            .await;

        let mut truncated = Vec::new();
        let mut failures = Vec::new();
        for (table, result) in outcomes {
            match result {
                Ok(_) => truncated.push(table),
                Err(e) => failures.push(TableFailure {
                    table,
                    error: e.to_string(),
                }),
            }
        }

        if failures.is_empty() {
            info!(schema = %schema, truncated = truncated.len(), "Tables truncated");
        } else {
            warn!(
                schema = %schema,
                truncated = truncated.len(),
                failed = failures.len(),
                "Some tables could not be truncated"
            );
        }

        Ok(TruncateReport {
            schema: schema.clone(),
            truncated,
            skipped,
            failures,
            finished_at: Utc::now(),
        })
    }

    /// Truncate one table with CASCADE, logging a failure before returning it
    async fn truncate_table(&self, table: &str) -> Result<u64> {
        let schema = &self.settings.schema;
        match self.backend.execute(&truncate_table_sql(schema, table)).await {
            Ok(rows) => {
                debug!(schema = %schema, table = %table, "Table truncated");
                Ok(rows)
            }
            Err(e) => {
                error!(schema = %schema, table = %table, error = %e, "Failed to truncate table");
                Err(e)
            }
        }
    }

    /// Restart every sequence in the schema at 1, one at a time.
    ///
    /// Stops at the first failure; later sequences are left untouched.
    pub async fn reset_sequences(&self) -> Result<ResetReport> {
        self.ensure_connected()?;
        let schema = &self.settings.schema;
        let rows = self.backend.fetch_sequences(schema).await?;

        let mut reset = Vec::with_capacity(rows.len());
        for row in rows {
            let name = row
                .filter(|n| !n.is_empty())
                .ok_or(Error::MissingSequenceName)?;
            self.backend
                .execute(&restart_sequence_sql(schema, &name))
                .await?;
            debug!(schema = %schema, sequence = %name, "Sequence restarted");
            reset.push(name);
        }

        info!(schema = %schema, sequences = reset.len(), "Sequences reset");

        Ok(ResetReport {
            schema: schema.clone(),
            reset,
            finished_at: Utc::now(),
        })
    }

    /// Statements `truncate_all` would run right now
    pub async fn plan_truncate(&self) -> Result<Vec<String>> {
        self.ensure_connected()?;
        let schema = &self.settings.schema;
        let rows = self.backend.fetch_tables(schema).await?;
        let (targets, _) = self.partition_tables(rows);
        Ok(targets
            .iter()
            .map(|table| truncate_table_sql(schema, table))
            .collect())
    }

    /// Statements `reset_sequences` would run right now
    pub async fn plan_reset(&self) -> Result<Vec<String>> {
        self.ensure_connected()?;
        let schema = &self.settings.schema;
        let rows = self.backend.fetch_sequences(schema).await?;
        rows.into_iter()
            .map(|row| {
                row.filter(|n| !n.is_empty())
                    .map(|name| restart_sequence_sql(schema, &name))
                    .ok_or(Error::MissingSequenceName)
            })
            .collect()
    }

    /// Split catalog rows into (tables to truncate, reserved tables skipped)
    fn partition_tables(&self, rows: Vec<Option<String>>) -> (Vec<String>, Vec<String>) {
        let mut targets = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();
        for row in rows {
            match row {
                Some(name) if name.is_empty() => debug!("Skipping table with empty name"),
                Some(name) if self.is_reserved_table(&name) => skipped.push(name),
                Some(name) => targets.push(name),
                None => debug!("Skipping table without a name"),
            }
        }
        (targets, skipped)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }
}

/// Connect, run `f`, and disconnect on every exit path
pub async fn with_client<F, T>(config: &Config, f: F) -> Result<T>
where
    F: for<'c> FnOnce(&'c MaintenanceDbClient) -> BoxFuture<'c, Result<T>>,
{
    let client = MaintenanceDbClient::initialize(config).await?;
    client.scoped(f).await
}
