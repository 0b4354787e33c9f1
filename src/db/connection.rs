//! PostgreSQL connection management for dbsweep

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::backend::MaintenanceBackend;
use super::catalog::{LIST_SEQUENCES_SQL, LIST_TABLES_SQL, SERVER_VERSION_SQL};
use crate::config::Config;
use crate::error::Result;

/// Connection pool shared by every maintenance operation
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    /// Open the pool. Returns once one connection has been established.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = PgConnectOptions::from_str(&config.database_url)?;
        let options = if config.log_statements {
            options.log_statements(log::LevelFilter::Debug)
        } else {
            options.disable_statement_logging()
        };

        debug!(
            max_connections = config.max_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            "Opening connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap a pool opened elsewhere, e.g. with custom session settings
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceBackend for PgBackend {
    async fn fetch_tables(&self, schema: &str) -> Result<Vec<Option<String>>> {
        let names = sqlx::query_scalar::<_, Option<String>>(LIST_TABLES_SQL)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn fetch_sequences(&self, schema: &str) -> Result<Vec<Option<String>>> {
        let names = sqlx::query_scalar::<_, Option<String>>(LIST_SEQUENCES_SQL)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let result = sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn server_version(&self) -> Result<String> {
        let version = sqlx::query_scalar::<_, String>(SERVER_VERSION_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
