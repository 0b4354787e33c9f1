//! Backend seam between the maintenance client and the database driver

use async_trait::async_trait;

use crate::error::Result;

/// Operations the maintenance client needs from a database connection.
///
/// Catalog methods return `Option<String>` per row: a name the catalog
/// could not produce is `None`, and the caller decides what that means.
#[async_trait]
pub trait MaintenanceBackend: Send + Sync {
    async fn fetch_tables(&self, schema: &str) -> Result<Vec<Option<String>>>;

    async fn fetch_sequences(&self, schema: &str) -> Result<Vec<Option<String>>>;

    /// Run a statement, returning the affected row count
    async fn execute(&self, sql: &str) -> Result<u64>;

    async fn server_version(&self) -> Result<String>;

    async fn close(&self);

    fn is_closed(&self) -> bool;
}
