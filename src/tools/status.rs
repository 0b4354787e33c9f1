//! Status tool - server version and catalog counts

use crate::client::MaintenanceDbClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOutput {
    pub connected: bool,
    pub server_version: String,
    pub schema: String,
    pub migrations_table: String,
    pub tables: usize,
    pub sequences: usize,
}

pub async fn get_status(client: &MaintenanceDbClient) -> Result<StatusOutput> {
    let server_version = client.server_version().await?;
    let tables = client.list_tables().await?.len();
    let sequences = client.list_sequences().await?.len();
    let settings = client.settings();

    Ok(StatusOutput {
        connected: client.is_connected(),
        server_version,
        schema: settings.schema.clone(),
        migrations_table: settings.migrations_table.clone(),
        tables,
        sequences,
    })
}
