//! List tool - shows the tables and sequences the other tools would touch

use crate::client::MaintenanceDbClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    /// Reserved tables are never truncated
    pub reserved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListOutput {
    pub schema: String,
    pub tables: Vec<TableEntry>,
    pub sequences: Vec<String>,
}

pub async fn list_objects(client: &MaintenanceDbClient) -> Result<ListOutput> {
    let tables = client
        .list_tables()
        .await?
        .into_iter()
        .map(|name| TableEntry {
            reserved: client.is_reserved_table(&name),
            name,
        })
        .collect();
    let sequences = client.list_sequences().await?;

    Ok(ListOutput {
        schema: client.settings().schema.clone(),
        tables,
        sequences,
    })
}
