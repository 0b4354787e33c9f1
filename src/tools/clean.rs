//! Clean tool - truncate tables, then reset sequences
//!
//! The usual fixture cleanup between test runs.

use crate::client::{MaintenanceDbClient, ResetReport, TruncateReport};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanOutput {
    pub success: bool,
    pub schema: String,
    pub truncate: TruncateReport,
    pub reset: ResetReport,
    pub message: String,
}

pub async fn clean_schema(client: &MaintenanceDbClient) -> Result<CleanOutput> {
    let truncate = client.truncate_all().await?;
    // Sequences are reset even when some tables failed to truncate.
    let reset = client.reset_sequences().await?;

    let message = format!(
        "Truncated {} table(s) ({} failed), reset {} sequence(s)",
        truncate.truncated.len(),
        truncate.failures.len(),
        reset.reset.len()
    );

    Ok(CleanOutput {
        success: truncate.is_complete(),
        schema: client.settings().schema.clone(),
        truncate,
        reset,
        message,
    })
}
