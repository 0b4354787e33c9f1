//! Reset tool - restarts every sequence in the schema at 1

use crate::client::{MaintenanceDbClient, ResetReport};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetOutput {
    pub success: bool,
    pub dry_run: bool,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ResetReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planned: Vec<String>,
    pub message: String,
}

pub async fn reset_sequences(client: &MaintenanceDbClient, dry_run: bool) -> Result<ResetOutput> {
    let schema = client.settings().schema.clone();

    if dry_run {
        let planned = client.plan_reset().await?;
        return Ok(ResetOutput {
            success: true,
            dry_run,
            schema,
            report: None,
            message: format!("Would reset {} sequence(s)", planned.len()),
            planned,
        });
    }

    let report = client.reset_sequences().await?;
    Ok(ResetOutput {
        success: true,
        dry_run,
        schema,
        message: format!("Reset {} sequence(s)", report.reset.len()),
        report: Some(report),
        planned: Vec::new(),
    })
}
