//! Truncate tool - empties every table in the schema except the migrations table

use crate::client::{MaintenanceDbClient, TruncateReport};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TruncateOutput {
    pub success: bool,
    pub dry_run: bool,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<TruncateReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planned: Vec<String>,
    pub message: String,
}

pub async fn truncate_tables(client: &MaintenanceDbClient, dry_run: bool) -> Result<TruncateOutput> {
    let schema = client.settings().schema.clone();

    if dry_run {
        let planned = client.plan_truncate().await?;
        return Ok(TruncateOutput {
            success: true,
            dry_run,
            schema,
            report: None,
            message: format!("Would truncate {} table(s)", planned.len()),
            planned,
        });
    }

    let report = client.truncate_all().await?;
    let message = if report.is_complete() {
        format!("Truncated {} table(s)", report.truncated.len())
    } else {
        format!(
            "Truncated {} table(s), {} failed",
            report.truncated.len(),
            report.failures.len()
        )
    };

    Ok(TruncateOutput {
        success: report.is_complete(),
        dry_run,
        schema,
        report: Some(report),
        planned: Vec::new(),
        message,
    })
}
