//! dbsweep - lifecycle-managed PostgreSQL client for fixture cleanup
//!
//! Connects one shared pool, closes it on shutdown, and offers two
//! maintenance operations: truncate every table in a schema and restart
//! every sequence at 1.

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod tools;

#[cfg(test)]
mod testing;

pub use client::{
    with_client, MaintenanceDbClient, MaintenanceSettings, ResetReport, TableFailure,
    TruncateReport,
};
pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::HostApplication;
