//! Database module for dbsweep
//!
//! Provides the PostgreSQL connection pool, the backend trait the client
//! talks through, and the catalog SQL.

mod backend;
pub mod catalog;
mod connection;

pub use backend::MaintenanceBackend;
pub use connection::PgBackend;
