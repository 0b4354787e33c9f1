//! Error types for dbsweep

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A sequence row came back from the catalog without a usable name.
    #[error("Catalog returned a sequence without a name")]
    MissingSequenceName,

    #[error("Client is not connected")]
    NotConnected,

    #[error("Interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;
