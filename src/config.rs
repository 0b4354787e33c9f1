//! Configuration management for dbsweep
//!
//! Values are resolved from environment variables, then overridden by
//! command-line flags where one exists.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection URL (required)
//! - `DBSWEEP_SCHEMA`: Target schema (default: `public`)
//! - `DBSWEEP_MIGRATIONS_TABLE`: Table never truncated (default: `_prisma_migrations`)
//! - `DBSWEEP_MAX_CONNECTIONS`: Pool size (default: `5`)
//! - `DBSWEEP_TRUNCATE_CONCURRENCY`: Concurrent truncates (default: pool size)
//! - `DBSWEEP_CONNECT_TIMEOUT`: Seconds to wait for a connection (default: `30`)
//! - `DBSWEEP_LOG_STATEMENTS`: Log every SQL statement at debug level (default: `false`)

use crate::error::{Error, Result};

pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_MIGRATIONS_TABLE: &str = "_prisma_migrations";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub schema: String,
    pub migrations_table: String,
    pub max_connections: u32,
    pub truncate_concurrency: usize,
    pub connect_timeout_secs: u64,
    pub log_statements: bool,
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub schema: Option<String>,
    pub migrations_table: Option<String>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env(overrides: Overrides) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F, overrides: Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = overrides
            .database_url
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_string()))?;

        let schema = non_empty(overrides.schema.or_else(|| lookup("DBSWEEP_SCHEMA")))
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        let migrations_table = non_empty(
            overrides
                .migrations_table
                .or_else(|| lookup("DBSWEEP_MIGRATIONS_TABLE")),
        )
        .unwrap_or_else(|| DEFAULT_MIGRATIONS_TABLE.to_string());

        let max_connections: u32 = parse_var(&lookup, "DBSWEEP_MAX_CONNECTIONS")?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(Error::Config(
                "DBSWEEP_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        let truncate_concurrency: usize = parse_var(&lookup, "DBSWEEP_TRUNCATE_CONCURRENCY")?
            .unwrap_or(max_connections as usize);
        if truncate_concurrency == 0 {
            return Err(Error::Config(
                "DBSWEEP_TRUNCATE_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let connect_timeout_secs = parse_var(&lookup, "DBSWEEP_CONNECT_TIMEOUT")?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let log_statements = match lookup("DBSWEEP_LOG_STATEMENTS") {
            None => false,
            Some(value) => parse_bool(&value).ok_or_else(|| {
                Error::Config(format!("DBSWEEP_LOG_STATEMENTS: not a boolean: {}", value))
            })?,
        };

        Ok(Config {
            database_url,
            schema,
            migrations_table,
            max_connections,
            truncate_concurrency,
            connect_timeout_secs,
            log_statements,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{}: not a valid number: {}", key, raw))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(
            lookup_from(&[("DATABASE_URL", "postgres://localhost/app")]),
            Overrides::default(),
        )
        .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/app");
        assert_eq!(config.schema, "public");
        assert_eq!(config.migrations_table, "_prisma_migrations");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.truncate_concurrency, 5);
        assert_eq!(config.connect_timeout_secs, 30);
        assert!(!config.log_statements);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup_from(&[]), Overrides::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides_win_over_env() {
        let config = Config::from_lookup(
            lookup_from(&[
                ("DATABASE_URL", "postgres://env/app"),
                ("DBSWEEP_SCHEMA", "env_schema"),
            ]),
            Overrides {
                database_url: Some("postgres://flag/app".to_string()),
                schema: Some("flag_schema".to_string()),
                migrations_table: Some("schema_migrations".to_string()),
            },
        )
        .unwrap();

        assert_eq!(config.database_url, "postgres://flag/app");
        assert_eq!(config.schema, "flag_schema");
        assert_eq!(config.migrations_table, "schema_migrations");
    }

    #[test]
    fn test_concurrency_follows_pool_size() {
        let config = Config::from_lookup(
            lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("DBSWEEP_MAX_CONNECTIONS", "12"),
            ]),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.truncate_concurrency, 12);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = Config::from_lookup(
            lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("DBSWEEP_MAX_CONNECTIONS", "lots"),
            ]),
            Overrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("DBSWEEP_MAX_CONNECTIONS"));

        let err = Config::from_lookup(
            lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("DBSWEEP_TRUNCATE_CONCURRENCY", "0"),
            ]),
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_log_statements_flag() {
        let config = Config::from_lookup(
            lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/app"),
                ("DBSWEEP_LOG_STATEMENTS", "yes"),
            ]),
            Overrides::default(),
        )
        .unwrap();
        assert!(config.log_statements);
    }
}
