//! Catalog queries and maintenance statements
//!
//! Catalog queries take the schema as bind parameter `$1`. Maintenance
//! statements cannot bind identifiers, so names are quoted here.

/// Lists every table in a schema
pub const LIST_TABLES_SQL: &str = r#"
SELECT tablename::text AS tablename
FROM pg_tables
WHERE schemaname = $1
ORDER BY tablename
"#;

/// Lists every sequence in a schema
pub const LIST_SEQUENCES_SQL: &str = r#"
SELECT c.relname::text AS relname
FROM pg_class AS c
         JOIN pg_namespace AS n ON c.relnamespace = n.oid
WHERE c.relkind = 'S'
  AND n.nspname = $1
ORDER BY c.relname
"#;

pub const SERVER_VERSION_SQL: &str = "SELECT current_setting('server_version')";

/// Quote an identifier for PostgreSQL, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn qualified_name(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

pub fn truncate_table_sql(schema: &str, table: &str) -> String {
    format!("TRUNCATE TABLE {} CASCADE;", qualified_name(schema, table))
}

pub fn restart_sequence_sql(schema: &str, sequence: &str) -> String {
    format!(
        "ALTER SEQUENCE {} RESTART WITH 1;",
        qualified_name(schema, sequence)
    )
}
