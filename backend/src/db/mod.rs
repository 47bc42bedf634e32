pub mod lexicon_schema;
pub mod lexicon_models;
pub mod loader;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::logger::info;

/// Tables of the lexicon schema, in load order.
pub static LEXICON_TABLES: [&str; 14] = [
    "lexical_reference_texts",
    "languages",
    "corpora",
    "taxonomies",
    "taxonomy_domains",
    "taxonomy_domain_labels",
    "entries",
    "strong_codes",
    "senses",
    "glosses",
    "entry_occurrences",
    "sense_occurrences",
    "entry_domains",
    "sense_domains",
];

pub fn database_url(db_path: &Path) -> String {
    let abs_path = fs::canonicalize(db_path).unwrap_or(db_path.to_path_buf());
    format!("sqlite://{}", abs_path.to_string_lossy())
}

pub fn establish_connection(db_path: &Path) -> Result<SqliteConnection> {
    let url = database_url(db_path);
    let mut conn = SqliteConnection::establish(&url)
        .with_context(|| format!("Failed to connect to database: {}", url))?;

    diesel::sql_query("PRAGMA foreign_keys = ON;").execute(&mut conn)?;

    Ok(conn)
}

/// Applies the schema file to the database. Statements use `IF NOT EXISTS`,
/// so this is safe on an already initialized database.
pub fn initialize_database(conn: &mut SqliteConnection, schema_path: &Path) -> Result<()> {
    let sql = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read schema file: {:?}", schema_path))?;

    info(&format!("Applying schema {:?}", schema_path));
    apply_schema_sql(conn, &sql)
}

pub fn apply_schema_sql(conn: &mut SqliteConnection, sql: &str) -> Result<()> {
    conn.batch_execute(sql).context("Failed to apply schema")?;
    Ok(())
}

#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

pub fn table_row_count(conn: &mut SqliteConnection, table: &str) -> Result<i64> {
    let result = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM `{}`;", table))
        .get_result::<CountResult>(conn)
        .with_context(|| format!("Failed to count rows of {}", table))?;
    Ok(result.count)
}

/// Row counts of every lexicon table.
pub fn table_row_counts(conn: &mut SqliteConnection) -> Result<Vec<(String, i64)>> {
    LEXICON_TABLES
        .iter()
        .map(|table| Ok((table.to_string(), table_row_count(conn, table)?)))
        .collect()
}
