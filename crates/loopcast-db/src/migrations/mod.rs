//! Database migrations module.
//!
//! Migrations are embedded in the binary and executed in order; applied
//! versions are tracked in `schema_migrations`.

use rusqlite::{Connection, Result};
use thiserror::Error;

/// Migration error types
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {0} failed: {1}")]
    Failed(usize, String),
}

/// A single migration with its SQL content
struct Migration {
    version: usize,
    name: &'static str,
    sql: &'static str,
}

/// All available migrations
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    sql: include_str!("001_initial.sql"),
}];

fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;
    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<usize> {
    match conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<usize>>(0)
    }) {
        Ok(Some(version)) => Ok(version),
        Ok(None) => Ok(0),
        Err(e) => Err(e),
    }
}

fn apply_migration(conn: &Connection, migration: &Migration) -> Result<(), MigrationError> {
    conn.execute_batch(migration.sql)
        .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
        rusqlite::params![migration.version, migration.name],
    )
    .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    Ok(())
}

/// Run all pending migrations, returning how many were applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(MigrationError::Database)?;

    init_migrations_table(conn).map_err(MigrationError::Database)?;

    let current_version = get_current_version(conn).map_err(MigrationError::Database)?;

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();

    if pending.is_empty() {
        return Ok(0);
    }

    let applied = pending.len();
    for migration in pending {
        tracing::debug!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        apply_migration(conn, migration)?;
    }

    Ok(applied)
}
