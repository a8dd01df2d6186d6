//! Database connection pool management.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use loopcast_core::{Error, Result};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Initialize a new database pool backed by the given file path.
///
/// Creates the SQLite file if needed, enables foreign keys on every
/// connection, and runs pending migrations.
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    build_pool(manager)
}

/// Initialize an in-memory pool for testing. The database is lost when the
/// pool is dropped.
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    build_pool(manager)
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {e}")))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {e}")))?;

    Ok(pool)
}

/// Get a connection from the pool, converting the r2d2 error into our
/// common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), 4);
    }

    #[test]
    fn test_migrations_run_on_init() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        for table in ["assets", "schedule", "sessions"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
