//! Channel schedule queries.

use rusqlite::{params, Connection};

use loopcast_core::{AssetId, Error, Result, ScheduleEntry};

use crate::queries::assets;

/// Full schedule joined with its assets, bounded entries first in end order,
/// the open-ended entry last.
pub fn scan(conn: &Connection) -> Result<Vec<ScheduleEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT a.id, a.name, a.master_url, a.duration_ms, a.segment_count, s.end_ms
             FROM schedule s JOIN assets a ON a.id = s.asset_id
             ORDER BY s.end_ms IS NULL, s.end_ms",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_entry)
        .map_err(|e| Error::database(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        let entry: ScheduleEntry = row.map_err(|e| Error::database(e.to_string()))?;
        assets::validate(&entry.asset)?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Append an entry to the schedule. `end_ms` of `None` marks the open-ended
/// now-playing entry; the schema rejects a second one.
pub fn insert(conn: &Connection, asset_id: AssetId, end_ms: Option<i64>) -> Result<()> {
    conn.execute(
        "INSERT INTO schedule (asset_id, end_ms) VALUES (?1, ?2)",
        params![asset_id.to_string(), end_ms],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::schedule_invalid("an open-ended schedule entry already exists")
        }
        other => Error::database(other.to_string()),
    })?;
    Ok(())
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleEntry> {
    Ok(ScheduleEntry {
        asset: assets::row_to_asset(row)?,
        end_ms: row.get(5)?,
    })
}
