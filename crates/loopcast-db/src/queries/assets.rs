//! Asset catalog queries.

use rusqlite::{params, Connection};
use uuid::Uuid;

use loopcast_core::{Asset, AssetId, Error, Result};

/// Insert a new asset into the catalog.
pub fn create(conn: &Connection, asset: &Asset) -> Result<()> {
    validate(asset)?;
    conn.execute(
        "INSERT INTO assets (id, name, master_url, duration_ms, segment_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            asset.id.to_string(),
            asset.name,
            asset.master_url,
            asset.duration_ms,
            asset.segment_count,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// Look up one asset by id.
pub fn get(conn: &Connection, id: AssetId) -> Result<Asset> {
    match conn.query_row(
        "SELECT id, name, master_url, duration_ms, segment_count
         FROM assets WHERE id = ?1",
        params![id.to_string()],
        row_to_asset,
    ) {
        Ok(asset) => {
            validate(&asset)?;
            Ok(asset)
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(Error::not_found(format!("asset {id}")))
        }
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// All catalog assets, oldest first.
pub fn list(conn: &Connection) -> Result<Vec<Asset>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, master_url, duration_ms, segment_count
             FROM assets ORDER BY created_at",
        )
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_asset)
        .map_err(|e| Error::database(e.to_string()))?;

    let mut assets = Vec::new();
    for row in rows {
        let asset = row.map_err(|e| Error::database(e.to_string()))?;
        validate(&asset)?;
        assets.push(asset);
    }
    Ok(assets)
}

pub(crate) fn row_to_asset(row: &rusqlite::Row<'_>) -> rusqlite::Result<Asset> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Asset {
        id: AssetId::from(id),
        name: row.get(1)?,
        master_url: row.get(2)?,
        duration_ms: row.get(3)?,
        segment_count: row.get(4)?,
    })
}

/// Store-boundary validation: bad catalog rows fail fast here instead of
/// deep inside the schedule walk.
pub(crate) fn validate(asset: &Asset) -> Result<()> {
    if asset.duration_ms <= 0 || asset.segment_count == 0 {
        return Err(Error::retrieval(format!(
            "asset {}: invalid duration or segment count",
            asset.id
        )));
    }
    if asset.master_url.is_empty() {
        return Err(Error::retrieval(format!("asset {}: empty master URL", asset.id)));
    }
    Ok(())
}
