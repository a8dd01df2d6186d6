//! Catalog ingestion.
//!
//! Measures a VOD asset at its origin and produces the catalog row the
//! manifest service consumes. Duration and segment count come from
//! rendition 0's child playlist; renditions of one packaging job are
//! time-aligned, so one rendition is enough.

use loopcast_core::{Asset, AssetId, Error, Result};
use loopcast_media::url::{directory_of, join_url};
use loopcast_media::{parse_child, parse_master};

use crate::origin::OriginClient;

/// Fetch and measure an asset's master manifest, returning the catalog row
/// to insert. `name` defaults to the directory name of the master URL.
pub async fn measure_asset(
    origin: &dyn OriginClient,
    master_url: &str,
    name: Option<String>,
) -> Result<Asset> {
    let master = parse_master(&origin.fetch(master_url).await?)?;

    let child_url = join_url(directory_of(master_url), master.rendition_uri(0)?);
    let child = parse_child(&origin.fetch(&child_url).await?)?;

    let duration_ms = child.total_duration_ms();
    if duration_ms <= 0 {
        return Err(Error::retrieval(format!(
            "asset duration: {master_url} measures to {duration_ms}ms"
        )));
    }

    Ok(Asset {
        id: AssetId::new(),
        name: name.unwrap_or_else(|| default_name(master_url)),
        master_url: master_url.to_string(),
        duration_ms,
        segment_count: child.segments.len() as u32,
    })
}

/// The last directory component of the master URL.
fn default_name(master_url: &str) -> String {
    directory_of(master_url)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .unwrap_or("asset")
        .to_string()
}
