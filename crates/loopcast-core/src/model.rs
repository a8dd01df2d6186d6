//! Catalog and session domain model.
//!
//! All timeline arithmetic in loopcast runs on integer epoch milliseconds,
//! so cumulative durations never drift across large segment counts.

use serde::{Deserialize, Serialize};

use crate::ids::{AssetId, ClientId};

/// An ingested VOD asset. Immutable once written to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Location of the asset's master manifest at the origin.
    pub master_url: String,
    /// Total duration of one playthrough, in milliseconds.
    pub duration_ms: i64,
    /// Number of segments in one playthrough.
    pub segment_count: u32,
}

/// One slot in the channel schedule.
///
/// Entries are totally ordered by `end_ms` with the open-ended sentinel
/// (`None`) greatest; intervals are contiguous, so an entry starts where
/// the previous one ends. At most one open-ended entry may exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub asset: Asset,
    /// Exclusive upper bound of relevance in epoch milliseconds.
    /// `None` marks the currently playing entry.
    pub end_ms: Option<i64>,
}

impl ScheduleEntry {
    /// Whether this is the open-ended now-playing sentinel.
    pub fn is_open_ended(&self) -> bool {
        self.end_ms.is_none()
    }
}

/// A viewer's anchored virtual-channel timeline.
///
/// `session_start_ms` is fixed at the first master-manifest request and
/// never mutated; it is the only per-client state the service keeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    pub client_id: ClientId,
    pub session_start_ms: i64,
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
