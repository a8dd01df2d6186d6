//! Schedule resolution.
//!
//! Given the raw catalog and a reference time (session start for child
//! manifests, "now" for master manifests), keep the entries that are still
//! relevant, order them chronologically, and tag the one playing right now.

use loopcast_core::{Error, Result, ScheduleEntry};

/// The relevant slice of the schedule, ascending by end time with the
/// open-ended sentinel last.
#[derive(Debug, Clone)]
pub struct ResolvedSchedule {
    pub entries: Vec<ScheduleEntry>,
    /// Index into `entries` of the now-playing entry.
    now_playing: usize,
}

impl ResolvedSchedule {
    pub fn now_playing(&self) -> &ScheduleEntry {
        &self.entries[self.now_playing]
    }
}

/// Resolve the schedule against `reference_ms`.
///
/// Keeps every entry with `end_ms > reference_ms` (the open-ended entry is
/// always kept); the entry with the smallest `end_ms > now_ms` is tagged
/// now-playing, falling back to the open-ended entry. Fails with
/// [`Error::ScheduleInvalid`] on an empty catalog, an empty result, more
/// than one open-ended entry, or an exhausted schedule with no open-ended
/// entry.
pub fn resolve(
    entries: Vec<ScheduleEntry>,
    reference_ms: i64,
    now_ms: i64,
) -> Result<ResolvedSchedule> {
    if entries.is_empty() {
        return Err(Error::schedule_invalid("catalog is empty"));
    }

    let open_count = entries.iter().filter(|e| e.is_open_ended()).count();
    if open_count > 1 {
        return Err(Error::schedule_invalid(format!(
            "{open_count} open-ended entries in catalog"
        )));
    }

    let mut relevant: Vec<ScheduleEntry> = entries
        .into_iter()
        .filter(|e| match e.end_ms {
            Some(end) => end > reference_ms,
            None => true,
        })
        .collect();
    if relevant.is_empty() {
        return Err(Error::schedule_invalid(format!(
            "no entries relevant after reference time {reference_ms}"
        )));
    }

    // Ascending by end time, open-ended sentinel greatest.
    relevant.sort_by_key(|e| e.end_ms.unwrap_or(i64::MAX));

    let now_playing = relevant
        .iter()
        .position(|e| match e.end_ms {
            Some(end) => end > now_ms,
            None => true,
        })
        .ok_or_else(|| Error::schedule_invalid("schedule exhausted and nothing is playing"))?;

    Ok(ResolvedSchedule {
        entries: relevant,
        now_playing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use loopcast_core::{Asset, AssetId};

    fn asset(name: &str) -> Asset {
        Asset {
            id: AssetId::new(),
            name: name.into(),
            master_url: format!("https://origin.example/{name}/index.m3u8"),
            duration_ms: 60_000,
            segment_count: 6,
        }
    }

    fn entry(name: &str, end_ms: Option<i64>) -> ScheduleEntry {
        ScheduleEntry {
            asset: asset(name),
            end_ms,
        }
    }

    #[test]
    fn filters_and_sorts_by_end_time() {
        let entries = vec![
            entry("current", None),
            entry("old", Some(10_000)),
            entry("recent", Some(50_000)),
        ];
        let resolved = resolve(entries, 20_000, 60_000).unwrap();
        assert_eq!(resolved.entries.len(), 2);
        assert_eq!(resolved.entries[0].asset.name, "recent");
        assert_eq!(resolved.entries[1].asset.name, "current");
        assert_eq!(resolved.now_playing().asset.name, "current");
    }

    #[test]
    fn now_playing_is_smallest_end_after_now() {
        let entries = vec![
            entry("a", Some(50_000)),
            entry("b", Some(90_000)),
            entry("current", None),
        ];
        let resolved = resolve(entries, 0, 60_000).unwrap();
        assert_eq!(resolved.now_playing().asset.name, "b");
    }

    #[test]
    fn empty_catalog_is_invalid() {
        assert_matches!(resolve(vec![], 0, 0), Err(Error::ScheduleInvalid(_)));
    }

    #[test]
    fn everything_expired_is_invalid() {
        let entries = vec![entry("old", Some(10_000))];
        assert_matches!(
            resolve(entries, 20_000, 30_000),
            Err(Error::ScheduleInvalid(_))
        );
    }

    #[test]
    fn two_open_ended_entries_are_invalid() {
        let entries = vec![entry("a", None), entry("b", None)];
        assert_matches!(resolve(entries, 0, 0), Err(Error::ScheduleInvalid(_)));
    }

    #[test]
    fn exhausted_schedule_without_sentinel_is_invalid() {
        let entries = vec![entry("a", Some(50_000))];
        // Relevant for the session, but nothing is playing at `now`.
        assert_matches!(
            resolve(entries, 0, 60_000),
            Err(Error::ScheduleInvalid(_))
        );
    }
}
