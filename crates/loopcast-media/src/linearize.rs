//! The linearization engine.
//!
//! A pure function of the client's session anchor, the current time, the
//! sliding window, and the schedule active since session start. It walks
//! the schedule strictly in chronological order, threading an explicit
//! accumulator (media sequence, discontinuity sequence, current asset
//! start) through every entry, and produces the ordered, sequenced,
//! discontinuity-annotated segment list that is currently "on screen" for
//! that client.
//!
//! All arithmetic is integer milliseconds; loop counts use euclidean
//! division so the math stays exact across arbitrarily long sessions.

use loopcast_core::{Error, Result};

use crate::manifest::RenditionManifest;

/// Per-request engine parameters.
#[derive(Debug, Clone, Copy)]
pub struct LinearizeParams {
    /// The client's personal timeline anchor.
    pub session_start_ms: i64,
    /// Wall-clock request time.
    pub now_ms: i64,
    /// Trailing visible duration.
    pub sliding_window_ms: i64,
}

/// One schedule entry together with its fetched rendition manifest.
///
/// Segment URIs must already be resolved to their final playback form;
/// the engine never touches URLs.
#[derive(Debug, Clone)]
pub struct SourcedEntry {
    /// Exclusive end of relevance; `None` marks the open-ended entry.
    pub end_ms: Option<i64>,
    /// Duration of one loop of the asset.
    pub duration_ms: i64,
    /// Segments per loop, from the catalog.
    pub segment_count: u32,
    pub manifest: RenditionManifest,
}

/// A segment with its assigned global ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSegment {
    pub sequence: u64,
    pub duration_ms: i64,
    pub uri: String,
}

/// One element of the emitted playlist body.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearItem {
    Segment(LinearSegment),
    Discontinuity,
}

/// Engine output: everything the assembler needs to render a playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearizedManifest {
    /// Global ordinal of the first emitted segment.
    pub media_sequence: u64,
    /// Discontinuity boundaries crossed since session start.
    pub discontinuity_sequence: u64,
    /// Header lines of the most recently fetched child manifest.
    pub header_lines: Vec<String>,
    pub items: Vec<LinearItem>,
}

impl LinearizedManifest {
    /// Emitted segments, skipping markers.
    pub fn segments(&self) -> impl Iterator<Item = &LinearSegment> {
        self.items.iter().filter_map(|item| match item {
            LinearItem::Segment(s) => Some(s),
            LinearItem::Discontinuity => None,
        })
    }
}

/// Accumulator threaded through the chronological schedule walk.
struct WalkState {
    media_seq: u64,
    disc_seq: u64,
    asset_start_ms: i64,
    items: Vec<LinearItem>,
    /// Sequence number of the first emitted segment, once one exists.
    first_sequence: Option<u64>,
}

impl WalkState {
    fn new(session_start_ms: i64) -> Self {
        Self {
            media_seq: 1,
            disc_seq: 0,
            asset_start_ms: session_start_ms,
            items: Vec::new(),
            first_sequence: None,
        }
    }

    /// Append a discontinuity marker; never leading, never doubled.
    fn push_discontinuity(&mut self) {
        match self.items.last() {
            None | Some(LinearItem::Discontinuity) => {}
            Some(LinearItem::Segment(_)) => self.items.push(LinearItem::Discontinuity),
        }
    }
}

/// Compute the client's current window over the schedule.
///
/// `entries` must ascend by `end_ms` with the open-ended entry (if any)
/// last, and contain only entries ending after `session_start_ms` — the
/// resolver guarantees both. Fails rather than returning a partial result.
pub fn linearize(params: &LinearizeParams, entries: &[SourcedEntry]) -> Result<LinearizedManifest> {
    validate(params, entries)?;

    let window_start = params.now_ms - params.sliding_window_ms;
    let window_end = params.now_ms;
    let mut state = WalkState::new(params.session_start_ms);

    // Strictly chronological: each entry's starting accumulator values
    // depend on the previous entry's final values.
    for entry in entries {
        match entry.end_ms {
            Some(end) if end <= window_start => elapsed_entry(&mut state, entry, end),
            _ => overlapping_entry(&mut state, entry, window_start, window_end),
        }
        if let Some(end) = entry.end_ms {
            state.asset_start_ms = end;
        }
    }

    // A marker with no following segment carries no information.
    while matches!(state.items.last(), Some(LinearItem::Discontinuity)) {
        state.items.pop();
    }

    // Boundaries still visible in the window count toward the sequence,
    // on top of the loops that have already rolled out of it.
    let visible_markers = state
        .items
        .iter()
        .filter(|i| matches!(i, LinearItem::Discontinuity))
        .count() as u64;

    Ok(LinearizedManifest {
        media_sequence: state.first_sequence.unwrap_or(state.media_seq),
        discontinuity_sequence: state.disc_seq + visible_markers,
        header_lines: entries
            .last()
            .map(|e| e.manifest.header_lines.clone())
            .unwrap_or_default(),
        items: state.items,
    })
}

fn validate(params: &LinearizeParams, entries: &[SourcedEntry]) -> Result<()> {
    if params.sliding_window_ms <= 0 {
        return Err(Error::malformed("sliding window must be positive"));
    }
    if entries.is_empty() {
        return Err(Error::schedule_invalid("no schedule entries to linearize"));
    }

    let mut prev_end = params.session_start_ms;
    for (i, entry) in entries.iter().enumerate() {
        if entry.duration_ms <= 0 || entry.segment_count == 0 {
            return Err(Error::schedule_invalid(format!(
                "entry {i} has nonpositive duration or zero segments"
            )));
        }
        if entry.manifest.segments.is_empty() {
            return Err(Error::EmptyManifest);
        }
        match entry.end_ms {
            Some(end) => {
                if end <= prev_end {
                    return Err(Error::schedule_invalid(format!(
                        "entry {i} ends at {end}, not after {prev_end}"
                    )));
                }
                prev_end = end;
            }
            None => {
                if i != entries.len() - 1 {
                    return Err(Error::schedule_invalid(
                        "open-ended entry is not the last scheduled entry",
                    ));
                }
            }
        }
    }
    Ok(())
}

/// An entry the window has fully passed: nothing is emitted, but every
/// boundary it produced charges the discontinuity sequence and every
/// segment that started, including those in the final partial loop, keeps
/// its ordinal.
fn elapsed_entry(state: &mut WalkState, entry: &SourcedEntry, end_ms: i64) {
    let elapsed = end_ms - state.asset_start_ms;
    let loops = elapsed.div_euclid(entry.duration_ms);
    state.disc_seq += loops as u64;
    state.media_seq += loops as u64 * u64::from(entry.segment_count);

    let partial = elapsed - loops * entry.duration_ms;
    state.media_seq += entry.manifest.segments_started_before(partial);

    // A mid-loop cutover into the next entry is a boundary of its own; the
    // loop count covers it only when the entry ended on a loop edge. The
    // marker stops being visible the moment the entry becomes elapsed, so
    // it must be charged here or the sequence would regress.
    if partial > 0 {
        state.disc_seq += 1;
    }
}

/// An entry that overlaps the window (or the open-ended entry): walk its
/// loops, emitting every segment that overlaps the visible slice.
fn overlapping_entry(
    state: &mut WalkState,
    entry: &SourcedEntry,
    window_start: i64,
    window_end: i64,
) {
    let eff_start = window_start.max(state.asset_start_ms);
    let eff_end = match entry.end_ms {
        Some(end) => window_end.min(end),
        None => window_end,
    };
    if eff_end <= eff_start {
        // Entirely in the future relative to the window.
        return;
    }

    let duration = entry.duration_ms;
    let first_loop = (eff_start - state.asset_start_ms).div_euclid(duration).max(0);
    state.disc_seq += first_loop as u64;
    state.media_seq += first_loop as u64 * u64::from(entry.segment_count);

    // Loop containing the last covered instant; an eff_end landing exactly
    // on a loop boundary must not walk an empty extra loop.
    let last_loop = (eff_end - state.asset_start_ms - 1)
        .div_euclid(duration)
        .max(first_loop);

    // Joining the previous entry's segments is a timeline break.
    state.push_discontinuity();

    for loop_idx in first_loop..=last_loop {
        let loop_start = state.asset_start_ms + loop_idx * duration;
        let lo = if loop_idx == first_loop {
            eff_start - loop_start
        } else {
            0
        };
        let hi = if loop_idx == last_loop {
            eff_end - loop_start
        } else {
            duration
        };

        emit_slice(state, entry, lo, hi);

        if loop_idx < last_loop {
            state.push_discontinuity();
        }
    }
}

/// Emit every segment overlapping the intra-loop slice `[lo, hi)`.
///
/// Inclusion is by overlap on cumulative positions: `start < hi` and
/// `end > lo`. A segment ending exactly at `lo` is excluded and one
/// starting exactly at `hi` is excluded, so no boundary is ever counted
/// twice; a segment straddling either edge is included, so the visible
/// window is never shorter than requested near a loop boundary.
fn emit_slice(state: &mut WalkState, entry: &SourcedEntry, lo: i64, hi: i64) {
    let mut position = 0i64;
    for (idx, segment) in entry.manifest.segments.iter().enumerate() {
        let start = position;
        let end = position + segment.duration_ms;
        position = end;

        if start < hi && end > lo {
            if state.first_sequence.is_none() {
                // Leading segments of the oldest visible loop keep their
                // ordinals even though they are not emitted.
                state.media_seq += idx as u64;
            }
            let sequence = state.media_seq;
            state.media_seq += 1;
            state.first_sequence.get_or_insert(sequence);
            state.items.push(LinearItem::Segment(LinearSegment {
                sequence,
                duration_ms: segment.duration_ms,
                uri: segment.uri.clone(),
            }));
        }
    }
}
