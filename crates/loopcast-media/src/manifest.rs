//! Structured parsing of origin HLS playlists.
//!
//! A segment boundary is introduced by an `#EXTINF` directive; the next
//! non-directive line is its playback URI. Durations are converted to
//! integer milliseconds at the parse boundary so every later accumulation
//! is exact. Header tags are preserved verbatim for pass-through, except
//! the tags the service owns (media sequence, discontinuity sequence,
//! endlist), which are always recomputed or dropped.

use loopcast_core::{Error, Result};

/// One media segment as parsed from a child playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub duration_ms: i64,
    pub uri: String,
}

/// A parsed child (rendition) playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct RenditionManifest {
    /// Leading tag lines, verbatim, minus the tags loopcast owns.
    pub header_lines: Vec<String>,
    pub segments: Vec<Segment>,
}

impl RenditionManifest {
    /// Sum of all segment durations.
    pub fn total_duration_ms(&self) -> i64 {
        self.segments.iter().map(|s| s.duration_ms).sum()
    }

    /// Count of segments whose cumulative start time lies before
    /// `boundary_ms`. Used to preserve ordinals for segments that began in
    /// a partial loop the window has already passed.
    pub fn segments_started_before(&self, boundary_ms: i64) -> u64 {
        let mut count = 0u64;
        let mut position = 0i64;
        for segment in &self.segments {
            if position < boundary_ms {
                count += 1;
            }
            position += segment.duration_ms;
        }
        count
    }
}

/// A parsed master playlist: all lines verbatim plus the indices of the
/// lines that reference rendition playlists.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterManifest {
    pub lines: Vec<String>,
    /// Indices into `lines` for each rendition URI, in order of appearance.
    pub rendition_lines: Vec<usize>,
}

impl MasterManifest {
    /// Rendition URIs exactly as they appear in the playlist.
    pub fn rendition_uris(&self) -> Vec<&str> {
        self.rendition_lines
            .iter()
            .map(|&i| self.lines[i].as_str())
            .collect()
    }

    /// Look up one rendition URI by index.
    pub fn rendition_uri(&self, index: u32) -> Result<&str> {
        self.rendition_lines
            .get(index as usize)
            .map(|&i| self.lines[i].as_str())
            .ok_or(Error::RenditionNotFound(index))
    }
}

/// Header tags the service computes itself; origin copies are dropped.
const OWNED_TAGS: &[&str] = &[
    "#EXT-X-MEDIA-SEQUENCE",
    "#EXT-X-DISCONTINUITY-SEQUENCE",
    "#EXT-X-ENDLIST",
];

fn is_owned_tag(line: &str) -> bool {
    OWNED_TAGS
        .iter()
        .any(|tag| line == *tag || line.starts_with(&format!("{tag}:")))
}

/// Parse a master playlist into structured form.
///
/// Any non-empty, non-tag line is treated as a rendition URI. Fails with
/// [`Error::Retrieval`] if no rendition lines are present.
pub fn parse_master(text: &str) -> Result<MasterManifest> {
    let mut lines = Vec::new();
    let mut rendition_lines = Vec::new();

    for raw in text.lines() {
        let line = raw.trim_end_matches('\r');
        if !line.starts_with('#') && !line.trim().is_empty() {
            rendition_lines.push(lines.len());
        }
        lines.push(line.to_string());
    }

    if rendition_lines.is_empty() {
        return Err(Error::retrieval(
            "renditions: master manifest has no rendition entries",
        ));
    }

    Ok(MasterManifest {
        lines,
        rendition_lines,
    })
}

/// Parse a child playlist into header lines and an ordered segment list.
///
/// Fails with [`Error::EmptyManifest`] if zero segments parse, and with
/// [`Error::Retrieval`] on a malformed `#EXTINF` duration.
pub fn parse_child(text: &str) -> Result<RenditionManifest> {
    let mut header_lines = Vec::new();
    let mut segments = Vec::new();
    let mut pending_duration: Option<i64> = None;
    let mut in_header = true;

    for raw in text.lines() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("#EXTINF:") {
            in_header = false;
            pending_duration = Some(parse_extinf_ms(rest)?);
            continue;
        }

        if line.starts_with('#') {
            if in_header && !is_owned_tag(line) {
                header_lines.push(line.to_string());
            }
            // Directives between segments (byte ranges, program date time,
            // source discontinuities) are not carried into the virtual
            // channel; the engine owns all discontinuity placement.
            continue;
        }

        if let Some(duration_ms) = pending_duration.take() {
            segments.push(Segment {
                duration_ms,
                uri: line.trim().to_string(),
            });
        }
    }

    if segments.is_empty() {
        return Err(Error::EmptyManifest);
    }

    Ok(RenditionManifest {
        header_lines,
        segments,
    })
}

/// Parse the value part of an `#EXTINF` directive into milliseconds.
fn parse_extinf_ms(rest: &str) -> Result<i64> {
    let value = rest.split(',').next().unwrap_or("").trim();
    let secs: f64 = value
        .parse()
        .map_err(|_| Error::retrieval(format!("segment duration: bad EXTINF value {value:?}")))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(Error::retrieval(format!(
            "segment duration: bad EXTINF value {value:?}"
        )));
    }
    Ok((secs * 1000.0).round() as i64)
}
