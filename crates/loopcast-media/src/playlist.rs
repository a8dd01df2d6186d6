//! Rendering the engine's output back to playlist text.

use std::fmt::Write;

use crate::linearize::{LinearItem, LinearizedManifest};

/// Render a linearized manifest as a live media playlist.
///
/// Preserved origin headers come first, then the computed sequence
/// headers, then segments and markers in walk order. The playlist is
/// live, so no `EXT-X-ENDLIST` is ever written.
pub fn render(manifest: &LinearizedManifest) -> String {
    let mut out = String::new();

    for line in &manifest.header_lines {
        writeln!(out, "{line}").unwrap();
    }

    writeln!(out, "#EXT-X-MEDIA-SEQUENCE:{}", manifest.media_sequence).unwrap();
    if manifest.discontinuity_sequence > 0 {
        writeln!(
            out,
            "#EXT-X-DISCONTINUITY-SEQUENCE:{}",
            manifest.discontinuity_sequence
        )
        .unwrap();
    }

    for item in &manifest.items {
        match item {
            LinearItem::Discontinuity => writeln!(out, "#EXT-X-DISCONTINUITY").unwrap(),
            LinearItem::Segment(segment) => {
                writeln!(out, "#EXTINF:{},", format_secs(segment.duration_ms)).unwrap();
                writeln!(out, "{}", segment.uri).unwrap();
            }
        }
    }

    out
}

/// Milliseconds as decimal seconds with millisecond precision.
fn format_secs(ms: i64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}
