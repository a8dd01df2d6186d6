//! Master manifest rewriting.
//!
//! Replaces each rendition URI in an origin master playlist with the
//! service's own routing scheme, keyed by client id, while recording the
//! original lines so the caller can resolve them against the master's
//! directory.

use loopcast_core::{ClientId, Result};

use crate::manifest::MasterManifest;

/// Result of rewriting a master manifest for one client.
#[derive(Debug, Clone, PartialEq)]
pub struct RewrittenMaster {
    /// Playlist text with rendition lines pointing back at loopcast.
    pub text: String,
    /// The original rendition URI lines, in index order.
    pub rendition_uris: Vec<String>,
}

/// Rewrite rendition lines to `{channel}/{index}.m3u8?client_id={id}`.
///
/// The rewritten URIs are relative, so a player resolves them against the
/// master playlist's request path (`/{tenant}/{channel}.m3u8`) and lands on
/// the child-manifest route.
pub fn rewrite_master(
    master: &MasterManifest,
    channel: &str,
    client_id: &ClientId,
) -> Result<RewrittenMaster> {
    let mut lines = master.lines.clone();
    let mut rendition_uris = Vec::with_capacity(master.rendition_lines.len());

    for (index, &line_idx) in master.rendition_lines.iter().enumerate() {
        rendition_uris.push(lines[line_idx].clone());
        lines[line_idx] = format!("{channel}/{index}.m3u8?client_id={client_id}");
    }

    let mut text = lines.join("\n");
    text.push('\n');

    Ok(RewrittenMaster {
        text,
        rendition_uris,
    })
}
