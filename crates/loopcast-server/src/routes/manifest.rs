//! Manifest route handlers: per-client master playlists and linearized
//! child playlists.
//!
//! `GET /{tenant}/{channel}.m3u8` anchors a session on first contact and
//! serves the rewritten master afterwards. `GET
//! /{tenant}/{channel}/{rendition}.m3u8?client_id=...` runs the full
//! pipeline: session lookup, schedule resolution, concurrent origin
//! fetches, the linearization walk, and playlist rendering.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use loopcast_core::{now_epoch_ms, ClientId, Error, Result, ScheduleEntry};
use loopcast_db::pool::get_conn;
use loopcast_db::queries::{schedule, sessions};
use loopcast_media::url::{directory_of, join_url, segment_base};
use loopcast_media::{
    linearize, parse_child, parse_master, playlist, resolve, rewrite_master, LinearizeParams,
    SourcedEntry,
};

use crate::context::AppContext;
use crate::error::{AppError, PLAYLIST_CONTENT_TYPE};
use crate::origin::OriginClient;

#[derive(Debug, Deserialize)]
pub struct ManifestQuery {
    pub client_id: Option<String>,
}

/// GET /{tenant}/{channel}.m3u8
pub async fn master(
    State(ctx): State<AppContext>,
    Path((tenant, channel_file)): Path<(String, String)>,
    Query(query): Query<ManifestQuery>,
) -> std::result::Result<Response, AppError> {
    let channel = strip_playlist_suffix(&channel_file)?;
    let now = now_epoch_ms();

    let client_id = match query.client_id.as_deref() {
        // First contact: anchor a session and send the player back around
        // with its identity in the URL.
        None => {
            let client_id = ClientId::new();
            let conn = get_conn(&ctx.db)?;
            sessions::create_if_absent(&conn, &client_id, now)?;
            tracing::info!(%client_id, channel, "New client tuned in");

            let location = format!("/{tenant}/{channel}.m3u8?client_id={client_id}");
            return Ok(
                (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
            );
        }
        Some(raw) => parse_client_id(raw)?,
    };

    let entries = {
        let conn = get_conn(&ctx.db)?;
        // A bookmarked URL may outlive the session row; re-anchoring keeps
        // the identity instead of bouncing the player forever.
        sessions::create_if_absent(&conn, &client_id, now)?;
        schedule::scan(&conn)?
    };

    let resolved = resolve(entries, now, now)?;
    let asset = resolved.now_playing().asset.clone();

    let origin_master = parse_master(&ctx.origin.fetch(&asset.master_url).await?)?;
    let rewritten = rewrite_master(&origin_master, channel, &client_id)?;

    tracing::debug!(%client_id, channel, asset = %asset.name, "Serving master manifest");
    Ok(playlist_response(rewritten.text))
}

/// GET /{tenant}/{channel}/{rendition}.m3u8?client_id={id}
pub async fn child(
    State(ctx): State<AppContext>,
    Path((_tenant, channel, rendition_file)): Path<(String, String, String)>,
    Query(query): Query<ManifestQuery>,
) -> std::result::Result<Response, AppError> {
    let rendition = parse_rendition(&rendition_file)?;
    let raw_id = query
        .client_id
        .as_deref()
        .ok_or_else(|| Error::malformed("client_id query parameter is required"))?;
    let client_id = parse_client_id(raw_id)?;
    let now = now_epoch_ms();

    let (session, entries) = {
        let conn = get_conn(&ctx.db)?;
        let session = sessions::get(&conn, &client_id)?
            .ok_or_else(|| Error::not_found(format!("client {client_id}")))?;
        (session, schedule::scan(&conn)?)
    };

    let resolved = resolve(entries, session.session_start_ms, now)?;

    // Fetch every entry's manifests concurrently; the engine walk below is
    // strictly chronological.
    let cdn_base = ctx.cdn_base().map(str::to_string);
    let sourced = futures::future::try_join_all(
        resolved
            .entries
            .iter()
            .map(|entry| source_entry(ctx.origin.as_ref(), entry, rendition, cdn_base.as_deref())),
    )
    .await?;

    let params = LinearizeParams {
        session_start_ms: session.session_start_ms,
        now_ms: now,
        sliding_window_ms: ctx.config.stream.sliding_window_ms(),
    };
    let linearized = linearize(&params, &sourced)?;

    tracing::debug!(
        %client_id,
        channel,
        rendition,
        media_sequence = linearized.media_sequence,
        discontinuity_sequence = linearized.discontinuity_sequence,
        segments = linearized.segments().count(),
        "Serving child manifest"
    );
    Ok(playlist_response(playlist::render(&linearized)))
}

/// Fetch and prepare one schedule entry for the engine: master, indexed
/// rendition child, segment URIs resolved to their final playback form.
async fn source_entry(
    origin: &dyn OriginClient,
    entry: &ScheduleEntry,
    rendition: u32,
    cdn_base: Option<&str>,
) -> Result<SourcedEntry> {
    let master_url = &entry.asset.master_url;
    let origin_master = parse_master(&origin.fetch(master_url).await?)?;

    let child_url = join_url(directory_of(master_url), origin_master.rendition_uri(rendition)?);
    let mut manifest = parse_child(&origin.fetch(&child_url).await?)?;

    let base = segment_base(&child_url, cdn_base);
    for segment in &mut manifest.segments {
        segment.uri = join_url(&base, &segment.uri);
    }

    Ok(SourcedEntry {
        end_ms: entry.end_ms,
        duration_ms: entry.asset.duration_ms,
        segment_count: entry.asset.segment_count,
        manifest,
    })
}

fn playlist_response(text: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        text,
    )
        .into_response()
}

fn parse_client_id(raw: &str) -> Result<ClientId> {
    ClientId::parse(raw).ok_or_else(|| Error::malformed(format!("client_id {raw:?} is not a UUID")))
}

/// `channel1.m3u8` -> `channel1`.
fn strip_playlist_suffix(file: &str) -> Result<&str> {
    file.strip_suffix(".m3u8")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::malformed(format!("{file:?} is not a playlist path")))
}

/// `0.m3u8` -> `0`. Anything non-integer is a malformed request, never a
/// panic.
fn parse_rendition(file: &str) -> Result<u32> {
    strip_playlist_suffix(file)?
        .parse()
        .map_err(|_| Error::malformed(format!("rendition index in {file:?} is not an integer")))
}
