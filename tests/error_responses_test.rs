//! Every failure renders as a playlist-safe 404 with an uppercased
//! `#EXT-X-STATUS` line and an mpegURL content type.

mod common;

use common::{mock_origin, TestHarness};
use loopcast_core::{now_epoch_ms, ClientId};

async fn status_body(url: String) -> (u16, String, String) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    (status, content_type, response.text().await.unwrap())
}

#[tokio::test]
async fn unknown_client_is_not_found() {
    let origin = mock_origin().await;
    let (harness, addr) = TestHarness::with_server().await;
    let asset = harness.seed_asset(&format!("{}/out/slate/index.m3u8", origin.uri()), 60_000, 6);
    harness.seed_schedule(asset, None);

    let stranger = ClientId::new();
    let (status, content_type, body) =
        status_body(format!("http://{addr}/default/channel1/0.m3u8?client_id={stranger}")).await;

    assert_eq!(status, 404);
    assert_eq!(content_type, "application/vnd.apple.mpegURL");
    // The whole message is uppercased, UUID included.
    assert_eq!(
        body,
        format!(
            "#EXT-X-STATUS: CLIENT {} NOT FOUND\n",
            stranger.to_string().to_uppercase()
        )
    );
}

#[tokio::test]
async fn missing_client_id_is_malformed() {
    let (_harness, addr) = TestHarness::with_server().await;

    let (status, _, body) = status_body(format!("http://{addr}/default/channel1/0.m3u8")).await;

    assert_eq!(status, 404);
    assert!(body.starts_with("#EXT-X-STATUS: MALFORMED REQUEST:"));
}

#[tokio::test]
async fn non_integer_rendition_is_malformed_not_a_panic() {
    let (harness, addr) = TestHarness::with_server().await;
    let client_id = ClientId::new();
    harness.seed_session(&client_id, now_epoch_ms());

    let (status, _, body) = status_body(format!(
        "http://{addr}/default/channel1/low.m3u8?client_id={client_id}"
    ))
    .await;

    assert_eq!(status, 404);
    assert!(body.starts_with("#EXT-X-STATUS: MALFORMED REQUEST:"));
}

#[tokio::test]
async fn rendition_out_of_range_is_not_found() {
    let origin = mock_origin().await;
    let (harness, addr) = TestHarness::with_server().await;
    let asset = harness.seed_asset(&format!("{}/out/slate/index.m3u8", origin.uri()), 60_000, 6);
    harness.seed_schedule(asset, None);

    let client_id = ClientId::new();
    harness.seed_session(&client_id, now_epoch_ms() - 5_000);

    let (status, _, body) = status_body(format!(
        "http://{addr}/default/channel1/7.m3u8?client_id={client_id}"
    ))
    .await;

    assert_eq!(status, 404);
    assert_eq!(body, "#EXT-X-STATUS: RENDITION 7 NOT FOUND\n");
}

#[tokio::test]
async fn empty_schedule_is_invalid() {
    let (harness, addr) = TestHarness::with_server().await;
    let client_id = ClientId::new();
    harness.seed_session(&client_id, now_epoch_ms());

    let (status, _, body) = status_body(format!(
        "http://{addr}/default/channel1.m3u8?client_id={client_id}"
    ))
    .await;

    assert_eq!(status, 404);
    assert!(body.starts_with("#EXT-X-STATUS: SCHEDULE INVALID:"));
}

#[tokio::test]
async fn unreachable_origin_surfaces_as_not_found() {
    let origin = mock_origin().await;
    let (harness, addr) = TestHarness::with_server().await;
    // Asset points at a path the origin does not serve.
    let asset = harness.seed_asset(&format!("{}/out/missing/index.m3u8", origin.uri()), 60_000, 6);
    harness.seed_schedule(asset, None);

    let client_id = ClientId::new();
    harness.seed_session(&client_id, now_epoch_ms());

    let (status, _, body) = status_body(format!(
        "http://{addr}/default/channel1.m3u8?client_id={client_id}"
    ))
    .await;

    assert_eq!(status, 404);
    assert!(body.starts_with("#EXT-X-STATUS: MANIFEST "));
    assert!(body.ends_with("NOT FOUND\n"));
}

#[tokio::test]
async fn unrecognized_paths_hit_the_playlist_fallback() {
    let (_harness, addr) = TestHarness::with_server().await;

    let (status, content_type, body) = status_body(format!("http://{addr}/just-one-segment")).await;

    assert_eq!(status, 404);
    assert_eq!(content_type, "application/vnd.apple.mpegURL");
    assert_eq!(body, "#EXT-X-STATUS: MALFORMED REQUEST: UNRECOGNIZED PATH\n");
}

#[tokio::test]
async fn health_is_exempt_from_the_playlist_contract() {
    let (_harness, addr) = TestHarness::with_server().await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
