//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config,
//! and full [`AppContext`], plus seeding helpers for the catalog, schedule,
//! and sessions. The [`with_server_config`] constructor starts Axum on a
//! random port for HTTP-level testing against a wiremock origin.

use std::net::SocketAddr;
use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use loopcast_core::config::Config;
use loopcast_core::{Asset, AssetId, ClientId};
use loopcast_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
use loopcast_db::queries::{assets, schedule, sessions};
use loopcast_server::context::AppContext;
use loopcast_server::origin::HttpOrigin;
use loopcast_server::router::build_router;

/// A 60s asset: six 10s segments, matching the engine's canonical loop
/// fixture.
pub const MASTER_BODY: &str = "#EXTM3U\n\
    #EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080\n\
    index_1.m3u8\n\
    #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720\n\
    index_2.m3u8\n";

pub const CHILD_BODY: &str = "#EXTM3U\n\
    #EXT-X-VERSION:3\n\
    #EXT-X-TARGETDURATION:10\n\
    #EXT-X-MEDIA-SEQUENCE:0\n\
    #EXTINF:10.0,\nseg_00001.ts\n\
    #EXTINF:10.0,\nseg_00002.ts\n\
    #EXTINF:10.0,\nseg_00003.ts\n\
    #EXTINF:10.0,\nseg_00004.ts\n\
    #EXTINF:10.0,\nseg_00005.ts\n\
    #EXTINF:10.0,\nseg_00006.ts\n\
    #EXT-X-ENDLIST\n";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    /// Create a new harness with a custom configuration and in-memory DB.
    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let origin =
            Arc::new(HttpOrigin::new(&config.origin).expect("failed to build origin client"));

        let ctx = AppContext {
            db: db.clone(),
            config: Arc::new(config),
            origin,
        };

        Self { ctx, db }
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Start an Axum server with default config on a random port.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Insert an asset whose master lives at `master_url`.
    pub fn seed_asset(&self, master_url: &str, duration_ms: i64, segment_count: u32) -> AssetId {
        let asset = Asset {
            id: AssetId::new(),
            name: "slate".into(),
            master_url: master_url.to_string(),
            duration_ms,
            segment_count,
        };
        assets::create(&self.conn(), &asset).expect("failed to seed asset");
        asset.id
    }

    /// Append a schedule entry for an already-seeded asset.
    pub fn seed_schedule(&self, asset_id: AssetId, end_ms: Option<i64>) {
        schedule::insert(&self.conn(), asset_id, end_ms).expect("failed to seed schedule");
    }

    /// Anchor a client session at an explicit instant.
    pub fn seed_session(&self, client_id: &ClientId, start_ms: i64) {
        sessions::create_if_absent(&self.conn(), client_id, start_ms)
            .expect("failed to seed session");
    }
}

/// Start a mock origin serving the canonical 60s asset under `/out/slate/`.
pub async fn mock_origin() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/out/slate/index.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER_BODY))
        .mount(&server)
        .await;
    for child in ["index_1.m3u8", "index_2.m3u8"] {
        Mock::given(method("GET"))
            .and(path(format!("/out/slate/{child}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHILD_BODY))
            .mount(&server)
            .await;
    }

    server
}

/// HTTP client that does not follow redirects, so 301s can be asserted.
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build test client")
}
