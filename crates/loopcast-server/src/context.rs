//! Shared application context.
//!
//! [`AppContext`] is handed to every route handler via Axum state. It only
//! holds the DB pool and `Arc`s, so cloning it per request is cheap.

use std::sync::Arc;

use loopcast_core::config::Config;
use loopcast_db::pool::DbPool;

use crate::origin::OriginClient;

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Origin manifest fetcher. A trait object so tests can swap in a
    /// canned origin without a network.
    pub origin: Arc<dyn OriginClient>,
}

impl AppContext {
    /// CDN base URL from config, if one is configured.
    pub fn cdn_base(&self) -> Option<&str> {
        self.config.stream.cdn_base_url.as_deref()
    }
}
