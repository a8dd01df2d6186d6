//! Origin playlist fetching.
//!
//! The service never stores playlist bytes; every request re-fetches the
//! manifests it needs from the packaging origin. [`OriginClient`] is the
//! seam between the handlers and the network so integration tests can run
//! against a mock origin.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use loopcast_core::config::OriginConfig;
use loopcast_core::{Error, Result};

/// Fetches manifest text by URL.
#[async_trait]
pub trait OriginClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Production origin client over HTTP(S).
pub struct HttpOrigin {
    http: reqwest::Client,
}

impl HttpOrigin {
    pub fn new(config: &OriginConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::retrieval(format!("origin client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl OriginClient for HttpOrigin {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("{url}: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::not_found(format!("manifest {url}"))),
            status if !status.is_success() => {
                Err(Error::retrieval(format!("{url}: origin returned {status}")))
            }
            _ => response
                .text()
                .await
                .map_err(|e| Error::retrieval(format!("{url}: {e}"))),
        }
    }
}
