//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`loopcast_core::Error`] so handlers can
//! return `Result<T, loopcast_core::Error>` directly.
//!
//! Every failure renders the same way: HTTP 404 with an mpegURL content
//! type and a playlist-shaped `#EXT-X-STATUS` body. Players treat an
//! unparseable error page worse than a missing playlist, so the body stays
//! valid playlist text and the taxonomy message is the only detail exposed.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegURL";

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError(loopcast_core::Error);

impl From<loopcast_core::Error> for AppError {
    fn from(e: loopcast_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self.0, loopcast_core::Error::Database(_) | loopcast_core::Error::Io(_)) {
            tracing::error!(error = %self.0, "Internal error in manifest handler");
        } else {
            tracing::debug!(error = %self.0, "Manifest request rejected");
        }

        let body = format!("#EXT-X-STATUS: {}\n", self.0.to_string().to_uppercase());

        (
            StatusCode::NOT_FOUND,
            [
                (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            body,
        )
            .into_response()
    }
}
