//! Unified error type for the loopcast service.
//!
//! Every failure a manifest request can hit funnels into [`Error`]. The HTTP
//! layer renders each variant as a playlist-safe `#EXT-X-STATUS` body, so no
//! internal detail beyond these messages ever reaches a player.

/// Unified error type covering all failure modes in loopcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A store or origin could not be reached, or returned garbage.
    #[error("Unable to retrieve {0}")]
    Retrieval(String),

    /// The requested entity (client, asset, rendition target) is unknown.
    #[error("{0} not found")]
    NotFound(String),

    /// The catalog is empty, contradictory, or has multiple open-ended entries.
    #[error("Schedule invalid: {0}")]
    ScheduleInvalid(String),

    /// A child playlist parsed to zero segments.
    #[error("Manifest contains no segments")]
    EmptyManifest,

    /// The requested rendition index is out of range for the master manifest.
    #[error("Rendition {0} not found")]
    RenditionNotFound(u32),

    /// The request path or query string has the wrong shape.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Retrieval error.
    pub fn retrieval<S: Into<String>>(msg: S) -> Self {
        Self::Retrieval(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new ScheduleInvalid error.
    pub fn schedule_invalid<S: Into<String>>(msg: S) -> Self {
        Self::ScheduleInvalid(msg.into())
    }

    /// Create a new MalformedRequest error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedRequest(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::retrieval("master manifest");
        assert_eq!(err.to_string(), "Unable to retrieve master manifest");

        let err = Error::not_found("client 123");
        assert_eq!(err.to_string(), "client 123 not found");

        let err = Error::schedule_invalid("catalog is empty");
        assert_eq!(err.to_string(), "Schedule invalid: catalog is empty");

        let err = Error::EmptyManifest;
        assert_eq!(err.to_string(), "Manifest contains no segments");

        let err = Error::RenditionNotFound(7);
        assert_eq!(err.to_string(), "Rendition 7 not found");

        let err = Error::malformed("rendition index is not an integer");
        assert_eq!(
            err.to_string(),
            "Malformed request: rendition index is not an integer"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_result_type() {
        fn ok_fn() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(ok_fn().unwrap(), 42);

        fn err_fn() -> Result<i32> {
            Err(Error::EmptyManifest)
        }
        assert!(err_fn().is_err());
    }
}
