//! Error types for zone-scout

use thiserror::Error;

/// Maximum number of characters of an upstream body kept in error messages
const SNIPPET_LEN: usize = 200;

/// Main error type for zone-scout operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Malformed upstream response: {0}")]
    UpstreamMalformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Build an `UpstreamMalformed` error carrying a truncated copy of the body
    pub fn malformed(source: &str, reason: impl std::fmt::Display, body: &str) -> Self {
        Error::UpstreamMalformed(format!(
            "{} ({}): {}",
            source,
            reason,
            snippet(body)
        ))
    }

    /// Whether this error was caused by the caller's input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidCoordinates(_)
                | Error::UnknownCategory(_)
                | Error::UnknownZone(_)
                | Error::InvalidQuery(_)
        )
    }
}

/// Truncate a payload for log and error output, respecting char boundaries
pub fn snippet(body: &str) -> &str {
    match body.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Result type alias for zone-scout operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let body = "x".repeat(500);
        assert_eq!(snippet(&body).len(), SNIPPET_LEN);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn test_malformed_message_names_source() {
        let err = Error::malformed("overpass", "missing elements", "<html>oops</html>");
        let msg = err.to_string();
        assert!(msg.contains("overpass"));
        assert!(msg.contains("<html>oops</html>"));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(Error::UnknownZone("Nowhere".to_string()).is_invalid_input());
        assert!(Error::UnknownCategory("spas".to_string()).is_invalid_input());
        assert!(!Error::Upstream("timeout".to_string()).is_invalid_input());
    }
}
