//! Error types for the litmap core library.
//!
//! Uses `thiserror` for public API error types, split by domain: source
//! transport, retrieval control flow, and configuration. Transient source
//! failures stay inside the retriever's retry loop; callers only ever see
//! them once the retry budget is exhausted with nothing accepted.

use std::path::PathBuf;

/// Top-level error type for the litmap core library.
#[derive(Debug, thiserror::Error)]
pub enum LitmapError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Retrieval error: {0}")]
    Retrieve(#[from] RetrieveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from a single call against a search source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source} returned status {status}")]
    Status { source: &'static str, status: u16 },

    #[error("Failed to parse {source} response: {message}")]
    Parse {
        source: &'static str,
        message: String,
    },
}

/// Errors from the retrieval loop.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("{source} unreachable after {failures} failed attempts with no records accepted")]
    SourceUnavailable { source: String, failures: u32 },

    #[error("Retrieval was cancelled")]
    Cancelled,

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `LitmapError`.
pub type Result<T> = std::result::Result<T, LitmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_source_status() {
        let err = LitmapError::Source(SourceError::Status {
            source: "crossref",
            status: 503,
        });
        assert_eq!(err.to_string(), "Source error: crossref returned status 503");
    }

    #[test]
    fn test_error_display_source_unavailable() {
        let err = LitmapError::Retrieve(RetrieveError::SourceUnavailable {
            source: "semantic_scholar".into(),
            failures: 4,
        });
        assert_eq!(
            err.to_string(),
            "Retrieval error: semantic_scholar unreachable after 4 failed attempts with no records accepted"
        );
    }

    #[test]
    fn test_error_display_invalid_query() {
        let err = RetrieveError::InvalidQuery {
            reason: "max_results must be at least 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid query: max_results must be at least 1"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = LitmapError::Config(ConfigError::FileNotFound {
            path: PathBuf::from("/tmp/litmap.toml"),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Configuration file not found: /tmp/litmap.toml"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LitmapError = io_err.into();
        assert!(matches!(err, LitmapError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: LitmapError = serde_err.into();
        assert!(matches!(err, LitmapError::Serialization(_)));
    }
}
