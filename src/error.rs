//! Custom error types for ragdesk

use thiserror::Error;

/// Main error type for ragdesk operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local input check failed; the request never left the process
    #[error("{0}")]
    Validation(String),

    /// The service answered with a non-success status
    #[error("API Error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    /// A page-level operation failed; `message` is what the user sees
    #[error("{message}")]
    Operation {
        message: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Settings storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Not initialized: {0}")]
    NotInitialized(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status carried by an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::Operation { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Wrap `source` behind a user-facing failure message. Local
    /// validation errors are passed through untouched.
    pub fn operation(message: impl Into<String>, source: Error) -> Self {
        match source {
            Error::Validation(_) => source,
            source => Error::Operation {
                message: message.into(),
                source: Box::new(source),
            },
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Result type alias for ragdesk
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_hides_detail_but_keeps_status() {
        let api = Error::Api {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        let err = Error::operation("Failed to load document. It may not exist.", api);
        assert_eq!(err.to_string(), "Failed to load document. It may not exist.");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_operation_passes_validation_through() {
        let err = Error::operation(
            "Search failed. Please try again.",
            Error::Validation("Query is required".to_string()),
        );
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "Query is required");
    }
}
