//! API endpoint validation
//!
//! Checks a user-supplied base URL before it is stored. Pure and
//! deterministic: no DNS lookups, no requests.

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Why an endpoint string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlValidationError {
    #[error("API URL is required")]
    Required,

    #[error("Invalid URL format")]
    InvalidFormat,

    #[error("URL must use http or https protocol")]
    UnsupportedScheme,
}

/// Outcome of [`validate_api_url`], shaped for display next to an input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parse and check an endpoint, returning the normalized URL.
pub fn parse_api_url(raw: &str) -> Result<Url, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Required);
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        // "api.example.com" has no scheme at all
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Err(UrlValidationError::UnsupportedScheme)
        }
        Err(_) => return Err(UrlValidationError::InvalidFormat),
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlValidationError::UnsupportedScheme);
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::InvalidFormat);
    }

    Ok(parsed)
}

/// Validate an API base URL.
///
/// Surrounding whitespace is ignored. Query strings and fragments do not
/// affect the outcome.
pub fn validate_api_url(raw: &str) -> ValidationResult {
    match parse_api_url(raw) {
        Ok(_) => ValidationResult {
            valid: true,
            error: None,
        },
        Err(e) => ValidationResult {
            valid: false,
            error: Some(e.to_string()),
        },
    }
}
