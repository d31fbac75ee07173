//! CLI commands implementation
//!
//! Each command is a thin controller over [`crate::api::ApiClient`]: it
//! checks its own input, makes the call behind a spinner, and returns a
//! value the CLI either prints or serializes as JSON.

pub mod confirm;
pub mod documents;
pub mod search;
pub mod settings;
pub mod status;
pub mod upload;

pub use confirm::*;
pub use documents::*;
pub use search::*;
pub use settings::*;
pub use status::*;
pub use upload::*;

use chrono::{DateTime, Local};

/// Render an RFC 3339 timestamp in local time; unparseable input is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| {
            ts.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// Date part only, for tables
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// 1-based chunk number for display
pub fn chunk_number(position: u32) -> u32 {
    position.saturating_add(1)
}
