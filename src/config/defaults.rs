//! Default values for configuration

/// Default User-Agent sent with every request
pub fn default_user_agent() -> String {
    format!("ragdesk/{}", env!("CARGO_PKG_VERSION"))
}

/// Default number of documents per listing page
pub fn default_page_size() -> u32 {
    crate::api::DEFAULT_PAGE_SIZE
}

/// Default delay before re-fetching a document after reprocessing (milliseconds)
pub fn default_refresh_delay_ms() -> u64 {
    1000
}

/// Default number of search results
pub fn default_search_limit() -> u32 {
    crate::api::DEFAULT_QUERY_LIMIT
}

/// Default number of characters shown per chunk preview
pub fn default_preview_chars() -> usize {
    200
}

/// Default score at or above which a hit counts as highly relevant
pub fn default_high_score() -> f64 {
    0.8
}

/// Default score at or above which a hit counts as moderately relevant
pub fn default_medium_score() -> f64 {
    0.6
}

/// Default file name of the settings store, relative to the base directory
pub fn default_settings_file_name() -> &'static str {
    "settings.toml"
}
