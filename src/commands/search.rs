//! Search command implementation

use super::chunk_number;
use crate::api::{ApiClient, QueryResponse};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::progress::with_spinner;
use serde::Serialize;
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

/// Relevance bucket used when displaying a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn classify(score: f64, config: &SearchConfig) -> Self {
        if score >= config.high_score {
            ScoreBand::High
        } else if score >= config.medium_score {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            ScoreBand::High => "●●●",
            ScoreBand::Medium => "●●○",
            ScoreBand::Low => "●○○",
        }
    }
}

/// Run a semantic search. Blank queries are rejected before any request.
pub async fn cmd_search(client: &ApiClient, query: &str, limit: u32) -> Result<QueryResponse> {
    if query.trim().is_empty() {
        return Err(Error::Validation("Query is required".to_string()));
    }
    if limit == 0 {
        return Err(Error::Validation("Limit must be at least 1".to_string()));
    }

    info!("Searching: {}", query);
    with_spinner("Searching...", client.query_documents(query, limit))
        .await
        .map_err(|e| Error::operation("Search failed. Please try again.", e))
}

/// First `max_chars` grapheme clusters of `text` on one line, with an
/// ellipsis when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flattened = text.trim().replace(['\n', '\r'], " ");
    let mut graphemes = flattened.graphemes(true);
    let head: String = graphemes.by_ref().take(max_chars).collect();
    if graphemes.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

/// Print query results to console
pub fn print_search_results(response: &QueryResponse, config: &SearchConfig) {
    println!(
        "\n🔍 Results for \"{}\" ({})\n",
        response.query,
        response.results.len()
    );

    if response.results.is_empty() {
        println!("No results found. Try a different query.");
        return;
    }

    for (i, result) in response.results.iter().enumerate() {
        let band = ScoreBand::classify(result.score, config);
        println!(
            "{}. {} [score: {:.3} {}]",
            i + 1,
            result.document.filename,
            result.score,
            band.marker()
        );

        if let Some(title) = result
            .document
            .metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
        {
            println!("   Title: {}", title);
        }

        let mut location = Vec::new();
        if let Some(metadata) = &result.chunk.metadata {
            if let Some(page) = metadata.page {
                location.push(format!("Page {}", page));
            }
            if let Some(section) = &metadata.section {
                location.push(section.clone());
            }
        }
        location.push(format!("Position: {}", chunk_number(result.chunk.position)));
        println!("   {}", location.join(" | "));

        println!("   {}", preview(&result.chunk.content, config.preview_chars));
        println!("   → ragdesk documents show {}\n", result.document.id);
    }
}
