//! Document listing, details, reprocessing and deletion

use super::confirm::Confirm;
use super::{chunk_number, format_date, format_timestamp};
use crate::api::{ApiClient, Chunk, Document, ProcessResponse};
use crate::error::{Error, Result};
use crate::progress::with_spinner;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Position of one listing page within the full collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
}

impl PageWindow {
    pub fn new(limit: u64, offset: u64, total: u64) -> Self {
        Self {
            limit,
            offset,
            total,
        }
    }

    /// 1-based index of the first item shown, 0 for an empty collection
    pub fn first_item(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.offset.saturating_add(1)
        }
    }

    /// 1-based index of the last item shown
    pub fn last_item(&self) -> u64 {
        self.offset.saturating_add(self.limit).min(self.total)
    }

    pub fn previous_offset(&self) -> Option<u64> {
        (self.offset > 0).then(|| self.offset.saturating_sub(self.limit))
    }

    pub fn next_offset(&self) -> Option<u64> {
        let next = self.offset.saturating_add(self.limit);
        (next < self.total).then_some(next)
    }
}

/// One page of the document listing
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub window: PageWindow,
}

/// A document together with its chunks
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetails {
    pub document: Document,
    pub chunks: Vec<Chunk>,
}

/// Result of a confirmed-or-not destructive action
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted { id: String, filename: String },
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReprocessOutcome {
    Started {
        response: ProcessResponse,
        /// Document as re-fetched after the refresh delay, if that succeeded
        refreshed: Option<Document>,
    },
    Cancelled,
}

/// List documents, `limit` per page starting at `offset`
pub async fn cmd_list_documents(
    client: &ApiClient,
    limit: u32,
    offset: u64,
) -> Result<DocumentPage> {
    if limit == 0 {
        return Err(Error::Validation("Limit must be at least 1".to_string()));
    }
    info!("Listing documents (limit {}, offset {})", limit, offset);

    let response = with_spinner("Loading documents...", client.list_documents(limit, offset))
        .await
        .map_err(|e| Error::operation("Failed to load documents. Please try again.", e))?;

    Ok(DocumentPage {
        window: PageWindow::new(u64::from(limit), offset, response.total),
        documents: response.documents,
    })
}

/// Fetch a document and its chunks concurrently
pub async fn cmd_show_document(client: &ApiClient, id: &str) -> Result<DocumentDetails> {
    info!("Loading document {}", id);

    let (document, chunks) = with_spinner("Loading document...", async {
        tokio::try_join!(client.get_document(id), client.get_document_chunks(id))
    })
    .await
    .map_err(|e| Error::operation("Failed to load document. It may not exist.", e))?;

    Ok(DocumentDetails {
        document,
        chunks: chunks.chunks,
    })
}

async fn fetch_for_action(client: &ApiClient, id: &str) -> Result<Document> {
    with_spinner("Loading document...", client.get_document(id))
        .await
        .map_err(|e| Error::operation("Failed to load document. It may not exist.", e))
}

/// Ask for confirmation, then trigger reprocessing. After `refresh_delay`
/// the document is fetched once more so the new status can be shown.
pub async fn cmd_reprocess_document(
    client: &ApiClient,
    id: &str,
    confirm: &dyn Confirm,
    refresh_delay: Duration,
) -> Result<ReprocessOutcome> {
    let document = fetch_for_action(client, id).await?;
    if !confirm.confirm(&format!(
        "Are you sure you want to reprocess \"{}\"?",
        document.filename
    ))? {
        debug!("Reprocess of {} cancelled", id);
        return Ok(ReprocessOutcome::Cancelled);
    }

    let response = with_spinner("Reprocessing...", client.process_document(id))
        .await
        .map_err(|e| Error::operation("Failed to reprocess document. Please try again.", e))?;
    info!("Reprocessing initiated for {}: {}", id, response.message);

    tokio::time::sleep(refresh_delay).await;
    let refreshed = match client.get_document(id).await {
        Ok(document) => Some(document),
        Err(e) => {
            warn!("Failed to refresh document {}: {}", id, e);
            None
        }
    };

    Ok(ReprocessOutcome::Started {
        response,
        refreshed,
    })
}

/// Ask for confirmation, then delete the document
pub async fn cmd_delete_document(
    client: &ApiClient,
    id: &str,
    confirm: &dyn Confirm,
) -> Result<DeleteOutcome> {
    let document = fetch_for_action(client, id).await?;
    if !confirm.confirm(&format!(
        "Are you sure you want to delete \"{}\"?",
        document.filename
    ))? {
        debug!("Delete of {} cancelled", id);
        return Ok(DeleteOutcome::Cancelled);
    }

    with_spinner("Deleting...", client.delete_document(id))
        .await
        .map_err(|e| Error::operation("Failed to delete document. Please try again.", e))?;
    info!("Deleted document {}", id);

    Ok(DeleteOutcome::Deleted {
        id: document.id,
        filename: document.filename,
    })
}

/// Print a listing page to console
pub fn print_document_page(page: &DocumentPage) {
    println!("\n📚 Documents\n");

    if page.documents.is_empty() {
        println!("No documents found. Use 'ragdesk upload <file>' to upload your first document.");
        return;
    }

    for doc in &page.documents {
        println!("• {} [{}]", doc.filename, doc.status);
        if let Some(title) = doc.metadata.as_ref().and_then(|m| m.title.as_deref()) {
            println!("  Title: {}", title);
        }
        println!("  ID: {}", doc.id);
        println!(
            "  Chunks: {}, Created: {}",
            doc.chunk_count.unwrap_or(0),
            format_date(&doc.created_at)
        );
        println!();
    }

    let window = page.window;
    println!(
        "Showing {} - {} of {}",
        window.first_item(),
        window.last_item(),
        window.total
    );
    if let Some(previous) = window.previous_offset() {
        println!("  Previous: --offset {}", previous);
    }
    if let Some(next) = window.next_offset() {
        println!("  Next: --offset {}", next);
    }
}

/// Print document information and its chunks
pub fn print_document_details(details: &DocumentDetails) {
    let doc = &details.document;
    println!("\n📄 {}\n", doc.filename);
    println!("Status: {}", doc.status);
    println!("ID: {}", doc.id);
    println!("Created: {}", format_timestamp(&doc.created_at));
    if let Some(updated) = &doc.updated_at {
        println!("Updated: {}", format_timestamp(updated));
    }
    println!("Chunks: {}", doc.chunk_count.unwrap_or(0));

    if let Some(metadata) = &doc.metadata {
        if let Some(title) = &metadata.title {
            println!("Title: {}", title);
        }
        if let Some(description) = &metadata.description {
            println!("Description: {}", description);
        }
        if let Some(tags) = metadata.tags.as_ref().filter(|t| !t.is_empty()) {
            println!("Tags: {}", tags.join(", "));
        }
    }

    println!("\nChunks ({}):\n", details.chunks.len());
    if details.chunks.is_empty() {
        println!("No chunks available. The document may still be processing.");
        return;
    }

    for chunk in &details.chunks {
        let mut labels = vec![format!("#{}", chunk_number(chunk.position))];
        if let Some(metadata) = &chunk.metadata {
            if let Some(page) = metadata.page {
                labels.push(format!("page {}", page));
            }
            if let Some(section) = &metadata.section {
                labels.push(section.clone());
            }
        }
        println!("[{}]", labels.join(" · "));
        println!("{}\n", chunk.content.trim());
    }
}

pub fn print_reprocess_outcome(outcome: &ReprocessOutcome) {
    match outcome {
        ReprocessOutcome::Cancelled => println!("Reprocessing cancelled."),
        ReprocessOutcome::Started {
            response,
            refreshed,
        } => {
            println!("✓ Document reprocessing initiated successfully!");
            println!("  {}", response.message);
            if let Some(doc) = refreshed {
                println!("  Current status: {}", doc.status);
            }
        }
    }
}

pub fn print_delete_outcome(outcome: &DeleteOutcome) {
    match outcome {
        DeleteOutcome::Cancelled => println!("Deletion cancelled."),
        DeleteOutcome::Deleted { filename, .. } => {
            println!("✓ Deleted \"{}\"", filename);
        }
    }
}
