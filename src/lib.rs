//! ragdesk - a command-line client for a document ingestion and search service
//!
//! This crate provides:
//! - A typed HTTP client for the service's document and query endpoints
//! - A persisted, validated setting for the service's base URL
//! - CLI commands for uploading, browsing, reprocessing, deleting and
//!   searching documents

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod settings;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
