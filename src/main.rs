//! ragdesk CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use ragdesk::{
    api::ApiClient,
    commands::{
        cmd_delete_document, cmd_list_documents, cmd_reprocess_document, cmd_search,
        cmd_set_api_url, cmd_show_document, cmd_show_settings, cmd_status, cmd_upload,
        print_delete_outcome, print_document_details, print_document_page,
        print_reprocess_outcome, print_search_results, print_settings, print_status,
        print_upload_result, TerminalConfirm, UploadOptions,
    },
    config::Config,
    error::{Error, Result},
    progress::LogWriterFactory,
    settings::{FileStore, SettingsContext, SettingsStore},
    validate::parse_api_url,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ragdesk")]
#[command(version, about = "Client for a document ingestion and semantic search service", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Use this API base URL for this run only (not saved)
    #[arg(long, global = true, env = "RAGDESK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show API status
    Status,

    /// Upload a document
    Upload {
        /// File to upload
        file: Option<PathBuf>,

        /// Optional document title
        #[arg(long)]
        title: Option<String>,

        /// Optional document description
        #[arg(long)]
        description: Option<String>,

        /// Comma-separated tags (e.g. "tag1, tag2, tag3")
        #[arg(long)]
        tags: Option<String>,
    },

    /// Browse and manage documents
    Documents {
        #[command(subcommand)]
        action: DocumentsAction,
    },

    /// Semantic search over document chunks
    Search {
        /// The search query
        query: String,

        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// View or change client settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum DocumentsAction {
    /// List documents one page at a time
    List {
        /// Documents per page (defaults to documents.page_size)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Number of documents to skip
        #[arg(short, long, default_value = "0")]
        offset: u64,
    },

    /// Show a document and its chunks
    Show {
        /// Document ID
        id: String,
    },

    /// Ask the service to process a document again
    Reprocess {
        /// Document ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete a document
    Delete {
        /// Document ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the current settings
    Show,

    /// Validate and save the API base URL
    SetUrl {
        /// API base URL, e.g. http://127.0.0.1:1000
        url: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        if let Some(source) = std::error::Error::source(&e) {
            debug!("Caused by: {}", source);
        }
        std::process::exit(1);
    }
}

fn emit<T: Serialize>(json: bool, value: &T, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory::default()))
        .with(filter)
        .init();

    // Handle completions command (doesn't need config/settings)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "ragdesk", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load_or_default(cli.config.as_deref())?;
    let settings = SettingsContext::init(SettingsStore::new(FileStore::new(
        &config.paths.settings_file,
    )));

    if let Some(api_url) = cli.api_url.as_deref() {
        let url = parse_api_url(api_url).map_err(|e| Error::Validation(e.to_string()))?;
        debug!("Using API URL override {}", url);
        settings.override_api_base_url(api_url.trim());
    }

    // Settings commands work without a client
    if let Commands::Settings { action } = cli.command {
        return match action {
            SettingsAction::Show => {
                let info = cmd_show_settings(&settings, &config.paths.settings_file);
                emit(cli.json, &info, print_settings)
            }
            SettingsAction::SetUrl { url } => {
                let saved = cmd_set_api_url(&settings, &url)?;
                if cli.json {
                    println!("{}", serde_json::json!({ "api_base_url": saved }));
                } else {
                    println!("✓ API URL set to {}", saved);
                }
                Ok(())
            }
        };
    }

    let client = ApiClient::builder()
        .settings(settings.clone())
        .user_agent(config.client.user_agent.clone())
        .build()?;

    match cli.command {
        Commands::Status => {
            let info = cmd_status(&client).await?;
            emit(cli.json, &info, print_status)?;
        }

        Commands::Upload {
            file,
            title,
            description,
            tags,
        } => {
            let options = UploadOptions {
                file,
                title,
                description,
                tags,
            };
            let document = cmd_upload(&client, options).await?;
            emit(cli.json, &document, print_upload_result)?;
        }

        Commands::Documents { action } => {
            handle_documents(&config, &client, action, cli.json).await?;
        }

        Commands::Search { query, limit } => {
            let limit = limit.unwrap_or(config.search.default_limit);
            let response = cmd_search(&client, &query, limit).await?;
            emit(cli.json, &response, |r| {
                print_search_results(r, &config.search)
            })?;
        }

        Commands::Settings { .. } | Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

async fn handle_documents(
    config: &Config,
    client: &ApiClient,
    action: DocumentsAction,
    json: bool,
) -> Result<()> {
    match action {
        DocumentsAction::List { limit, offset } => {
            let limit = limit.unwrap_or(config.documents.page_size);
            let page = cmd_list_documents(client, limit, offset).await?;
            emit(json, &page, print_document_page)
        }

        DocumentsAction::Show { id } => {
            let details = cmd_show_document(client, &id).await?;
            emit(json, &details, print_document_details)
        }

        DocumentsAction::Reprocess { id, yes } => {
            let confirm = TerminalConfirm::new(yes);
            let delay = Duration::from_millis(config.documents.refresh_delay_ms);
            let outcome = cmd_reprocess_document(client, &id, &confirm, delay).await?;
            emit(json, &outcome, print_reprocess_outcome)
        }

        DocumentsAction::Delete { id, yes } => {
            let confirm = TerminalConfirm::new(yes);
            let outcome = cmd_delete_document(client, &id, &confirm).await?;
            emit(json, &outcome, print_delete_outcome)
        }
    }
}
