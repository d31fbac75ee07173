//! Status command implementation

use crate::api::{ApiClient, StatusResponse};
use crate::error::{Error, Result};
use crate::progress::with_spinner;
use serde::Serialize;
use tracing::info;

/// Service status plus the endpoint it was fetched from
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub api_base_url: String,
    #[serde(flatten)]
    pub status: StatusResponse,
}

/// Check the service's health endpoint
pub async fn cmd_status(client: &ApiClient) -> Result<StatusInfo> {
    let api_base_url = client.base_url();
    info!("Checking API status at {}", api_base_url);

    let status = with_spinner("Checking API status...", client.get_status())
        .await
        .map_err(|e| {
            Error::operation(
                "Failed to fetch API status. Please check your connection.",
                e,
            )
        })?;

    Ok(StatusInfo {
        api_base_url,
        status,
    })
}

/// Print status to console
pub fn print_status(info: &StatusInfo) {
    println!("\n📊 API Status\n");
    println!("Endpoint: {}", info.api_base_url);

    let badge = if info.status.is_ok() { "✓" } else { "✗" };
    println!("Status: {} {}", badge, info.status.status);
    println!(
        "Last checked: {}",
        super::format_timestamp(&info.status.timestamp)
    );

    println!("\nQuick actions:");
    println!("  ragdesk upload <file>      Upload a document");
    println!("  ragdesk documents list     Browse documents");
    println!("  ragdesk search <query>     Search document content");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemoryStore, SettingsContext, SettingsStore};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let settings = SettingsContext::init(SettingsStore::new(MemoryStore::new()));
        settings.override_api_base_url(server.uri());
        ApiClient::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_status_reports_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "timestamp": "2024-01-15T10:30:00Z"
            })))
            .mount(&server)
            .await;

        let info = cmd_status(&client_for(&server)).await.unwrap();
        assert_eq!(info.api_base_url, server.uri());
        assert!(info.status.is_ok());

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["status"], "ok");
    }

    #[tokio::test]
    async fn test_status_failure_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = cmd_status(&client_for(&server)).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to fetch API status"));
        assert_eq!(err.status(), Some(503));
    }
}
