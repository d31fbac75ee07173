//! HTTP client for the document ingestion and search service
//!
//! One method per server operation. Every call is a single round trip
//! against the endpoint currently held by the [`SettingsContext`]: no
//! retries, no timeout, no caching. Non-success statuses become
//! [`Error::Api`] carrying the status code and reason.

mod types;

pub use types::*;

use crate::error::{Error, Result};
use crate::settings::SettingsContext;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Results requested by a search when the caller does not choose
pub const DEFAULT_QUERY_LIMIT: u32 = 5;

/// Documents per page when listing
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A file ready to be sent to `POST /documents`
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadFile {
    /// Wrap in-memory content; the MIME type is guessed from the name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            bytes,
            mime_type,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Validation(format!("Not a file: {}", path.display())))?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }
}

/// Builds an [`ApiClient`]; a [`SettingsContext`] is mandatory.
#[derive(Default)]
pub struct ApiClientBuilder {
    settings: Option<SettingsContext>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    pub fn settings(mut self, settings: SettingsContext) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let settings = self.settings.ok_or_else(|| {
            Error::NotInitialized(
                "API client requires a SettingsContext; call SettingsContext::init first"
                    .to_string(),
            )
        })?;

        let mut builder = Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(ApiClient {
            client: builder.build()?,
            settings,
        })
    }
}

pub struct ApiClient {
    client: Client,
    settings: SettingsContext,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn new(settings: &SettingsContext) -> Result<Self> {
        Self::builder().settings(settings.clone()).build()
    }

    /// Endpoint in effect for the next request
    pub fn base_url(&self) -> String {
        self.settings.api_base_url()
    }

    /// `{base}/{segments...}`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let base = self.base_url();
        let mut url = Url::parse(&base)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid API base URL: {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await?;
        handle_response(response).await
    }

    async fn send_expecting<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        self.send(request)
            .await?
            .ok_or_else(|| Error::Other(format!("Empty response for {}", what)))
    }

    pub async fn get_status(&self) -> Result<StatusResponse> {
        let url = self.endpoint(&["status"])?;
        debug!("GET {}", url);
        self.send_expecting(self.client.get(url).header(ACCEPT, "application/json"), "status")
            .await
    }

    pub async fn list_documents(&self, limit: u32, offset: u64) -> Result<DocumentListResponse> {
        let mut url = self.endpoint(&["documents"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        debug!("GET {}", url);
        self.send_expecting(
            self.client.get(url).header(ACCEPT, "application/json"),
            "document list",
        )
        .await
    }

    pub async fn get_document(&self, id: &str) -> Result<Document> {
        let url = self.endpoint(&["documents", id])?;
        debug!("GET {}", url);
        self.send_expecting(self.client.get(url).header(ACCEPT, "application/json"), "document")
            .await
    }

    /// Upload a file as multipart form data. `metadata`, when present, is
    /// sent as a JSON string in the `metadata` field.
    pub async fn upload_document(
        &self,
        file: UploadFile,
        metadata: Option<&DocumentMetadata>,
    ) -> Result<Document> {
        let url = self.endpoint(&["documents"])?;
        debug!(
            "POST {} ({}, {} bytes)",
            url,
            file.file_name,
            file.bytes.len()
        );

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;
        let mut form = Form::new().part("file", part);
        if let Some(metadata) = metadata {
            form = form.text("metadata", serde_json::to_string(metadata)?);
        }

        self.send_expecting(self.client.post(url).multipart(form), "upload")
            .await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["documents", id])?;
        debug!("DELETE {}", url);
        // Body, if any, is ignored
        let response = self.client.delete(url).send().await?;
        check_status(&response)
    }

    pub async fn process_document(&self, id: &str) -> Result<ProcessResponse> {
        let url = self.endpoint(&["documents", id, "process"])?;
        debug!("POST {}", url);
        self.send_expecting(
            self.client.post(url).header(ACCEPT, "application/json"),
            "process",
        )
        .await
    }

    pub async fn get_document_chunks(&self, id: &str) -> Result<ChunksResponse> {
        let url = self.endpoint(&["documents", id, "chunks"])?;
        debug!("GET {}", url);
        self.send_expecting(self.client.get(url).header(ACCEPT, "application/json"), "chunks")
            .await
    }

    pub async fn query_documents(&self, query: &str, limit: u32) -> Result<QueryResponse> {
        let url = self.endpoint(&["query"])?;
        debug!("POST {} (limit {})", url, limit);
        let request = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&QueryRequest { query, limit });
        self.send_expecting(request, "query").await
    }
}

fn check_status(response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(Error::Api {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    })
}

/// Map a response to its payload: error on non-success, `None` on 204,
/// parsed JSON otherwise.
pub async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    check_status(&response)?;

    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    Ok(Some(response.json::<T>().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemoryStore, SettingsStore};
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str) -> ApiClient {
        let settings = SettingsContext::init(SettingsStore::new(MemoryStore::new()));
        settings.set_api_base_url(base_url);
        ApiClient::new(&settings).unwrap()
    }

    fn document_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "filename": "report.pdf",
            "status": "completed",
            "metadata": {"title": "Q1 Report", "tags": ["finance"]},
            "created_at": "2024-01-15T10:30:00Z",
            "chunk_count": 12
        })
    }

    #[test]
    fn test_builder_requires_settings() {
        let err = ApiClient::builder().build().err().unwrap();
        assert!(matches!(err, Error::NotInitialized(_)));
        assert!(err.to_string().contains("SettingsContext"));
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        let client = client_for("http://api.example.com/v1/");
        let url = client.endpoint(&["documents", "doc 1", "chunks"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.example.com/v1/documents/doc%201/chunks"
        );

        let client = client_for("http://127.0.0.1:1000");
        assert_eq!(
            client.endpoint(&["status"]).unwrap().as_str(),
            "http://127.0.0.1:1000/status"
        );
    }

    #[tokio::test]
    async fn test_get_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "timestamp": "2024-01-15T10:30:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let status = client_for(&server.uri()).get_status().await.unwrap();
        assert!(status.is_ok());
        assert_eq!(status.timestamp, "2024-01-15T10:30:00Z");
    }

    #[tokio::test]
    async fn test_list_documents_sends_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/documents"))
            .and(query_param("limit", "20"))
            .and(query_param("offset", "40"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [document_json("doc-1")],
                "total": 41,
                "limit": 20,
                "offset": 40
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&format!("{}/v1", server.uri()));
        let page = client.list_documents(20, 40).await.unwrap();
        assert_eq!(page.total, 41);
        assert_eq!(page.documents[0].chunk_count, Some(12));
    }

    #[tokio::test]
    async fn test_not_found_fails_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .get_document("missing")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "API Error: 404 Not Found");
    }

    #[tokio::test]
    async fn test_delete_resolves_on_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/documents/doc-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server.uri())
            .delete_document("doc-1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_handle_response_no_content_has_no_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let response = reqwest::get(format!("{}/empty", server.uri())).await.unwrap();
        let body: Option<StatusResponse> = handle_response(response).await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_delete_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/documents/doc-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .delete_document("doc-1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_process_and_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents/doc-1/process"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "status": "processing",
                "message": "Reprocessing started"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/doc-1/chunks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chunks": [{
                    "id": "chunk-1",
                    "document_id": "doc-1",
                    "content": "First chunk",
                    "position": 0
                }],
                "total": 1
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let processed = client.process_document("doc-1").await.unwrap();
        assert_eq!(processed.status, "processing");

        let chunks = client.get_document_chunks("doc-1").await.unwrap();
        assert_eq!(chunks.total, 1);
        assert_eq!(chunks.chunks[0].content, "First chunk");
    }

    #[tokio::test]
    async fn test_query_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(json!({"query": "revenue growth", "limit": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "query": "revenue growth"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server.uri())
            .query_documents("revenue growth", DEFAULT_QUERY_LIMIT)
            .await
            .unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.query, "revenue growth");
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_with_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents"))
            .and(body_string_contains("name=\"file\"; filename=\"notes.txt\""))
            .and(body_string_contains("hello world"))
            .and(body_string_contains("name=\"metadata\""))
            .and(body_string_contains(r#"{"title":"Notes","tags":["a","b"]}"#))
            .respond_with(ResponseTemplate::new(201).set_body_json(document_json("doc-9")))
            .expect(1)
            .mount(&server)
            .await;

        let metadata = DocumentMetadata {
            title: Some("Notes".to_string()),
            description: None,
            tags: Some(vec!["a".to_string(), "b".to_string()]),
        };
        let file = UploadFile::new("notes.txt", b"hello world".to_vec());
        assert_eq!(file.mime_type, "text/plain");

        let doc = client_for(&server.uri())
            .upload_document(file, Some(&metadata))
            .await
            .unwrap();
        assert_eq!(doc.id, "doc-9");
    }

    #[tokio::test]
    async fn test_settings_change_redirects_requests() {
        let first = MockServer::start().await;
        let second = MockServer::start().await;
        for server in [&first, &second] {
            Mock::given(method("GET"))
                .and(path("/status"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "status": "ok",
                    "timestamp": "2024-01-15T10:30:00Z"
                })))
                .expect(1)
                .mount(server)
                .await;
        }

        let settings = SettingsContext::init(SettingsStore::new(MemoryStore::new()));
        settings.set_api_base_url(first.uri());
        let client = ApiClient::new(&settings).unwrap();
        client.get_status().await.unwrap();

        settings.set_api_base_url(second.uri());
        client.get_status().await.unwrap();
    }
}
