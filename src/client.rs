//! Remote client for the Gemini File Search REST API.
//!
//! [`FileSearchApi`] is the contract the dispatcher talks to; [`GeminiClient`]
//! implements it over HTTP with `reqwest`. Every call is authenticated by a
//! `key` query parameter. JSON requests go to the base endpoint family,
//! inline uploads go to the separate upload endpoint as a
//! `multipart/related` body (see [`crate::multipart`]).
//!
//! # Error Contract
//!
//! Any non-success status is turned into [`GeminiError::Api`] (or
//! [`GeminiError::Upload`] for the upload endpoint) carrying the status code
//! and the response body verbatim. Network failures are passed through as
//! [`GeminiError::Transport`]. Nothing is retried.
//!
//! # Resource Names
//!
//! Resource names such as `fileSearchStores/abc123/documents/doc456` are
//! treated as opaque path fragments and appended to the base URL as-is.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::{GeminiError, Result};
use crate::models::{CreateStoreRequest, ImportFileRequest, RagQuery, UploadRequest};
use crate::multipart::{decode_content, RelatedBody};

/// The operations the remote RAG service offers.
///
/// Every method returns the service's JSON response exactly as received, so
/// callers can forward it unchanged. Typed views live in [`crate::models`]
/// (see [`crate::models::view`]).
#[async_trait]
pub trait FileSearchApi: Send + Sync {
    /// Create an empty store; returns the new store resource.
    async fn create_store(&self, display_name: &str) -> Result<Value>;

    /// One page of stores and, if more remain, a `nextPageToken`.
    async fn list_stores(&self, page_size: Option<u32>, page_token: Option<&str>)
        -> Result<Value>;

    /// Fetch a store by resource name.
    async fn get_store(&self, store_name: &str) -> Result<Value>;

    /// Delete a store; `force` also deletes the documents inside it.
    async fn delete_store(&self, store_name: &str, force: bool) -> Result<Value>;

    /// Upload inline content; returns the indexing operation.
    async fn upload_to_store(&self, store_name: &str, upload: &UploadRequest) -> Result<Value>;

    /// Import an existing `files/{id}` resource; returns the import operation.
    async fn import_file_to_store(
        &self,
        store_name: &str,
        import: &ImportFileRequest,
    ) -> Result<Value>;

    /// Poll a long-running operation.
    async fn get_operation(&self, operation_name: &str) -> Result<Value>;

    /// Same request as [`get_operation`](FileSearchApi::get_operation); the
    /// upload namespace is distinct only on the remote side.
    async fn get_upload_operation(&self, operation_name: &str) -> Result<Value>;

    /// One page of the documents in a store.
    async fn list_documents(
        &self,
        store_name: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<Value>;

    /// Fetch a document by resource name.
    async fn get_document(&self, document_name: &str) -> Result<Value>;

    /// Delete a document; `force` also deletes its chunks.
    async fn delete_document(&self, document_name: &str, force: bool) -> Result<Value>;

    /// Generate an answer grounded in the named stores.
    async fn rag_query(&self, query: &RagQuery) -> Result<Value>;
}

/// HTTP implementation of [`FileSearchApi`].
///
/// Holds only the immutable credential and endpoint roots, so one instance
/// is shared by every concurrent tool call.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    upload_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("upload_url", &self.upload_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// [`GeminiError::NotConfigured`] when no API key is available.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GeminiError::not_configured(crate::config::API_KEY_ENV))?;

        let http = Client::builder().build()?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upload_url: config.upload_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, query: &[(&str, String)]) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "gemini request");
        self.http
            .request(method, url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;
        let text = success_text(response, |status, body| GeminiError::Api { status, body }).await?;
        parse_body(&text)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.send_json(self.request(Method::GET, path, query)).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send_json(self.request(Method::POST, path, &[]).json(body))
            .await
    }

    async fn delete(&self, path: &str, force: bool) -> Result<Value> {
        let query = force_query(force);
        self.send_json(self.request(Method::DELETE, path, &query))
            .await
    }
}

/// Read the body of a successful response, or turn a failure into an error
/// carrying the status and raw body.
async fn success_text(
    response: Response,
    on_error: impl FnOnce(u16, String) -> GeminiError,
) -> Result<String> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        Ok(text)
    } else {
        Err(on_error(status.as_u16(), text))
    }
}

/// An empty body (e.g. from DELETE) is read as `{}`.
fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        Ok(Value::Object(Default::default()))
    } else {
        Ok(serde_json::from_str(text)?)
    }
}

fn page_query(page_size: Option<u32>, page_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(size) = page_size.filter(|s| *s > 0) {
        query.push(("pageSize", size.to_string()));
    }
    if let Some(token) = page_token.filter(|t| !t.is_empty()) {
        query.push(("pageToken", token.to_string()));
    }
    query
}

fn force_query(force: bool) -> Vec<(&'static str, String)> {
    if force {
        vec![("force", "true".to_string())]
    } else {
        Vec::new()
    }
}

#[async_trait]
impl FileSearchApi for GeminiClient {
    async fn create_store(&self, display_name: &str) -> Result<Value> {
        let body = CreateStoreRequest {
            display_name: display_name.to_string(),
        };
        self.post("fileSearchStores", &body).await
    }

    async fn list_stores(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<Value> {
        self.get("fileSearchStores", &page_query(page_size, page_token))
            .await
    }

    async fn get_store(&self, store_name: &str) -> Result<Value> {
        self.get(store_name, &[]).await
    }

    async fn delete_store(&self, store_name: &str, force: bool) -> Result<Value> {
        self.delete(store_name, force).await
    }

    async fn upload_to_store(&self, store_name: &str, upload: &UploadRequest) -> Result<Value> {
        let metadata = serde_json::to_vec(&upload.metadata())?;
        let content = decode_content(&upload.content, upload.content_encoding)?;
        let body = RelatedBody::new(&metadata, &upload.mime_type, &content);

        let url = format!(
            "{}/{}:uploadToFileSearchStore",
            self.upload_url,
            store_name.trim_start_matches('/')
        );
        debug!(
            %url,
            bytes = content.len(),
            mime_type = %upload.mime_type,
            "gemini upload"
        );

        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, body.content_type())
            .body(body.into_bytes())
            .send()
            .await?;

        let text =
            success_text(response, |status, body| GeminiError::Upload { status, body }).await?;
        parse_body(&text)
    }

    async fn import_file_to_store(
        &self,
        store_name: &str,
        import: &ImportFileRequest,
    ) -> Result<Value> {
        self.post(&format!("{}:importFile", store_name), import)
            .await
    }

    async fn get_operation(&self, operation_name: &str) -> Result<Value> {
        self.get(operation_name, &[]).await
    }

    async fn get_upload_operation(&self, operation_name: &str) -> Result<Value> {
        self.get(operation_name, &[]).await
    }

    async fn list_documents(
        &self,
        store_name: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<Value> {
        self.get(
            &format!("{}/documents", store_name),
            &page_query(page_size, page_token),
        )
        .await
    }

    async fn get_document(&self, document_name: &str) -> Result<Value> {
        self.get(document_name, &[]).await
    }

    async fn delete_document(&self, document_name: &str, force: bool) -> Result<Value> {
        self.delete(document_name, force).await
    }

    async fn rag_query(&self, query: &RagQuery) -> Result<Value> {
        self.post(
            &format!("models/{}:generateContent", query.model()),
            &query.to_request(),
        )
        .await
    }
}
