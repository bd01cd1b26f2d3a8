//! Wire representations of the Gemini File Search resources.
//!
//! All resources are owned by the remote service; these types only mirror
//! the JSON that crosses the wire. Field names follow the API's camelCase
//! convention.
//!
//! Responses are forwarded to callers as the raw [`Value`] the service sent.
//! The response types here are read-side views over that value (see
//! [`view`]); they keep unrecognised fields in an `extra` map, but the raw
//! value stays the source of truth.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::Result;
use crate::multipart::ContentEncoding;

/// Read a typed view of a raw response.
pub fn view<T: DeserializeOwned>(raw: &Value) -> Result<T> {
    Ok(T::deserialize(raw)?)
}

/// Model used by [`RagQuery`] when the caller does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

// ============ Stores ============

/// A named collection of indexed documents (`fileSearchStores/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of stores plus the continuation token, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchStoreList {
    /// Absent (rather than empty) when the service omits the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search_stores: Option<Vec<FileSearchStore>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileSearchStoreList {
    pub fn stores(&self) -> &[FileSearchStore] {
        self.file_search_stores.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub display_name: String,
}

// ============ Documents ============

/// Indexing state of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Pending,
    Active,
    Failed,
    Unspecified,
}

impl DocumentState {
    /// Parse the service's state string, with or without the `STATE_` prefix.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix("STATE_").unwrap_or(raw) {
            "PENDING" => Self::Pending,
            "ACTIVE" => Self::Active,
            "FAILED" => Self::Failed,
            _ => Self::Unspecified,
        }
    }

    /// `ACTIVE` and `FAILED` never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Active | Self::Failed)
    }
}

/// A unit of content indexed within exactly one store
/// (`fileSearchStores/{id}/documents/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    /// Raw state string as sent by the service; see [`Document::indexing_state`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// int64 encoded as a JSON string by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Vec<CustomMetadata>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn indexing_state(&self) -> Option<DocumentState> {
        self.state.as_deref().map(DocumentState::parse)
    }

    pub fn size(&self) -> Option<u64> {
        self.size_bytes.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentList {
    pub fn documents(&self) -> &[Document] {
        self.documents.as_deref().unwrap_or_default()
    }
}

// ============ Custom metadata ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringList {
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A key with exactly one typed value.
///
/// Serializes as `{"key": "...", "stringValue": "..."}` (or `numericValue`,
/// `stringListValue`). Input with none of the value fields is rejected.
/// Any other fields on an entry are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMetadata {
    pub key: String,
    #[serde(flatten)]
    pub value: MetadataValue,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataValue {
    StringValue(String),
    /// Kept as the JSON number that was sent, integer or float.
    NumericValue(Number),
    StringListValue(StringList),
}

impl CustomMetadata {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: MetadataValue::StringValue(value.into()),
            extra: Map::new(),
        }
    }

    pub fn numeric(key: impl Into<String>, value: impl Into<Number>) -> Self {
        Self {
            key: key.into(),
            value: MetadataValue::NumericValue(value.into()),
            extra: Map::new(),
        }
    }

    pub fn string_list(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value: MetadataValue::StringListValue(StringList {
                values,
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }
}

/// How the service splits a document into retrieval chunks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingConfig {
    #[serde(default, alias = "chunk_size", skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    #[serde(default, alias = "chunk_overlap", skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<u32>,
}

// ============ Upload & import ============

/// Everything needed to upload inline content into a store.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub mime_type: String,
    pub content: String,
    pub display_name: Option<String>,
    pub content_encoding: ContentEncoding,
    pub custom_metadata: Option<Vec<CustomMetadata>>,
    pub chunking_config: Option<ChunkingConfig>,
}

impl UploadRequest {
    /// The JSON part of the multipart body. Absent optionals are omitted,
    /// never sent as `null`.
    pub fn metadata(&self) -> UploadMetadata {
        UploadMetadata {
            mime_type: self.mime_type.clone(),
            display_name: self.display_name.clone().filter(|n| !n.is_empty()),
            custom_metadata: self.custom_metadata.clone(),
            chunking_config: self.chunking_config.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Vec<CustomMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunking_config: Option<ChunkingConfig>,
}

/// Import of an existing `files/{id}` resource into a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFileRequest {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Vec<CustomMetadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunking_config: Option<ChunkingConfig>,
}

// ============ Operations ============

/// Handle to a long-running server-side task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read-side view of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationOutcome<'a> {
    Pending,
    Failed(&'a Status),
    Succeeded(Option<&'a Value>),
}

impl Operation {
    /// Anything reported alongside `done: false` is ignored, and an error
    /// takes precedence over a response.
    pub fn outcome(&self) -> OperationOutcome<'_> {
        if !self.done {
            return OperationOutcome::Pending;
        }
        match &self.error {
            Some(status) => OperationOutcome::Failed(status),
            None => OperationOutcome::Succeeded(self.response.as_ref()),
        }
    }
}

// ============ RAG query ============

#[derive(Debug, Clone, PartialEq)]
pub struct RagQuery {
    pub query: String,
    pub store_names: Vec<String>,
    pub model: Option<String>,
    pub metadata_filter: Option<String>,
}

impl RagQuery {
    /// The model to call, falling back to [`DEFAULT_MODEL`] when unset or empty.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    pub fn to_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(self.query.clone()),
                    extra: Map::new(),
                }],
            }],
            tools: vec![RequestTool {
                file_search: FileSearch {
                    file_search_store_names: self.store_names.clone(),
                    metadata_filter: self.metadata_filter.clone().filter(|f| !f.is_empty()),
                },
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<RequestTool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTool {
    pub file_search: FileSearch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearch {
    pub file_search_store_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// Source passages the answer was grounded in.
    pub fn citations(&self) -> impl Iterator<Item = &RetrievedContext> {
        self.grounding_metadata
            .iter()
            .flat_map(|g| g.grounding_chunks.iter())
            .filter_map(|c| c.retrieved_context.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<RetrievedContext>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
