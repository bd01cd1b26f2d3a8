//! Typed tool invocations.
//!
//! A protocol-level call arrives as a tool name plus an untyped JSON object
//! with snake_case keys. [`ToolCall::parse`] resolves both once, at the
//! boundary, into one variant per tool carrying exactly the fields that tool
//! accepts. Everything downstream of the parse is fully typed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{GeminiError, Result};
use crate::models::{ChunkingConfig, CustomMetadata, ImportFileRequest, RagQuery, UploadRequest};
use crate::multipart::ContentEncoding;
use crate::tools::ToolKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    CreateStore {
        display_name: String,
    },
    ListStores {
        page_size: Option<u32>,
        page_token: Option<String>,
    },
    GetStore {
        store_name: String,
    },
    DeleteStore {
        store_name: String,
        force: bool,
    },
    UploadToStore {
        store_name: String,
        upload: UploadRequest,
    },
    ImportFileToStore {
        store_name: String,
        import: ImportFileRequest,
    },
    GetOperation {
        operation_name: String,
    },
    GetUploadOperation {
        operation_name: String,
    },
    ListDocuments {
        store_name: String,
        page_size: Option<u32>,
        page_token: Option<String>,
    },
    GetDocument {
        document_name: String,
    },
    DeleteDocument {
        document_name: String,
        force: bool,
    },
    RagQuery(RagQuery),
}

// ============ Argument shapes ============

#[derive(Deserialize)]
struct CreateStoreArgs {
    display_name: String,
}

#[derive(Deserialize)]
struct ListStoresArgs {
    #[serde(default, deserialize_with = "page_size")]
    page_size: Option<u32>,
    #[serde(default)]
    page_token: Option<String>,
}

#[derive(Deserialize)]
struct StoreArgs {
    store_name: String,
}

#[derive(Deserialize)]
struct DeleteStoreArgs {
    store_name: String,
    #[serde(default)]
    force: Option<bool>,
}

#[derive(Deserialize)]
struct UploadArgs {
    store_name: String,
    mime_type: String,
    content: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    content_encoding: Option<String>,
    #[serde(default)]
    custom_metadata: Option<Vec<CustomMetadata>>,
    #[serde(default)]
    chunking_config: Option<ChunkingConfig>,
}

#[derive(Deserialize)]
struct ImportArgs {
    store_name: String,
    file_name: String,
    #[serde(default)]
    custom_metadata: Option<Vec<CustomMetadata>>,
    #[serde(default)]
    chunking_config: Option<ChunkingConfig>,
}

#[derive(Deserialize)]
struct OperationArgs {
    operation_name: String,
}

#[derive(Deserialize)]
struct ListDocumentsArgs {
    store_name: String,
    #[serde(default, deserialize_with = "page_size")]
    page_size: Option<u32>,
    #[serde(default)]
    page_token: Option<String>,
}

#[derive(Deserialize)]
struct DocumentArgs {
    document_name: String,
}

#[derive(Deserialize)]
struct DeleteDocumentArgs {
    document_name: String,
    #[serde(default)]
    force: Option<bool>,
}

#[derive(Deserialize)]
struct RagQueryArgs {
    query: String,
    store_names: Vec<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    metadata_filter: Option<String>,
}

fn decode_args<T: DeserializeOwned>(kind: ToolKind, args: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| GeminiError::invalid_arguments(kind.name(), e.to_string()))
}

/// Only `base64` is decoded; any other value, or none, uploads the content
/// as UTF-8 text.
fn content_encoding(raw: Option<&str>) -> ContentEncoding {
    match raw {
        Some("base64") => ContentEncoding::Base64,
        _ => ContentEncoding::Text,
    }
}

/// Any JSON number is accepted and truncated; values below one mean unset.
fn page_size<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.min(u32::MAX as f64) as u32))
}

impl ToolCall {
    /// Resolve a tool name and its argument object.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::UnknownTool`] when `name` is not in the catalog.
    /// - [`GeminiError::InvalidArguments`] when a required field is missing
    ///   or a field has the wrong type.
    pub fn parse(name: &str, args: &Map<String, Value>) -> Result<Self> {
        let kind =
            ToolKind::from_name(name).ok_or_else(|| GeminiError::UnknownTool(name.to_string()))?;
        Self::parse_as(kind, args)
    }

    /// Decode the argument object of an already resolved tool.
    pub fn parse_as(kind: ToolKind, args: &Map<String, Value>) -> Result<Self> {
        let call = match kind {
            ToolKind::CreateStore => {
                let a: CreateStoreArgs = decode_args(kind, args)?;
                ToolCall::CreateStore {
                    display_name: a.display_name,
                }
            }
            ToolKind::ListStores => {
                let a: ListStoresArgs = decode_args(kind, args)?;
                ToolCall::ListStores {
                    page_size: a.page_size,
                    page_token: a.page_token,
                }
            }
            ToolKind::GetStore => {
                let a: StoreArgs = decode_args(kind, args)?;
                ToolCall::GetStore {
                    store_name: a.store_name,
                }
            }
            ToolKind::DeleteStore => {
                let a: DeleteStoreArgs = decode_args(kind, args)?;
                ToolCall::DeleteStore {
                    store_name: a.store_name,
                    force: a.force.unwrap_or(false),
                }
            }
            ToolKind::UploadToStore => {
                let a: UploadArgs = decode_args(kind, args)?;
                let content_encoding = content_encoding(a.content_encoding.as_deref());
                ToolCall::UploadToStore {
                    store_name: a.store_name,
                    upload: UploadRequest {
                        mime_type: a.mime_type,
                        content: a.content,
                        display_name: a.display_name,
                        content_encoding,
                        custom_metadata: a.custom_metadata,
                        chunking_config: a.chunking_config,
                    },
                }
            }
            ToolKind::ImportFileToStore => {
                let a: ImportArgs = decode_args(kind, args)?;
                ToolCall::ImportFileToStore {
                    store_name: a.store_name,
                    import: ImportFileRequest {
                        file_name: a.file_name,
                        custom_metadata: a.custom_metadata,
                        chunking_config: a.chunking_config,
                    },
                }
            }
            ToolKind::GetOperation => {
                let a: OperationArgs = decode_args(kind, args)?;
                ToolCall::GetOperation {
                    operation_name: a.operation_name,
                }
            }
            ToolKind::GetUploadOperation => {
                let a: OperationArgs = decode_args(kind, args)?;
                ToolCall::GetUploadOperation {
                    operation_name: a.operation_name,
                }
            }
            ToolKind::ListDocuments => {
                let a: ListDocumentsArgs = decode_args(kind, args)?;
                ToolCall::ListDocuments {
                    store_name: a.store_name,
                    page_size: a.page_size,
                    page_token: a.page_token,
                }
            }
            ToolKind::GetDocument => {
                let a: DocumentArgs = decode_args(kind, args)?;
                ToolCall::GetDocument {
                    document_name: a.document_name,
                }
            }
            ToolKind::DeleteDocument => {
                let a: DeleteDocumentArgs = decode_args(kind, args)?;
                ToolCall::DeleteDocument {
                    document_name: a.document_name,
                    force: a.force.unwrap_or(false),
                }
            }
            ToolKind::RagQuery => {
                let a: RagQueryArgs = decode_args(kind, args)?;
                ToolCall::RagQuery(RagQuery {
                    query: a.query,
                    store_names: a.store_names,
                    model: a.model,
                    metadata_filter: a.metadata_filter,
                })
            }
        };

        Ok(call)
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::CreateStore { .. } => ToolKind::CreateStore,
            ToolCall::ListStores { .. } => ToolKind::ListStores,
            ToolCall::GetStore { .. } => ToolKind::GetStore,
            ToolCall::DeleteStore { .. } => ToolKind::DeleteStore,
            ToolCall::UploadToStore { .. } => ToolKind::UploadToStore,
            ToolCall::ImportFileToStore { .. } => ToolKind::ImportFileToStore,
            ToolCall::GetOperation { .. } => ToolKind::GetOperation,
            ToolCall::GetUploadOperation { .. } => ToolKind::GetUploadOperation,
            ToolCall::ListDocuments { .. } => ToolKind::ListDocuments,
            ToolCall::GetDocument { .. } => ToolKind::GetDocument,
            ToolCall::DeleteDocument { .. } => ToolKind::DeleteDocument,
            ToolCall::RagQuery(_) => ToolKind::RagQuery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolCall::parse("gemini_drop_everything", &Map::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTool);
        assert!(err.to_string().contains("gemini_drop_everything"));
    }

    #[test]
    fn test_missing_required_field_is_bad_input() {
        let err = ToolCall::parse("gemini_get_store", &Map::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
        assert!(err.to_string().contains("store_name"));
    }

    #[test]
    fn test_wrong_type_is_bad_input() {
        let err = ToolCall::parse(
            "gemini_rag_query",
            &args(json!({ "query": "q", "store_names": "fileSearchStores/a" })),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
    }

    #[test]
    fn test_delete_force_defaults_false() {
        let call = ToolCall::parse(
            "gemini_delete_store",
            &args(json!({ "store_name": "fileSearchStores/abc123" })),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::DeleteStore {
                store_name: "fileSearchStores/abc123".to_string(),
                force: false
            }
        );

        let call = ToolCall::parse(
            "gemini_delete_document",
            &args(json!({ "document_name": "fileSearchStores/a/documents/d", "force": null })),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::DeleteDocument {
                document_name: "fileSearchStores/a/documents/d".to_string(),
                force: false
            }
        );
    }

    #[test]
    fn test_upload_remaps_and_defaults_encoding() {
        let call = ToolCall::parse(
            "gemini_upload_to_store",
            &args(json!({
                "store_name": "fileSearchStores/abc123",
                "mime_type": "text/plain",
                "content": "hello"
            })),
        )
        .unwrap();
        match call {
            ToolCall::UploadToStore { store_name, upload } => {
                assert_eq!(store_name, "fileSearchStores/abc123");
                assert_eq!(upload.mime_type, "text/plain");
                assert_eq!(upload.content, "hello");
                assert_eq!(upload.content_encoding, ContentEncoding::Text);
                assert!(upload.display_name.is_none());
                assert!(upload.custom_metadata.is_none());
                assert!(upload.chunking_config.is_none());
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_upload_full_arguments() {
        let call = ToolCall::parse(
            "gemini_upload_to_store",
            &args(json!({
                "store_name": "fileSearchStores/abc123",
                "mime_type": "application/pdf",
                "content": "JVBERi0=",
                "display_name": "Report",
                "content_encoding": "base64",
                "custom_metadata": [{ "key": "year", "numericValue": 2024 }],
                "chunking_config": { "chunk_size": 256, "chunk_overlap": 32 }
            })),
        )
        .unwrap();
        let ToolCall::UploadToStore { upload, .. } = call else {
            panic!("expected upload");
        };
        assert_eq!(upload.content_encoding, ContentEncoding::Base64);
        assert_eq!(upload.display_name.as_deref(), Some("Report"));
        assert_eq!(
            upload.custom_metadata,
            Some(vec![CustomMetadata::numeric("year", 2024)])
        );
        assert_eq!(
            upload.chunking_config,
            Some(ChunkingConfig {
                chunk_size: Some(256),
                chunk_overlap: Some(32)
            })
        );
    }

    #[test]
    fn test_upload_unrecognised_encoding_is_text() {
        for encoding in ["utf-8", "hex", "", "BASE64"] {
            let call = ToolCall::parse(
                "gemini_upload_to_store",
                &args(json!({
                    "store_name": "s", "mime_type": "text/plain", "content": "aGk=",
                    "content_encoding": encoding
                })),
            )
            .unwrap();
            let ToolCall::UploadToStore { upload, .. } = call else {
                panic!("expected upload");
            };
            assert_eq!(upload.content_encoding, ContentEncoding::Text, "{}", encoding);
            assert_eq!(upload.content, "aGk=");
        }
    }

    #[test]
    fn test_page_size_accepts_any_number() {
        let parse = |value: Value| {
            match ToolCall::parse("gemini_list_stores", &args(json!({ "page_size": value }))).unwrap() {
                ToolCall::ListStores { page_size, .. } => page_size,
                other => panic!("unexpected call {:?}", other),
            }
        };
        assert_eq!(parse(json!(10)), Some(10));
        assert_eq!(parse(json!(10.0)), Some(10));
        assert_eq!(parse(json!(7.9)), Some(7));
        assert_eq!(parse(json!(0)), None);
        assert_eq!(parse(json!(-3)), None);
        assert_eq!(parse(Value::Null), None);

        let err = ToolCall::parse(
            "gemini_list_documents",
            &args(json!({ "store_name": "s", "page_size": "ten" })),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
    }

    #[test]
    fn test_rag_query_remaps_store_names() {
        let call = ToolCall::parse(
            "gemini_rag_query",
            &args(json!({
                "query": "summarize",
                "store_names": ["fileSearchStores/a", "fileSearchStores/b"],
                "metadata_filter": "year > 2020"
            })),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::RagQuery(RagQuery {
                query: "summarize".to_string(),
                store_names: vec!["fileSearchStores/a".to_string(), "fileSearchStores/b".to_string()],
                model: None,
                metadata_filter: Some("year > 2020".to_string()),
            })
        );
        assert_eq!(call.kind(), ToolKind::RagQuery);
    }

    #[test]
    fn test_every_catalog_tool_parses_with_required_fields() {
        let samples = json!({
            "display_name": "Notes",
            "store_name": "fileSearchStores/s",
            "mime_type": "text/plain",
            "content": "c",
            "file_name": "files/f",
            "operation_name": "fileSearchStores/s/operations/o",
            "document_name": "fileSearchStores/s/documents/d",
            "query": "q",
            "store_names": ["fileSearchStores/s"]
        });
        for tool in crate::tools::list() {
            let mut map = Map::new();
            if let Some(required) = tool.input_schema["required"].as_array() {
                for field in required {
                    let field = field.as_str().unwrap();
                    map.insert(field.to_string(), samples[field].clone());
                }
            }
            let call = ToolCall::parse(tool.name, &map).unwrap();
            assert_eq!(call.kind(), tool.kind);
        }
    }
}
