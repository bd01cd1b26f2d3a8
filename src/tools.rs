//! Tool catalog: the fixed, ordered set of tools this server exposes.
//!
//! Each entry carries its invocation name, a description aimed at the
//! calling model, a JSON Schema input contract and three behavioural hints
//! (read-only, destructive, open-world). The catalog is pure data and can be
//! listed without any credential.
//!
//! | Category | Tools |
//! |----------|-------|
//! | stores | `gemini_create_store`, `gemini_list_stores`, `gemini_get_store`, `gemini_delete_store` |
//! | upload | `gemini_upload_to_store`, `gemini_import_file_to_store` |
//! | operations | `gemini_get_operation`, `gemini_get_upload_operation` |
//! | documents | `gemini_list_documents`, `gemini_get_document`, `gemini_delete_document` |
//! | rag_query | `gemini_rag_query` |

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// One of the twelve supported tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    CreateStore,
    ListStores,
    GetStore,
    DeleteStore,
    UploadToStore,
    ImportFileToStore,
    GetOperation,
    GetUploadOperation,
    ListDocuments,
    GetDocument,
    DeleteDocument,
    RagQuery,
}

impl ToolKind {
    /// All tools in catalog order.
    pub const ALL: [ToolKind; 12] = [
        ToolKind::CreateStore,
        ToolKind::ListStores,
        ToolKind::GetStore,
        ToolKind::DeleteStore,
        ToolKind::UploadToStore,
        ToolKind::ImportFileToStore,
        ToolKind::GetOperation,
        ToolKind::GetUploadOperation,
        ToolKind::ListDocuments,
        ToolKind::GetDocument,
        ToolKind::DeleteDocument,
        ToolKind::RagQuery,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::CreateStore => "gemini_create_store",
            ToolKind::ListStores => "gemini_list_stores",
            ToolKind::GetStore => "gemini_get_store",
            ToolKind::DeleteStore => "gemini_delete_store",
            ToolKind::UploadToStore => "gemini_upload_to_store",
            ToolKind::ImportFileToStore => "gemini_import_file_to_store",
            ToolKind::GetOperation => "gemini_get_operation",
            ToolKind::GetUploadOperation => "gemini_get_upload_operation",
            ToolKind::ListDocuments => "gemini_list_documents",
            ToolKind::GetDocument => "gemini_get_document",
            ToolKind::DeleteDocument => "gemini_delete_document",
            ToolKind::RagQuery => "gemini_rag_query",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn category(&self) -> ToolCategory {
        match self {
            ToolKind::CreateStore
            | ToolKind::ListStores
            | ToolKind::GetStore
            | ToolKind::DeleteStore => ToolCategory::Stores,
            ToolKind::UploadToStore | ToolKind::ImportFileToStore => ToolCategory::Upload,
            ToolKind::GetOperation | ToolKind::GetUploadOperation => ToolCategory::Operations,
            ToolKind::ListDocuments | ToolKind::GetDocument | ToolKind::DeleteDocument => {
                ToolCategory::Documents
            }
            ToolKind::RagQuery => ToolCategory::RagQuery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Stores,
    Upload,
    Operations,
    Documents,
    RagQuery,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 5] = [
        ToolCategory::Stores,
        ToolCategory::Upload,
        ToolCategory::Operations,
        ToolCategory::Documents,
        ToolCategory::RagQuery,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ToolCategory::Stores => "stores",
            ToolCategory::Upload => "upload",
            ToolCategory::Operations => "operations",
            ToolCategory::Documents => "documents",
            ToolCategory::RagQuery => "rag_query",
        }
    }
}

/// Behavioural hints surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolHints {
    #[serde(rename = "readOnlyHint")]
    pub read_only: bool,
    #[serde(rename = "destructiveHint")]
    pub destructive: bool,
    #[serde(rename = "openWorldHint")]
    pub open_world: bool,
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    #[serde(skip)]
    pub kind: ToolKind,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub annotations: ToolHints,
}

/// The full catalog in its fixed order.
pub fn list() -> &'static [ToolDescriptor] {
    static CATALOG: OnceLock<Vec<ToolDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(|| ToolKind::ALL.iter().map(|k| describe(*k)).collect())
}

pub fn find(name: &str) -> Option<&'static ToolDescriptor> {
    list().iter().find(|t| t.name == name)
}

/// Number of catalog entries per category, in [`ToolCategory::ALL`] order.
pub fn category_counts() -> Vec<(ToolCategory, usize)> {
    ToolCategory::ALL
        .iter()
        .map(|c| (*c, list().iter().filter(|t| t.kind.category() == *c).count()))
        .collect()
}

const fn hints(read_only: bool, destructive: bool, open_world: bool) -> ToolHints {
    ToolHints {
        read_only,
        destructive,
        open_world,
    }
}

fn store_name_property() -> Value {
    json!({
        "type": "string",
        "description": "Store resource name, e.g. \"fileSearchStores/abc123\""
    })
}

fn page_size_property(what: &str) -> Value {
    json!({
        "type": "number",
        "description": format!("Number of {} to return per page (default 10, max 20)", what)
    })
}

fn page_token_property() -> Value {
    json!({
        "type": "string",
        "description": "Token for next page from previous response"
    })
}

fn custom_metadata_property() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "key": { "type": "string" },
                "stringValue": { "type": "string" },
                "numericValue": { "type": "number" },
                "stringListValue": {
                    "type": "object",
                    "properties": {
                        "values": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["values"]
                }
            },
            "required": ["key"]
        },
        "description": "Custom metadata key-value pairs for filtering (max 20). Each entry sets exactly one of stringValue, numericValue or stringListValue"
    })
}

fn chunking_config_property() -> Value {
    json!({
        "type": "object",
        "properties": {
            "chunkSize": { "type": "integer", "description": "Maximum tokens per chunk" },
            "chunkOverlap": { "type": "integer", "description": "Tokens shared between neighbouring chunks" }
        },
        "description": "How the service splits the document into chunks (optional)"
    })
}

fn describe(kind: ToolKind) -> ToolDescriptor {
    let (title, description, input_schema, annotations) = match kind {
        ToolKind::CreateStore => (
            "Create Store",
            "Create a new Gemini File Search store for RAG documents. Returns the created store resource. Use this to create a knowledge base before uploading documents.",
            json!({
                "type": "object",
                "properties": {
                    "display_name": {
                        "type": "string",
                        "description": "Display name for the store (max 512 characters)",
                        "maxLength": 512
                    }
                },
                "required": ["display_name"]
            }),
            hints(false, false, false),
        ),
        ToolKind::ListStores => (
            "List Stores",
            "List all Gemini File Search stores. Returns store names, display names, and timestamps. Use to see available knowledge bases.",
            json!({
                "type": "object",
                "properties": {
                    "page_size": page_size_property("stores"),
                    "page_token": page_token_property()
                }
            }),
            hints(true, false, true),
        ),
        ToolKind::GetStore => (
            "Get Store",
            "Get details of a specific Gemini File Search store by its resource name.",
            json!({
                "type": "object",
                "properties": { "store_name": store_name_property() },
                "required": ["store_name"]
            }),
            hints(true, false, true),
        ),
        ToolKind::DeleteStore => (
            "Delete Store",
            "Delete a Gemini File Search store. Use force=true to also delete all documents inside it.",
            json!({
                "type": "object",
                "properties": {
                    "store_name": store_name_property(),
                    "force": {
                        "type": "boolean",
                        "description": "If true, cascade delete all documents in the store"
                    }
                },
                "required": ["store_name"]
            }),
            hints(false, true, false),
        ),
        ToolKind::UploadToStore => (
            "Upload to Store",
            "Upload content directly to a Gemini File Search store. Accepts text content or base64-encoded binary. For large files, use gemini_import_file_to_store instead. Returns an operation to track upload progress.",
            json!({
                "type": "object",
                "properties": {
                    "store_name": store_name_property(),
                    "mime_type": {
                        "type": "string",
                        "description": "MIME type of the content, e.g. \"text/plain\", \"application/pdf\", \"text/markdown\""
                    },
                    "content": {
                        "type": "string",
                        "description": "The content to upload. Plain text by default, or base64-encoded if content_encoding is \"base64\""
                    },
                    "display_name": {
                        "type": "string",
                        "description": "Display name for the document (optional)"
                    },
                    "content_encoding": {
                        "type": "string",
                        "enum": ["text", "base64"],
                        "description": "How the content is encoded: \"text\" (default) or \"base64\" for binary files"
                    },
                    "custom_metadata": custom_metadata_property(),
                    "chunking_config": chunking_config_property()
                },
                "required": ["store_name", "mime_type", "content"]
            }),
            hints(false, false, false),
        ),
        ToolKind::ImportFileToStore => (
            "Import File to Store",
            "Import a file from the Gemini Files API into a File Search store. Use this for large files that were uploaded separately via the Files API. Returns an operation to track import progress.",
            json!({
                "type": "object",
                "properties": {
                    "store_name": store_name_property(),
                    "file_name": {
                        "type": "string",
                        "description": "Gemini file resource name, e.g. \"files/abc-123\""
                    },
                    "custom_metadata": custom_metadata_property(),
                    "chunking_config": chunking_config_property()
                },
                "required": ["store_name", "file_name"]
            }),
            hints(false, false, false),
        ),
        ToolKind::GetOperation => (
            "Get Operation Status",
            "Check the status of a store operation (create, delete, import). Returns whether the operation is done and any error details.",
            json!({
                "type": "object",
                "properties": {
                    "operation_name": {
                        "type": "string",
                        "description": "Operation resource name, e.g. \"fileSearchStores/abc123/operations/op456\""
                    }
                },
                "required": ["operation_name"]
            }),
            hints(true, false, true),
        ),
        ToolKind::GetUploadOperation => (
            "Get Upload Operation Status",
            "Check the status of a file upload operation. Returns whether the upload is done and any error details.",
            json!({
                "type": "object",
                "properties": {
                    "operation_name": {
                        "type": "string",
                        "description": "Upload operation resource name, e.g. \"fileSearchStores/abc123/upload/operations/op789\""
                    }
                },
                "required": ["operation_name"]
            }),
            hints(true, false, true),
        ),
        ToolKind::ListDocuments => (
            "List Documents",
            "List documents in a Gemini File Search store. Returns document names, display names, state, size, and MIME types.",
            json!({
                "type": "object",
                "properties": {
                    "store_name": store_name_property(),
                    "page_size": page_size_property("documents"),
                    "page_token": page_token_property()
                },
                "required": ["store_name"]
            }),
            hints(true, false, true),
        ),
        ToolKind::GetDocument => (
            "Get Document",
            "Get details of a specific document in a File Search store, including state, size, and metadata.",
            json!({
                "type": "object",
                "properties": {
                    "document_name": {
                        "type": "string",
                        "description": "Document resource name, e.g. \"fileSearchStores/abc123/documents/doc456\""
                    }
                },
                "required": ["document_name"]
            }),
            hints(true, false, true),
        ),
        ToolKind::DeleteDocument => (
            "Delete Document",
            "Delete a document from a File Search store. Use force=true to also delete associated chunks.",
            json!({
                "type": "object",
                "properties": {
                    "document_name": {
                        "type": "string",
                        "description": "Document resource name, e.g. \"fileSearchStores/abc123/documents/doc456\""
                    },
                    "force": {
                        "type": "boolean",
                        "description": "If true, also delete associated chunks"
                    }
                },
                "required": ["document_name"]
            }),
            hints(false, true, false),
        ),
        ToolKind::RagQuery => (
            "RAG Query",
            "Query your documents using Gemini RAG. Sends a natural language query grounded in your File Search stores. Returns AI-generated answer with source citations from your documents.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural language query to search your documents"
                    },
                    "store_names": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of store resource names to search, e.g. [\"fileSearchStores/abc123\"]"
                    },
                    "model": {
                        "type": "string",
                        "description": "Gemini model to use (default: \"gemini-2.5-flash-lite\"). Options: gemini-2.5-flash-lite, gemini-2.5-flash, gemini-2.5-pro"
                    },
                    "metadata_filter": {
                        "type": "string",
                        "description": "Optional metadata filter expression (Google AIP-160 syntax)"
                    }
                },
                "required": ["query", "store_names"]
            }),
            hints(true, false, true),
        ),
    };

    ToolDescriptor {
        kind,
        name: kind.name(),
        title,
        description,
        input_schema,
        annotations,
    }
}
