//! Tool dispatch: one invocation in, one remote call out.
//!
//! The [`Dispatcher`] owns the configuration and, once first needed, the
//! remote client. Listing tools never touches the client, so it works with
//! no credential configured; every other call builds the client on first
//! use and reuses it for the rest of the process.
//!
//! Dispatch is a one-shot forward: no retries, no caching of results, no
//! reordering. The remote response is returned as JSON unchanged.

use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

use crate::call::ToolCall;
use crate::client::{FileSearchApi, GeminiClient};
use crate::config::GeminiConfig;
use crate::error::{GeminiError, Result};
use crate::tools::{self, ToolDescriptor, ToolKind};

pub struct Dispatcher {
    config: GeminiConfig,
    backend: OnceLock<Arc<dyn FileSearchApi>>,
}

impl Dispatcher {
    /// Create a dispatcher that will build a [`GeminiClient`] lazily.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            backend: OnceLock::new(),
        }
    }

    /// Create a dispatcher around an already constructed backend.
    pub fn with_backend(backend: Arc<dyn FileSearchApi>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(backend);
        Self {
            config: GeminiConfig::default(),
            backend: cell,
        }
    }

    /// Whether tool calls can reach the remote service.
    pub fn is_configured(&self) -> bool {
        self.backend.get().is_some() || self.config.is_configured()
    }

    pub fn list_tools(&self) -> &'static [ToolDescriptor] {
        tools::list()
    }

    /// Get the backend, building the HTTP client on first use.
    ///
    /// A failed build caches nothing, so a later call tries again.
    fn backend(&self) -> Result<&dyn FileSearchApi> {
        if let Some(backend) = self.backend.get() {
            return Ok(backend.as_ref());
        }
        let client = GeminiClient::new(&self.config)?;
        info!(base_url = %self.config.base_url, "Gemini client initialized");
        Ok(self.backend.get_or_init(|| Arc::new(client)).as_ref())
    }

    /// Resolve, check the credential, parse, then forward one call.
    ///
    /// An unknown tool is reported by name first. Any known tool then needs a
    /// credential before its arguments are looked at, so an unconfigured
    /// server always answers with a configuration error.
    pub async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<Value> {
        let kind =
            ToolKind::from_name(name).ok_or_else(|| GeminiError::UnknownTool(name.to_string()))?;
        let api = self.backend()?;
        let call = ToolCall::parse_as(kind, args)?;
        route(api, call).await
    }
}

/// Forward to the matching remote operation and return its JSON untouched.
async fn route(api: &dyn FileSearchApi, call: ToolCall) -> Result<Value> {
    debug!(tool = call.kind().name(), "dispatching tool call");

    match call {
        ToolCall::CreateStore { display_name } => api.create_store(&display_name).await,
        ToolCall::ListStores {
            page_size,
            page_token,
        } => api.list_stores(page_size, page_token.as_deref()).await,
        ToolCall::GetStore { store_name } => api.get_store(&store_name).await,
        ToolCall::DeleteStore { store_name, force } => api.delete_store(&store_name, force).await,
        ToolCall::UploadToStore { store_name, upload } => {
            api.upload_to_store(&store_name, &upload).await
        }
        ToolCall::ImportFileToStore { store_name, import } => {
            api.import_file_to_store(&store_name, &import).await
        }
        ToolCall::GetOperation { operation_name } => api.get_operation(&operation_name).await,
        ToolCall::GetUploadOperation { operation_name } => {
            api.get_upload_operation(&operation_name).await
        }
        ToolCall::ListDocuments {
            store_name,
            page_size,
            page_token,
        } => {
            api.list_documents(&store_name, page_size, page_token.as_deref())
                .await
        }
        ToolCall::GetDocument { document_name } => api.get_document(&document_name).await,
        ToolCall::DeleteDocument {
            document_name,
            force,
        } => api.delete_document(&document_name, force).await,
        ToolCall::RagQuery(query) => api.rag_query(&query).await,
    }
}
