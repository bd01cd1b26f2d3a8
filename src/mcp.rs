//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`Dispatcher`] to the MCP server role so any MCP client can
//! reach the File Search tools over stdio or Streamable HTTP.
//!
//! * **Tools** come from the static catalog via `list_tools` / `call_tool`.
//! * **Prompts** are the two workflow guides in [`crate::prompts`].
//! * **Resources** expose the `gemini://server-info` document.
//!
//! Tool failures (unknown tool, bad arguments, missing credential, remote
//! errors) are reported in-band as an error result with the text
//! `Error: <message>`, never as protocol errors.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};
use serde_json::{Map, Value};
use tracing::warn;

use crate::dispatch::Dispatcher;
use crate::prompts::{self, PromptTemplate};
use crate::server_info::{self, SERVER_INFO_URI};
use crate::tools::{self, ToolDescriptor};

/// Each MCP session receives a clone; all of them share one dispatcher
/// and so one lazily built remote client.
#[derive(Clone)]
pub struct McpBridge {
    dispatcher: Arc<Dispatcher>,
}

impl McpBridge {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Run one tool call and shape the outcome the way MCP clients see it.
    pub async fn call(&self, name: &str, args: &Map<String, Value>) -> CallToolResult {
        match self.dispatcher.dispatch(name, args).await {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result).unwrap_or_default();
                CallToolResult::success(vec![Content::text(text)])
            }
            Err(e) => {
                warn!(tool = name, kind = ?e.kind(), "tool call failed: {}", e);
                CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.dispatcher.is_configured()
    }

    /// Body of the server-info resource as pretty JSON.
    pub fn server_info_json(&self) -> String {
        let doc = server_info::build(self.dispatcher.is_configured());
        serde_json::to_string_pretty(&doc).unwrap_or_default()
    }

    fn to_mcp_tool(descriptor: &ToolDescriptor) -> Tool {
        let input_schema = match &descriptor.input_schema {
            Value::Object(map) => Arc::new(map.clone()),
            _ => Arc::new(Map::new()),
        };
        let hints = descriptor.annotations;

        Tool {
            name: Cow::Borrowed(descriptor.name),
            title: None,
            description: Some(Cow::Borrowed(descriptor.description)),
            input_schema,
            output_schema: None,
            annotations: Some(
                ToolAnnotations::with_title(descriptor.title)
                    .read_only(hints.read_only)
                    .destructive(hints.destructive)
                    .open_world(hints.open_world),
            ),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    fn to_mcp_prompt(template: &PromptTemplate) -> Prompt {
        Prompt {
            name: template.name.to_string(),
            title: None,
            description: Some(template.description.to_string()),
            arguments: None,
            icons: None,
            meta: None,
        }
    }

    fn server_info_resource() -> Resource {
        let mut raw = RawResource::new(SERVER_INFO_URI, server_info::SERVER_INFO_NAME);
        raw.description = Some(server_info::SERVER_INFO_DESCRIPTION.to_string());
        raw.mime_type = Some("application/json".to_string());
        raw.no_annotation()
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: server_info::SERVER_NAME.to_string(),
                title: Some("Gemini File Search RAG".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage Gemini File Search stores, upload or import documents, poll \
                 long-running operations and run grounded RAG queries. Start with \
                 gemini_list_stores. Upload and import return operations that must be \
                 polled until done."
                    .to_string(),
            ),
        }
    }

    // ── Tools ────────────────────────────────────────────────────────────

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .dispatcher
            .list_tools()
            .iter()
            .map(Self::to_mcp_tool)
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        tools::find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();
        Ok(self.call(&request.name, &args).await)
    }

    // ── Prompts ──────────────────────────────────────────────────────────

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        let prompts: Vec<Prompt> = prompts::list().iter().map(Self::to_mcp_prompt).collect();
        std::future::ready(Ok(ListPromptsResult::with_all_items(prompts)))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let template = prompts::find(&request.name).ok_or_else(|| {
            McpError::invalid_params(format!("Unknown prompt: {}", request.name), None)
        })?;

        Ok(GetPromptResult {
            description: Some(template.description.to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                template.text(),
            )],
        })
    }

    // ── Resources ────────────────────────────────────────────────────────

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(vec![
            Self::server_info_resource(),
        ])))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if request.uri != SERVER_INFO_URI {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {}", request.uri),
                None,
            ));
        }

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(
                self.server_info_json(),
                SERVER_INFO_URI,
            )],
        })
    }
}
