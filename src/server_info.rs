//! The `gemini://server-info` discovery resource.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::tools;

pub const SERVER_INFO_URI: &str = "gemini://server-info";
pub const SERVER_INFO_NAME: &str = "Gemini RAG Server Info";
pub const SERVER_INFO_DESCRIPTION: &str =
    "Connection status and available tools for this Gemini RAG MCP server";

/// Name the server reports to MCP clients.
pub const SERVER_NAME: &str = "gemini-file-search-rag-mcp";

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfoDocument {
    pub name: &'static str,
    pub version: &'static str,
    pub connected: bool,
    pub tools_available: usize,
    pub tool_categories: Map<String, Value>,
    pub generated_at: String,
}

/// Build a fresh document. Nothing here is cached between reads.
pub fn build(connected: bool) -> ServerInfoDocument {
    let tool_categories = tools::category_counts()
        .into_iter()
        .map(|(category, count)| (category.key().to_string(), Value::from(count)))
        .collect();

    ServerInfoDocument {
        name: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        connected,
        tools_available: tools::list().len(),
        tool_categories,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}
