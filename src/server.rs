//! MCP server transports.
//!
//! Both transports serve the same [`McpBridge`] over one shared
//! [`Dispatcher`], so the remote client is built at most once per process.
//!
//! # Endpoints (HTTP)
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `*`    | `/mcp` | MCP Streamable HTTP (JSON-RPC) |
//! | `GET`  | `/health` | Health check (returns version and credential status) |
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based MCP
//! clients can connect.
//!
//! # Client Integration
//!
//! Stdio is the usual way to attach this server to an MCP client:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "gemini-rag": {
//!       "command": "gemini-rag-mcp",
//!       "args": ["serve", "stdio"],
//!       "env": { "GEMINI_API_KEY": "..." }
//!     }
//!   }
//! }
//! ```

use axum::{extract::State, routing::get, Json, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::mcp::McpBridge;

fn bridge(config: &Config) -> McpBridge {
    McpBridge::new(Arc::new(Dispatcher::new(config.gemini.clone())))
}

/// Serve MCP over stdin/stdout until the client disconnects.
///
/// Stdout carries protocol frames only; all logging goes to stderr.
pub async fn run_stdio(config: &Config) -> anyhow::Result<()> {
    let bridge = bridge(config);
    info!(
        configured = config.gemini.is_configured(),
        "MCP server running on stdio"
    );

    let service = bridge.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Build the HTTP application: MCP at `/mcp`, health at `/health`.
pub fn router(bridge: McpBridge) -> Router {
    let health_bridge = bridge.clone();
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .with_state(health_bridge)
        .nest_service("/mcp", mcp_service)
        .layer(cors)
}

/// Serve MCP Streamable HTTP on `[server].bind` until the process exits.
pub async fn run_http(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(bridge(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        addr = %bind_addr,
        configured = config.gemini.is_configured(),
        "MCP server listening on http://{}/mcp",
        bind_addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    connected: bool,
}

async fn handle_health(State(bridge): State<McpBridge>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connected: bridge.is_configured(),
    })
}
