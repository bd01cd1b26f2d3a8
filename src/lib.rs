//! # Gemini RAG MCP
//!
//! An MCP tool server that fronts the Gemini File Search API: named
//! document stores, inline uploads and URL imports with custom metadata,
//! long-running operation polling, and grounded RAG queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌────────────┐   ┌──────────────┐
//! │  MCP client  │──▶│ McpBridge  │──▶│ Dispatcher │──▶│ GeminiClient │──▶ Gemini API
//! │ stdio / HTTP │   │ tools etc. │   │ parse+route│   │ JSON + upload│
//! └──────────────┘   └────────────┘   └────────────┘   └──────────────┘
//! ```
//!
//! The server holds no state of its own beyond configuration and a lazily
//! built HTTP client: every tool call is one request to the remote service
//! and the remote response comes back unchanged.
//!
//! ## Quick Start
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! gemini-rag-mcp tools                                  # list the catalog
//! gemini-rag-mcp call gemini_create_store --args '{"display_name":"docs"}'
//! gemini-rag-mcp serve stdio                            # attach to an MCP client
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credential resolution |
//! | [`error`] | Error type shared by client and dispatcher |
//! | [`models`] | Wire types for stores, documents, operations, queries |
//! | [`multipart`] | `multipart/related` upload bodies |
//! | [`client`] | Remote API contract and its HTTP implementation |
//! | [`tools`] | Static tool catalog |
//! | [`call`] | Typed tool invocations parsed from JSON arguments |
//! | [`dispatch`] | Routes invocations to the remote client |
//! | [`prompts`] | Workflow prompt templates |
//! | [`server_info`] | The `gemini://server-info` resource |
//! | [`mcp`] | MCP protocol bridge |
//! | [`server`] | Stdio and Streamable HTTP transports |

pub mod call;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mcp;
pub mod models;
pub mod multipart;
pub mod prompts;
pub mod server;
pub mod server_info;
pub mod tools;
