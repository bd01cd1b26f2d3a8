//! # Gemini RAG MCP CLI (`gemini-rag-mcp`)
//!
//! Runs the MCP server and offers a few direct commands for inspecting the
//! catalog and making one-off tool calls from a shell.
//!
//! ## Usage
//!
//! ```bash
//! gemini-rag-mcp --config ./config/gemini-rag.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `gemini-rag-mcp serve stdio` | Serve MCP over stdin/stdout |
//! | `gemini-rag-mcp serve http` | Serve MCP Streamable HTTP on `[server].bind` |
//! | `gemini-rag-mcp tools` | Print the tool catalog |
//! | `gemini-rag-mcp call <tool> --args '<json>'` | Run one tool call |
//! | `gemini-rag-mcp info` | Print the server-info resource |
//!
//! ## Examples
//!
//! ```bash
//! # Create a store and upload a note into it
//! gemini-rag-mcp call gemini_create_store --args '{"display_name":"notes"}'
//! gemini-rag-mcp call gemini_upload_to_store --args \
//!   '{"store_name":"fileSearchStores/abc","content":"hello","mime_type":"text/plain"}'
//!
//! # Ask a grounded question
//! gemini-rag-mcp call gemini_rag_query --args \
//!   '{"query":"what did I note?","store_names":["fileSearchStores/abc"]}'
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gemini_rag_mcp::config;
use gemini_rag_mcp::dispatch::Dispatcher;
use gemini_rag_mcp::mcp::McpBridge;
use gemini_rag_mcp::server;

/// MCP server for Gemini File Search stores and grounded RAG queries.
///
/// The API key is read from `GEMINI_API_KEY` (or `[gemini].api_key` in the
/// config file). Listing tools works without one.
#[derive(Parser)]
#[command(
    name = "gemini-rag-mcp",
    about = "MCP server for Gemini File Search stores and grounded RAG queries",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/gemini-rag.toml`. A missing file is not an
    /// error; built-in defaults are used instead.
    #[arg(long, global = true, default_value = "./config/gemini-rag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server.
    Serve {
        #[command(subcommand)]
        transport: ServeTransport,
    },

    /// Print the tool catalog as JSON.
    Tools,

    /// Run a single tool call and print its result as JSON.
    Call {
        /// Tool name, e.g. `gemini_list_stores`.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Print the server-info resource.
    Info,
}

/// Server transports.
#[derive(Subcommand)]
enum ServeTransport {
    /// Serve MCP over stdin/stdout.
    Stdio,
    /// Serve MCP Streamable HTTP at `/mcp` on `[server].bind`.
    Http,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_args(raw: &str) -> anyhow::Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("--args must be valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("--args must be a JSON object"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { transport } => match transport {
            ServeTransport::Stdio => server::run_stdio(&cfg).await?,
            ServeTransport::Http => server::run_http(&cfg).await?,
        },
        Commands::Tools => {
            let dispatcher = Dispatcher::new(cfg.gemini);
            println!("{}", serde_json::to_string_pretty(dispatcher.list_tools())?);
        }
        Commands::Call { tool, args } => {
            let args = parse_args(&args)?;
            let dispatcher = Dispatcher::new(cfg.gemini);
            match dispatcher.dispatch(&tool, &args).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Info => {
            let bridge = McpBridge::new(Arc::new(Dispatcher::new(cfg.gemini)));
            println!("{}", bridge.server_info_json());
        }
    }

    Ok(())
}
