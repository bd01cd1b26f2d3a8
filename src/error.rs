//! Error types for tool dispatch and remote calls.
//!
//! Errors stay structured until the MCP boundary, where they are rendered
//! to text with [`std::fmt::Display`]. Remote failures carry the HTTP status
//! and the raw response body verbatim; no attempt is made to classify them
//! further.

use thiserror::Error;

/// Result type alias for dispatch and client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Coarse category of a [`GeminiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No credential was configured.
    Configuration,
    /// The tool name is not in the catalog.
    UnknownTool,
    /// Arguments did not match the tool's input contract.
    BadInput,
    /// The remote service answered with a non-success status.
    Remote,
    /// The request never produced a usable response.
    Transport,
}

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Missing required configuration: {missing}. Set it before using any tools.")]
    NotConfigured { missing: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Gemini API Error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Gemini Upload Error ({status}): {body}")]
    Upload { status: u16, body: String },

    #[error("Invalid base64 content: {0}")]
    ContentDecode(#[from] base64::DecodeError),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeminiError {
    pub fn not_configured(missing: impl Into<String>) -> Self {
        Self::NotConfigured {
            missing: missing.into(),
        }
    }

    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured { .. } => ErrorKind::Configuration,
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::InvalidArguments { .. } | Self::ContentDecode(_) => ErrorKind::BadInput,
            Self::Api { .. } | Self::Upload { .. } => ErrorKind::Remote,
            Self::Transport(_) | Self::Json(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status of a remote rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Upload { status, .. } => Some(*status),
            _ => None,
        }
    }
}
