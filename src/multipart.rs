//! `multipart/related` body construction for inline uploads.
//!
//! The upload endpoint takes exactly two parts, always in this order:
//!
//! ```text
//! --{boundary}\r\n
//! Content-Type: application/json\r\n
//! \r\n
//! {metadata json}\r\n
//! --{boundary}\r\n
//! Content-Type: {mime type}\r\n
//! \r\n
//! {raw bytes}\r\n
//! --{boundary}--
//! ```
//!
//! Boundaries are random (UUID v4) and checked against every byte that goes
//! into the body; a boundary that occurs in the payload is discarded and a
//! new one drawn.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BOUNDARY_PREFIX: &str = "gemini-rag-";

/// Standard alphabet, padding optional on input.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How the `content` argument of an upload is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    #[default]
    Text,
    Base64,
}

/// Turn the caller's `content` string into the bytes to upload.
///
/// Text is sent as its UTF-8 bytes. Base64 may contain ASCII whitespace
/// (line-wrapped input) and may omit its trailing padding.
pub fn decode_content(
    content: &str,
    encoding: ContentEncoding,
) -> Result<Vec<u8>, base64::DecodeError> {
    match encoding {
        ContentEncoding::Text => Ok(content.as_bytes().to_vec()),
        ContentEncoding::Base64 => {
            let compact: String = content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            LENIENT_BASE64.decode(compact)
        }
    }
}

pub fn generate_boundary() -> String {
    format!("{}{}", BOUNDARY_PREFIX, Uuid::new_v4().simple())
}

/// Draw boundaries until one occurs in none of `parts`.
pub fn boundary_avoiding(parts: &[&[u8]]) -> String {
    loop {
        let boundary = generate_boundary();
        if !parts.iter().any(|p| contains(p, boundary.as_bytes())) {
            return boundary;
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// A fully assembled `multipart/related` request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl RelatedBody {
    /// Assemble a body with a freshly drawn, collision-free boundary.
    pub fn new(metadata_json: &[u8], mime_type: &str, content: &[u8]) -> Self {
        let boundary = boundary_avoiding(&[metadata_json, mime_type.as_bytes(), content]);
        Self::with_boundary(boundary, metadata_json, mime_type, content)
    }

    /// Assemble a body around a caller-chosen boundary. The caller is
    /// responsible for the boundary not occurring in the payload.
    pub fn with_boundary(
        boundary: impl Into<String>,
        metadata_json: &[u8],
        mime_type: &str,
        content: &[u8],
    ) -> Self {
        let boundary = boundary.into();
        let prefix = format!(
            "--{b}\r\nContent-Type: application/json\r\n\r\n",
            b = boundary
        );
        let middle = format!("\r\n--{b}\r\nContent-Type: {m}\r\n\r\n", b = boundary, m = mime_type);
        let suffix = format!("\r\n--{b}--", b = boundary);

        let mut bytes = Vec::with_capacity(
            prefix.len() + metadata_json.len() + middle.len() + content.len() + suffix.len(),
        );
        bytes.extend_from_slice(prefix.as_bytes());
        bytes.extend_from_slice(metadata_json);
        bytes.extend_from_slice(middle.as_bytes());
        bytes.extend_from_slice(content);
        bytes.extend_from_slice(suffix.as_bytes());

        Self { boundary, bytes }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
