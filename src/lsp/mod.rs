//! Language-server client
//!
//! - [`framing`]: `Content-Length` framed JSON-RPC on a byte stream
//! - [`message`]: classification of inbound JSON into responses,
//!   notifications and server requests
//! - [`client`]: the protocol state machine and request correlation, pure
//!   data driven by the reducer
//! - [`transport`]: the server subprocess with its reader and writer threads

pub mod client;
pub mod framing;
pub mod message;
pub mod transport;

use std::path::Path;

use lsp_types::Uri;
use thiserror::Error;

pub use client::{Dispatched, LspClient, LspState, PendingRequest, RequestContext};
pub use transport::LspProcess;

#[derive(Debug, Error)]
pub enum LspError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Percent-encoded `file://` URI for a path, made absolute against the
/// working directory. `None` if the path cannot be expressed as a file URL.
pub fn path_to_uri(path: &Path) -> Option<Uri> {
    let absolute = std::path::absolute(path).ok()?;
    let url = url::Url::from_file_path(absolute).ok()?;
    url.as_str().parse::<Uri>().ok()
}

/// Language identifier sent in `didOpen`, derived from the file extension
pub fn language_id(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "go" => "go",
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "rs" => "rust",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "java" => "java",
        "rb" => "ruby",
        "lua" => "lua",
        "md" => "markdown",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "html" => "html",
        "css" => "css",
        _ => "plaintext",
    }
}
