//! Protocol state machine and request correlation
//!
//! The client never touches the transport: every operation returns the JSON
//! message to send, and the reducer wraps it in a send command. That keeps the
//! whole handshake testable without a server process.

use std::collections::HashMap;

use lsp_types::{
    ClientCapabilities, CompletionClientCapabilities, CompletionItemCapability, CompletionParams,
    CompletionResponse, DiagnosticSeverity, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, InitializeParams, Position,
    PublishDiagnosticsClientCapabilities, PublishDiagnosticsParams,
    TextDocumentClientCapabilities, TextDocumentContentChangeEvent, TextDocumentIdentifier,
    TextDocumentItem, TextDocumentPositionParams, TextDocumentSyncClientCapabilities, Uri,
    VersionedTextDocumentIdentifier, WorkspaceFolder,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::message::{self, Inbound, ResponseError};
use crate::model::session::PaneId;

/// Lifecycle of the server session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LspState {
    #[default]
    NotStarted,
    /// Process launch requested
    Starting,
    /// `initialize` sent, waiting for its response
    Initializing,
    Ready,
    /// Unavailable for the rest of the session
    Stopped,
}

/// What a request was for, so its response can be checked against the
/// current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContext {
    Initialize,
    Completion {
        uri: Uri,
        pane: PaneId,
        revision: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub method: String,
    pub context: RequestContext,
}

/// Sync state of a document announced with `didOpen`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub uri: Uri,
    pub version: i32,
    /// Pane and buffer revision last sent
    pub synced: (PaneId, u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub character: u32,
    pub severity: Option<DiagnosticSeverity>,
    pub message: String,
}

impl From<lsp_types::Diagnostic> for Diagnostic {
    fn from(diagnostic: lsp_types::Diagnostic) -> Self {
        Self {
            line: diagnostic.range.start.line,
            character: diagnostic.range.start.character,
            severity: diagnostic.severity,
            message: diagnostic.message,
        }
    }
}

/// Outcome of feeding one inbound message to the client
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Correlated response; the pending entry has been removed
    Response {
        request: PendingRequest,
        result: Result<Value, ResponseError>,
    },
    /// Response to an id we never issued or already answered
    Unmatched,
    Notification { method: String, params: Value },
    /// Server request; `reply` must be sent back
    ServerRequest { method: String, reply: Value },
}

/// Documents and diagnostics are keyed by the URI's string form
#[derive(Debug, Clone, Default)]
pub struct LspClient {
    pub state: LspState,
    pub root_uri: Option<Uri>,
    next_id: i64,
    pending: HashMap<i64, PendingRequest>,
    documents: HashMap<String, OpenDocument>,
    diagnostics: HashMap<String, Vec<Diagnostic>>,
}

impl LspClient {
    pub fn new(root_uri: Option<Uri>) -> Self {
        Self {
            root_uri,
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == LspState::Ready
    }

    pub fn mark_starting(&mut self) {
        if self.state == LspState::NotStarted {
            self.state = LspState::Starting;
        }
    }

    /// Permanently disable the client
    pub fn stop(&mut self) {
        self.state = LspState::Stopped;
        self.pending.clear();
        self.documents.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Assign the next id and remember the request
    pub fn request(&mut self, method: &str, params: Value, context: RequestContext) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(
            id,
            PendingRequest {
                method: method.to_string(),
                context,
            },
        );
        message::request(id, method, params)
    }

    /// Build the `initialize` request and move to `Initializing`
    #[allow(deprecated)]
    pub fn initialize(&mut self, process_id: u32) -> Value {
        self.state = LspState::Initializing;
        let workspace_folders = self.root_uri.clone().map(|uri| {
            let name = uri
                .as_str()
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            vec![WorkspaceFolder { uri, name }]
        });
        let params = InitializeParams {
            process_id: Some(process_id),
            // still read by servers that predate workspace folders
            root_uri: self.root_uri.clone(),
            workspace_folders,
            capabilities: client_capabilities(),
            ..Default::default()
        };
        self.request("initialize", to_params(params), RequestContext::Initialize)
    }

    /// Handshake finished: become `Ready` and return the `initialized`
    /// notification
    pub fn complete_initialize(&mut self) -> Value {
        self.state = LspState::Ready;
        message::notification("initialized", json!({}))
    }

    /// Feed one inbound message
    pub fn dispatch(&mut self, inbound: Inbound) -> Dispatched {
        match inbound {
            Inbound::Response { id, result } => {
                let request = id.as_i64().and_then(|id| self.pending.remove(&id));
                match request {
                    Some(request) => Dispatched::Response { request, result },
                    None => {
                        tracing::warn!(%id, "Dropping response with unknown request id");
                        Dispatched::Unmatched
                    }
                }
            }
            Inbound::Notification { method, params } => {
                if method == "textDocument/publishDiagnostics" {
                    self.store_diagnostics(&params);
                }
                Dispatched::Notification { method, params }
            }
            Inbound::Request { id, method, .. } => {
                tracing::debug!(%method, "Answering server request with null");
                Dispatched::ServerRequest {
                    method,
                    reply: message::response(id, Value::Null),
                }
            }
        }
    }

    /// `didOpen` for a document not yet announced, version 1
    pub fn did_open(
        &mut self,
        uri: &Uri,
        language_id: &str,
        text: &str,
        synced: (PaneId, u64),
    ) -> Option<Value> {
        if !self.is_ready() || self.documents.contains_key(uri.as_str()) {
            return None;
        }
        self.documents.insert(
            uri.as_str().to_string(),
            OpenDocument {
                uri: uri.clone(),
                version: 1,
                synced,
            },
        );
        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: language_id.to_string(),
                version: 1,
                text: text.to_string(),
            },
        };
        Some(message::notification("textDocument/didOpen", to_params(params)))
    }

    /// Full-text `didChange` if the buffer moved on since the last sync
    pub fn did_change(&mut self, uri: &Uri, text: &str, synced: (PaneId, u64)) -> Option<Value> {
        if !self.is_ready() {
            return None;
        }
        let doc = self.documents.get_mut(uri.as_str())?;
        if doc.synced == synced {
            return None;
        }
        doc.version += 1;
        doc.synced = synced;
        let params = DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: doc.version,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: text.to_string(),
            }],
        };
        Some(message::notification("textDocument/didChange", to_params(params)))
    }

    /// `didClose` for an announced document; it may be opened again later
    pub fn did_close(&mut self, uri: &Uri) -> Option<Value> {
        if !self.is_ready() {
            return None;
        }
        let doc = self.documents.remove(uri.as_str())?;
        self.diagnostics.remove(uri.as_str());
        let params = DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: doc.uri },
        };
        Some(message::notification("textDocument/didClose", to_params(params)))
    }

    /// `textDocument/completion` at a UTF-16 position
    pub fn completion(
        &mut self,
        uri: Uri,
        position: Position,
        pane: PaneId,
        revision: u64,
    ) -> Value {
        let params = CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position,
            },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: None,
        };
        let context = RequestContext::Completion {
            uri,
            pane,
            revision,
        };
        self.request("textDocument/completion", to_params(params), context)
    }

    pub fn document(&self, uri: &Uri) -> Option<&OpenDocument> {
        self.documents.get(uri.as_str())
    }

    /// Every document announced with `didOpen` and not yet closed
    pub fn open_documents(&self) -> impl Iterator<Item = &OpenDocument> {
        self.documents.values()
    }

    pub fn diagnostics(&self, uri: &Uri) -> &[Diagnostic] {
        self.diagnostics
            .get(uri.as_str())
            .map_or(&[][..], Vec::as_slice)
    }

    fn store_diagnostics(&mut self, params: &Value) {
        let published: PublishDiagnosticsParams = match serde_json::from_value(params.clone()) {
            Ok(published) => published,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed publishDiagnostics");
                return;
            }
        };
        let list = published.diagnostics.into_iter().map(Diagnostic::from).collect();
        self.diagnostics
            .insert(published.uri.as_str().to_string(), list);
    }
}

fn client_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        text_document: Some(TextDocumentClientCapabilities {
            synchronization: Some(TextDocumentSyncClientCapabilities {
                did_save: Some(false),
                ..Default::default()
            }),
            completion: Some(CompletionClientCapabilities {
                completion_item: Some(CompletionItemCapability {
                    snippet_support: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            publish_diagnostics: Some(PublishDiagnosticsClientCapabilities::default()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn to_params<T: Serialize>(params: T) -> Value {
    serde_json::to_value(params).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize request params");
        Value::Null
    })
}

/// Labels from a `textDocument/completion` result (`CompletionList` or a
/// bare array). A null or malformed result yields nothing.
pub fn completion_labels(result: &Value) -> Vec<(String, String)> {
    let items = match serde_json::from_value::<Option<CompletionResponse>>(result.clone()) {
        Ok(Some(CompletionResponse::Array(items))) => items,
        Ok(Some(CompletionResponse::List(list))) => list.items,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed completion result");
            Vec::new()
        }
    };
    items
        .into_iter()
        .map(|item| {
            let insert = item.insert_text.unwrap_or_else(|| item.label.clone());
            (item.label, insert)
        })
        .collect()
}
