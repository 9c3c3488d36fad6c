//! Language-server message handlers
//!
//! Frames arrive one at a time; each handled frame re-arms the wait for the
//! next one, so the reducer never blocks on the server.

use std::collections::HashSet;

use lsp_types::Uri;
use serde_json::Value;

use crate::commands::Cmd;
use crate::lsp::{self, framing, message::Inbound, Dispatched, RequestContext};
use crate::messages::LspMsg;
use crate::model::{AppModel, PaneId};

use super::completion;

fn send(message: &Value) -> Cmd {
    Cmd::LspSend {
        frame: framing::encode(message),
    }
}

/// Handle language-server transport messages
pub fn update_lsp(model: &mut AppModel, msg: LspMsg) -> Option<Cmd> {
    match msg {
        LspMsg::Started(Ok(channel)) => {
            let initialize = model.lsp.initialize(std::process::id());
            Some(Cmd::batch(vec![
                send(&initialize),
                Cmd::AwaitLspFrame { channel },
            ]))
        }
        LspMsg::Started(Err(e)) => {
            tracing::warn!(error = %e, "Language server unavailable, continuing without it");
            model.lsp.stop();
            None
        }
        LspMsg::Frame { frame, channel } => {
            let handled = handle_frame(model, frame);
            Some(Cmd::batch(vec![
                handled.unwrap_or_default(),
                Cmd::AwaitLspFrame { channel },
            ]))
        }
        LspMsg::Closed => {
            tracing::info!("Language server stopped");
            model.lsp.stop();
            Some(Cmd::Redraw)
        }
    }
}

fn handle_frame(model: &mut AppModel, frame: Value) -> Option<Cmd> {
    let inbound = match Inbound::classify(frame) {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed server message");
            return None;
        }
    };

    match model.lsp.dispatch(inbound) {
        Dispatched::Response { request, result } => match (request.context, result) {
            (RequestContext::Initialize, Ok(_)) => {
                let initialized = model.lsp.complete_initialize();
                tracing::info!("Language server ready");
                let mut cmds = vec![send(&initialized)];
                cmds.extend(announce_open_buffers(model));
                Some(Cmd::batch(cmds))
            }
            (RequestContext::Initialize, Err(e)) => {
                tracing::warn!(code = e.code, message = %e.message, "Initialize rejected");
                model.lsp.stop();
                None
            }
            (RequestContext::Completion { pane, revision, .. }, Ok(result)) => {
                completion::apply_server_items(model, pane, revision, &result)
                    .then_some(Cmd::Redraw)
            }
            (RequestContext::Completion { .. }, Err(e)) => {
                tracing::debug!(message = %e.message, "Completion request failed");
                None
            }
        },
        Dispatched::Unmatched => None,
        Dispatched::Notification { method, .. } => {
            (method == "textDocument/publishDiagnostics").then_some(Cmd::Redraw)
        }
        Dispatched::ServerRequest { reply, .. } => Some(send(&reply)),
    }
}

/// `didOpen` for every buffer with a path, once per document
pub fn announce_open_buffers(model: &mut AppModel) -> Vec<Cmd> {
    let docs: Vec<(Uri, &'static str, String, (PaneId, u64))> = model
        .session
        .panes()
        .filter_map(|pane| {
            let path = pane.buffer.path.as_deref()?;
            Some((
                lsp::path_to_uri(path)?,
                lsp::language_id(path),
                pane.buffer.text(),
                (pane.id, pane.buffer.revision),
            ))
        })
        .collect();

    docs.into_iter()
        .filter_map(|(uri, language, text, synced)| {
            model.lsp.did_open(&uri, language, &text, synced)
        })
        .map(|notification| send(&notification))
        .collect()
}

/// Bring the server's copy of one pane's document up to date
pub fn sync_pane(model: &mut AppModel, pane_id: PaneId) -> Option<Cmd> {
    if !model.lsp.is_ready() {
        return None;
    }
    let pane = model.session.panes().find(|p| p.id == pane_id)?;
    let path = pane.buffer.path.as_deref()?;
    let uri = lsp::path_to_uri(path)?;
    let synced = (pane.id, pane.buffer.revision);

    let last_synced = model.lsp.document(&uri).map(|doc| doc.synced);
    let notification = match last_synced {
        Some(last) if last == synced => return None,
        Some(_) => {
            let text = pane.buffer.text();
            model.lsp.did_change(&uri, &text, synced)
        }
        None => {
            let language = lsp::language_id(path);
            let text = pane.buffer.text();
            model.lsp.did_open(&uri, language, &text, synced)
        }
    }?;
    Some(send(&notification))
}

/// `didClose` for documents no pane shows any more, whether the pane was
/// closed or its buffer now has another path
fn close_orphaned_documents(model: &mut AppModel) -> Vec<Cmd> {
    let shown: HashSet<String> = model
        .session
        .panes()
        .filter_map(|pane| lsp::path_to_uri(pane.buffer.path.as_deref()?))
        .map(|uri| uri.as_str().to_string())
        .collect();
    let orphaned: Vec<Uri> = model
        .lsp
        .open_documents()
        .filter(|doc| !shown.contains(doc.uri.as_str()))
        .map(|doc| doc.uri.clone())
        .collect();

    orphaned
        .iter()
        .filter_map(|uri| model.lsp.did_close(uri))
        .map(|notification| send(&notification))
        .collect()
}

/// Run after every update: edits only ever happen in the active pane
pub fn sync_documents(model: &mut AppModel) -> Option<Cmd> {
    if !model.lsp.is_ready() {
        return None;
    }
    let mut cmds = close_orphaned_documents(model);
    let active = model.session.active_pane().id;
    cmds.extend(sync_pane(model, active));
    let cmd = Cmd::batch(cmds);
    (!cmd.is_none()).then_some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::lsp::LspState;
    use crate::messages::stream_channel;
    use crate::model::Buffer;
    use serde_json::json;
    use std::path::PathBuf;

    fn started_model() -> (AppModel, Value) {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        *model.buffer_mut() = Buffer::from_text("package main").with_path("/work/main.go");
        model.lsp.mark_starting();
        let (_tx, channel) = stream_channel::<Value>();
        let cmd = update_lsp(&mut model, LspMsg::Started(Ok(channel))).unwrap();
        let frames = sent_frames(cmd);
        assert_eq!(frames[0]["method"], "initialize");
        (model, frames[0].clone())
    }

    fn sent_frames(cmd: Cmd) -> Vec<Value> {
        cmd.flatten()
            .into_iter()
            .filter_map(|c| match c {
                Cmd::LspSend { frame } => {
                    let mut reader = std::io::BufReader::new(frame.as_slice());
                    framing::read_frame(&mut reader).unwrap()
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initialize_response_announces_buffers() {
        let (mut model, init) = started_model();
        assert_eq!(model.lsp.state, LspState::Initializing);

        let frames = sent_frames(
            handle_frame(&mut model, json!({"jsonrpc": "2.0", "id": init["id"], "result": {}}))
                .unwrap(),
        );
        assert_eq!(model.lsp.state, LspState::Ready);
        assert_eq!(frames[0]["method"], "initialized");
        assert_eq!(frames[1]["method"], "textDocument/didOpen");
        assert_eq!(frames[1]["params"]["textDocument"]["version"], 1);
        assert_eq!(frames[1]["params"]["textDocument"]["languageId"], "go");
    }

    #[test]
    fn test_edit_produces_did_change_once() {
        let (mut model, init) = started_model();
        handle_frame(&mut model, json!({"jsonrpc": "2.0", "id": init["id"], "result": {}}));

        assert!(sync_documents(&mut model).is_none());
        model.buffer_mut().insert('x');
        let frames = sent_frames(sync_documents(&mut model).unwrap());
        assert_eq!(frames[0]["method"], "textDocument/didChange");
        assert_eq!(frames[0]["params"]["textDocument"]["version"], 2);
        assert!(sync_documents(&mut model).is_none());
    }

    #[test]
    fn test_closing_pane_sends_did_close() {
        let (mut model, init) = started_model();
        handle_frame(&mut model, json!({"jsonrpc": "2.0", "id": init["id"], "result": {}}));
        let mut other = Buffer::from_text("package util");
        other.path = Some(PathBuf::from("/work/util.go"));
        model.session.open_tab(other);
        let frames = sent_frames(sync_documents(&mut model).unwrap());
        assert_eq!(frames[0]["method"], "textDocument/didOpen");

        model.session.close_active_pane();
        let frames = sent_frames(sync_documents(&mut model).unwrap());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["method"], "textDocument/didClose");
        assert_eq!(frames[0]["params"]["textDocument"]["uri"], "file:///work/util.go");
        assert!(sync_documents(&mut model).is_none());
    }

    #[test]
    fn test_path_change_closes_old_document() {
        let (mut model, init) = started_model();
        handle_frame(&mut model, json!({"jsonrpc": "2.0", "id": init["id"], "result": {}}));
        model.buffer_mut().path = Some(PathBuf::from("/work/renamed.go"));

        let frames = sent_frames(sync_documents(&mut model).unwrap());
        let methods: Vec<&str> = frames.iter().filter_map(|f| f["method"].as_str()).collect();
        assert_eq!(methods, ["textDocument/didClose", "textDocument/didOpen"]);
        assert_eq!(frames[0]["params"]["textDocument"]["uri"], "file:///work/main.go");
        assert_eq!(frames[1]["params"]["textDocument"]["uri"], "file:///work/renamed.go");
    }

    #[test]
    fn test_unknown_response_id_changes_nothing() {
        let (mut model, _init) = started_model();
        let before = model.buffer().clone();
        let cmd = handle_frame(&mut model, json!({"jsonrpc": "2.0", "id": 999, "result": null}));
        assert!(cmd.is_none());
        assert_eq!(model.buffer(), &before);
        assert_eq!(model.lsp.state, LspState::Initializing);
    }

    #[test]
    fn test_server_request_answered_with_null() {
        let (mut model, _init) = started_model();
        let frames = sent_frames(
            handle_frame(
                &mut model,
                json!({"jsonrpc": "2.0", "id": 7, "method": "workspace/configuration", "params": {}}),
            )
            .unwrap(),
        );
        assert_eq!(frames[0]["id"], 7);
        assert!(frames[0]["result"].is_null());
    }

    #[test]
    fn test_closed_stops_client() {
        let (mut model, _init) = started_model();
        update_lsp(&mut model, LspMsg::Closed);
        assert_eq!(model.lsp.state, LspState::Stopped);
        assert!(sync_documents(&mut model).is_none());
    }

    #[test]
    fn test_failed_start_degrades_to_stopped() {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        model.lsp.mark_starting();
        update_lsp(&mut model, LspMsg::Started(Err("not found".into())));
        assert_eq!(model.lsp.state, LspState::Stopped);
    }
}
