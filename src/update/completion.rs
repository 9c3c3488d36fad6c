//! Completion popup: local candidates plus server completions

use lsp_types::Position;

use crate::commands::Cmd;
use crate::completion::{BufferWords, CandidateSource, CompletionItem, CompletionKind, MAX_COMPLETIONS};
use crate::lsp::{self, client::completion_labels, framing};
use crate::model::{AppModel, PaneId};

/// Open or refresh the popup for the identifier before the cursor
pub fn trigger(model: &mut AppModel) -> Option<Cmd> {
    if !model.completion.enabled {
        model.completion.hide();
        return Some(Cmd::Redraw);
    }

    let buffer = model.buffer();
    let prefix = buffer.word_prefix();
    if !prefix.contains('.') && prefix.chars().count() < 2 {
        model.completion.hide();
        return Some(Cmd::Redraw);
    }

    let language = buffer.path.as_deref().map_or("plaintext", lsp::language_id);
    let items = BufferWords.candidates(member_part(&prefix), &buffer.lines, language);
    if items.is_empty() {
        model.completion.hide();
    } else {
        model.completion.show(prefix, items);
    }

    Some(Cmd::batch(vec![Cmd::Redraw, request_server_completion(model).into()]))
}

/// Ask the server for completions at the cursor. The document is synced
/// first so the server sees the text the request refers to.
fn request_server_completion(model: &mut AppModel) -> Option<Cmd> {
    if !model.lsp.is_ready() {
        return None;
    }
    let pane = model.session.active_pane();
    let pane_id = pane.id;
    let buffer = &pane.buffer;
    let uri = lsp::path_to_uri(buffer.path.as_deref()?)?;
    let character: usize = buffer
        .current_line()
        .chars()
        .take(buffer.cursor_column)
        .map(char::len_utf16)
        .sum();
    let position = Position::new(
        u32::try_from(buffer.cursor_line).ok()?,
        u32::try_from(character).ok()?,
    );
    let revision = buffer.revision;

    let sync = super::lsp::sync_pane(model, pane_id);
    let request = model.lsp.completion(uri, position, pane_id, revision);
    Some(Cmd::batch(vec![
        sync.unwrap_or_default(),
        Cmd::LspSend {
            frame: framing::encode(&request),
        },
    ]))
}

/// Replace the popup with server items if the buffer is unchanged since the
/// request
pub fn apply_server_items(
    model: &mut AppModel,
    pane: PaneId,
    revision: u64,
    result: &serde_json::Value,
) -> bool {
    let active = model.session.active_pane();
    if active.id != pane || active.buffer.revision != revision || !model.completion.enabled {
        tracing::debug!(?pane, revision, "Dropping stale completion response");
        return false;
    }
    let mut items: Vec<CompletionItem> = completion_labels(result)
        .into_iter()
        .map(|(label, insert_text)| CompletionItem {
            label,
            insert_text,
            kind: CompletionKind::Server,
        })
        .collect();
    items.truncate(MAX_COMPLETIONS);
    if items.is_empty() {
        return false;
    }
    let prefix = active.buffer.word_prefix();
    model.completion.show(prefix, items);
    true
}

/// Insert the selected item in place of the typed member prefix
pub fn accept(model: &mut AppModel) -> Option<Cmd> {
    let Some(item) = model.completion.selected_item().cloned() else {
        model.completion.hide();
        return Some(Cmd::Redraw);
    };
    let typed = member_part(&model.completion.prefix).chars().count();
    let buffer = model.buffer_mut();
    for _ in 0..typed {
        buffer.delete_backward();
    }
    buffer.insert_str(&item.insert_text);
    model.completion.hide();
    model.ui.set_status(format!("Inserted: {}", item.label));
    Some(Cmd::Redraw)
}

/// The part after the last `.` (`fmt.Pr` → `Pr`)
fn member_part(prefix: &str) -> &str {
    prefix.rsplit_once('.').map_or(prefix, |(_, member)| member)
}
