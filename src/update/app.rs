//! App message handlers (file I/O, clipboard, shell) and the pane/tab
//! operations shared by the ex commands and the which-key menu

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::fileio;
use crate::messages::AppMsg;
use crate::model::session::SplitError;
use crate::model::{AppModel, CloseOutcome, Focus, Mode, SplitKind};

use super::file_tree;

/// Handle app messages (file operations, clipboard, shell)
pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::FileLoaded { pane, path, result } => {
            let Some(target) = model.session.pane_mut(pane) else {
                tracing::debug!(?pane, path = %path.display(), "Pane closed before file loaded");
                return None;
            };
            match result {
                Ok(Some(text)) => {
                    let buffer = &mut target.buffer;
                    buffer.set_text(&text);
                    buffer.cursor_line = 0;
                    buffer.cursor_column = 0;
                    buffer.modified = false;
                    buffer.path = Some(path.clone());
                    target.scroll = 0;
                    let lines = buffer.line_count();
                    model.ui.set_status(format!("\"{}\" {}L", path.display(), lines));
                }
                Ok(None) => {
                    target.buffer.path = Some(path.clone());
                    model.ui.set_status(format!("\"{}\" [New File]", path.display()));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load file");
                    model.ui.set_status(format!("Error: {}", e));
                }
            }
            if let Some(tab) = model.session.tab_of_mut(pane) {
                tab.refresh_name();
            }
            Some(Cmd::Redraw)
        }

        AppMsg::FileSaved {
            pane,
            revision,
            result,
            close_after,
        } => {
            model.ui.is_saving = false;
            match result {
                Ok(summary) => {
                    if let Some(target) = model.session.pane_mut(pane) {
                        // Edits made while the write was in flight stay unsaved
                        if target.buffer.revision == revision {
                            target.buffer.modified = false;
                        }
                    }
                    model.ui.set_status(summary);
                    let mut cmds = Vec::new();
                    if model.vcs.visible {
                        cmds.push(super::vcs::refresh(model));
                    }
                    if close_after && model.session.active_pane().id == pane {
                        cmds.push(close_active_pane(model).unwrap_or_default());
                    }
                    cmds.push(Cmd::Redraw);
                    Some(Cmd::batch(cmds))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Save failed");
                    model.ui.set_status(format!("Save failed: {}", e));
                    Some(Cmd::Redraw)
                }
            }
        }

        AppMsg::DirectoryLoaded { path, result } => file_tree::apply_listing(model, path, result),

        AppMsg::FsOpCompleted(result) => {
            match result {
                Ok(summary) => model.ui.set_status(summary),
                Err(e) => model.ui.set_status(format!("Error: {}", e)),
            }
            let root = model.file_tree.root.clone();
            file_tree::load_root(model, root)
        }

        AppMsg::ClipboardRead(result) => {
            match result {
                Ok(text) if !text.is_empty() => {
                    model.buffer_mut().paste(&text);
                    model.ui.set_status("Pasted");
                }
                Ok(_) => model.ui.set_status("Clipboard is empty"),
                Err(e) => {
                    tracing::debug!(error = %e, "Clipboard read failed");
                    model.ui.set_status("Clipboard is empty");
                }
            }
            Some(Cmd::Redraw)
        }

        AppMsg::ShellExited(result) => {
            if let Err(e) = result {
                model.ui.set_status(format!("Shell error: {}", e));
            }
            Some(Cmd::Redraw)
        }
    }
}

// ============================================================================
// Shared pane/tab operations
// ============================================================================

/// Save the active buffer, optionally under a new path
pub(super) fn save_active(
    model: &mut AppModel,
    target: Option<PathBuf>,
    close_after: bool,
) -> Option<Cmd> {
    if let Some(path) = target {
        model.buffer_mut().path = Some(path);
        model.session.active_tab_mut().refresh_name();
    }
    let pane = model.session.active_pane();
    let Some(path) = pane.buffer.path.clone() else {
        model.ui.set_status("No file name (use :w <path>)");
        return Some(Cmd::Redraw);
    };
    let content = fileio::prepare_for_save(
        &path,
        &pane.buffer.text(),
        model.config.tab_width,
        &model.config.tabs_on_save,
    );
    let cmd = Cmd::SaveFile {
        pane: pane.id,
        revision: pane.buffer.revision,
        path,
        content,
        close_after,
    };
    model.ui.is_saving = true;
    model.ui.set_status("Saving...");
    Some(cmd)
}

/// Close the active pane, then its tab, then the program
pub(super) fn close_active_pane(model: &mut AppModel) -> Option<Cmd> {
    match model.session.close_active_pane() {
        CloseOutcome::PaneClosed => model.ui.set_status("Pane closed"),
        CloseOutcome::TabClosed => model.ui.set_status("Tab closed"),
        CloseOutcome::LastPane => return Some(Cmd::Quit),
    }
    model.completion.hide();
    Some(Cmd::Redraw)
}

/// Open a path (or an empty buffer) in a new tab
pub(super) fn open_in_new_tab(model: &mut AppModel, path: Option<PathBuf>) -> Option<Cmd> {
    let mut buffer = model.empty_buffer();
    buffer.path = path.clone();
    let pane = model.session.open_tab(buffer);
    model.mode = Mode::Normal;
    model.set_focus(Focus::Editor);
    match path {
        Some(path) => {
            model.ui.set_status(format!("Opening: {}", path.display()));
            Some(Cmd::LoadFile {
                pane,
                path,
                tab_width: model.config.tab_width,
            })
        }
        None => {
            model.ui.set_status("New tab");
            Some(Cmd::Redraw)
        }
    }
}

/// Split the active tab; without a path the active buffer is cloned
pub(super) fn split(model: &mut AppModel, kind: SplitKind, path: Option<PathBuf>) -> Option<Cmd> {
    let buffer = path.as_ref().map(|p| {
        let mut buffer = model.empty_buffer();
        buffer.path = Some(p.clone());
        buffer
    });
    match model.session.split_active(kind, buffer) {
        Ok(pane) => {
            model.session.active_tab_mut().refresh_name();
            model.set_focus(Focus::Editor);
            model.ui.set_status("Split created");
            match path {
                Some(path) => Some(Cmd::LoadFile {
                    pane,
                    path,
                    tab_width: model.config.tab_width,
                }),
                None => Some(Cmd::Redraw),
            }
        }
        Err(SplitError::MaxPanes) => {
            model.ui.set_status("Max 2 panes per tab");
            Some(Cmd::Redraw)
        }
        Err(SplitError::NotASplit) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::model::Buffer;

    fn model() -> AppModel {
        AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24)
    }

    #[test]
    fn test_file_loaded_into_closed_pane_is_dropped() {
        let mut model = model();
        let pane = model.session.open_tab(Buffer::new());
        close_active_pane(&mut model);
        let cmd = update_app(
            &mut model,
            AppMsg::FileLoaded {
                pane,
                path: PathBuf::from("/work/a.go"),
                result: Ok(Some("x".into())),
            },
        );
        assert!(cmd.is_none());
        assert_eq!(model.buffer().text(), "");
    }

    #[test]
    fn test_missing_file_becomes_new_buffer() {
        let mut model = model();
        let pane = model.session.active_pane().id;
        update_app(
            &mut model,
            AppMsg::FileLoaded {
                pane,
                path: PathBuf::from("/work/new.go"),
                result: Ok(None),
            },
        );
        assert_eq!(model.buffer().path, Some(PathBuf::from("/work/new.go")));
        assert_eq!(model.session.active_tab().name, "new.go");
        assert!(model.ui.status_message.contains("[New File]"));
    }

    #[test]
    fn test_load_error_leaves_buffer() {
        let mut model = model();
        *model.buffer_mut() = Buffer::from_text("keep");
        let pane = model.session.active_pane().id;
        update_app(
            &mut model,
            AppMsg::FileLoaded {
                pane,
                path: PathBuf::from("/work/secret"),
                result: Err("permission denied".into()),
            },
        );
        assert_eq!(model.buffer().text(), "keep");
        assert!(model.ui.status_message.contains("permission denied"));
    }

    #[test]
    fn test_save_without_path_reports() {
        let mut model = model();
        let cmd = save_active(&mut model, None, false);
        assert!(matches!(cmd, Some(Cmd::Redraw)));
        assert!(model.ui.status_message.contains("No file name"));
    }

    #[test]
    fn test_save_converts_tabs_for_go() {
        let mut model = model();
        *model.buffer_mut() = Buffer::from_text("func f() {\n    return\n}").with_path("/work/f.go");
        let cmd = save_active(&mut model, None, false);
        match cmd {
            Some(Cmd::SaveFile { content, .. }) => assert_eq!(content, "func f() {\n\treturn\n}"),
            other => panic!("expected SaveFile, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_during_save_stays_modified() {
        let mut model = model();
        *model.buffer_mut() = Buffer::from_text("a").with_path("/work/a.txt");
        model.buffer_mut().insert('b');
        let pane = model.session.active_pane().id;
        let revision = model.buffer().revision;
        model.buffer_mut().insert('c');
        update_app(
            &mut model,
            AppMsg::FileSaved {
                pane,
                revision,
                result: Ok("written".into()),
                close_after: false,
            },
        );
        assert!(model.buffer().modified);
    }

    #[test]
    fn test_split_limit() {
        let mut model = model();
        split(&mut model, SplitKind::Vertical, None);
        assert_eq!(model.session.active_tab().panes.len(), 2);
        split(&mut model, SplitKind::Horizontal, None);
        assert_eq!(model.session.active_tab().panes.len(), 2);
        assert_eq!(model.ui.status_message, "Max 2 panes per tab");
    }

    #[test]
    fn test_paste_from_clipboard() {
        let mut model = model();
        update_app(&mut model, AppMsg::ClipboardRead(Ok("a\r\nb".into())));
        assert_eq!(model.buffer().text(), "a\nb");
    }
}
