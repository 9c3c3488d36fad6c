//! File tree sidebar: navigation, listing results and the create/rename/delete prompts

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::{AppModel, Focus, Mode, TreeEntry, TreePrompt};

use super::app;

/// Point the tree at `path` and request its listing. Any listing still in
/// flight for the previous root becomes stale.
pub(super) fn load_root(model: &mut AppModel, path: PathBuf) -> Option<Cmd> {
    let tree = &mut model.file_tree;
    if tree.root != path {
        tree.selected = 0;
    }
    tree.root = path.clone();
    tree.loading = true;
    Some(Cmd::LoadDirectory { path })
}

/// Install a listing if it still belongs to the current root
pub(super) fn apply_listing(
    model: &mut AppModel,
    path: PathBuf,
    result: Result<Vec<TreeEntry>, String>,
) -> Option<Cmd> {
    if path != model.file_tree.root {
        tracing::debug!(stale = %path.display(), root = %model.file_tree.root.display(), "Dropping stale directory listing");
        return None;
    }
    match result {
        Ok(entries) => model.file_tree.set_entries(entries),
        Err(e) => {
            model.file_tree.loading = false;
            tracing::warn!(path = %path.display(), error = %e, "Directory listing failed");
            model.ui.set_status(format!("Error: {}", e));
        }
    }
    Some(Cmd::Redraw)
}

/// `:tree` - show and focus the sidebar, or hide it
pub(super) fn toggle(model: &mut AppModel) -> Option<Cmd> {
    if model.file_tree.visible {
        model.file_tree.visible = false;
        model.file_tree.prompt = None;
        if model.focus == Focus::FileTree {
            model.set_focus(Focus::Editor);
        }
        return Some(Cmd::Redraw);
    }
    model.file_tree.visible = true;
    model.set_focus(Focus::FileTree);
    model.ui.set_status("Tree: Enter open, - up, a add, r rename, d delete, Esc back");
    let root = model.file_tree.root.clone();
    load_root(model, root)
}

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    if model.file_tree.prompt.is_some() {
        return handle_prompt_key(model, key);
    }
    if key.mods.ctrl() || key.mods.alt() {
        return None;
    }

    match key.key {
        KeyCode::Char('j') | KeyCode::Down => model.file_tree.select_next(),
        KeyCode::Char('k') | KeyCode::Up => model.file_tree.select_prev(),
        KeyCode::Enter => {
            let entry = model.file_tree.selected_entry()?.clone();
            return if entry.is_dir {
                load_root(model, entry.path)
            } else {
                app::open_in_new_tab(model, Some(entry.path))
            };
        }
        KeyCode::Backspace | KeyCode::Char('-') => {
            let parent = model.file_tree.root.parent()?.to_path_buf();
            return load_root(model, parent);
        }
        KeyCode::Char('a') => {
            model.file_tree.prompt = Some(TreePrompt::Create {
                input: String::new(),
            });
            model.ui.set_status("New file (end with / for a directory)");
        }
        KeyCode::Char('r') => {
            let entry = model.file_tree.selected_entry()?.clone();
            model.file_tree.prompt = Some(TreePrompt::Rename {
                from: entry.path,
                input: entry.name,
            });
            model.ui.set_status("Rename to");
        }
        KeyCode::Char('d') => {
            let entry = model.file_tree.selected_entry()?.clone();
            model.ui.set_status(format!("Delete {}? (y/n)", entry.name));
            model.file_tree.prompt = Some(TreePrompt::ConfirmDelete { target: entry.path });
        }
        KeyCode::Escape | KeyCode::Char('q') => {
            model.set_focus(Focus::Editor);
            model.ui.clear_status();
        }
        KeyCode::Char(':') => {
            model.mode = Mode::Command;
            model.ui.input.clear();
            model.ui.clear_status();
        }
        _ => return None,
    }
    Some(Cmd::Redraw)
}

fn handle_prompt_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    let Some(prompt) = model.file_tree.prompt.take() else {
        return None;
    };

    if key.key == KeyCode::Escape {
        model.ui.set_status("Cancelled");
        return Some(Cmd::Redraw);
    }

    match prompt {
        TreePrompt::ConfirmDelete { target } => {
            if matches!(key.key, KeyCode::Char('y' | 'Y')) {
                return Some(Cmd::DeletePath { path: target });
            }
            model.ui.set_status("Delete cancelled");
        }
        TreePrompt::Create { mut input } => {
            if key.key == KeyCode::Enter {
                let name = input.trim();
                if name.is_empty() {
                    model.ui.set_status("Cancelled");
                    return Some(Cmd::Redraw);
                }
                let is_dir = name.ends_with('/');
                let path = model.file_tree.root.join(name.trim_end_matches('/'));
                return Some(Cmd::CreatePath { path, is_dir });
            }
            edit_input(&mut input, key);
            model.file_tree.prompt = Some(TreePrompt::Create { input });
        }
        TreePrompt::Rename { from, mut input } => {
            if key.key == KeyCode::Enter {
                let name = input.trim();
                if name.is_empty() {
                    model.ui.set_status("Cancelled");
                    return Some(Cmd::Redraw);
                }
                let to = from
                    .parent()
                    .map(|dir| dir.join(name))
                    .unwrap_or_else(|| PathBuf::from(name));
                return Some(Cmd::RenamePath { from, to });
            }
            edit_input(&mut input, key);
            model.file_tree.prompt = Some(TreePrompt::Rename { from, input });
        }
    }
    Some(Cmd::Redraw)
}

fn edit_input(input: &mut String, key: Keystroke) {
    if key.key == KeyCode::Backspace {
        input.pop();
    } else if let Some(ch) = key.text() {
        input.push(ch);
    }
}
