//! Fuzzy file finder overlay

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::messages::FinderMsg;
use crate::model::{AppModel, FinderState, Mode};

use super::app;

/// Open the finder over the tree root and start a scan
pub(super) fn open(model: &mut AppModel) -> Option<Cmd> {
    let root = model.file_tree.root.clone();
    model.finder = Some(FinderState::open(root.clone()));
    model.mode = Mode::FuzzyFind;
    model.completion.hide();
    model.ui.set_status("Scanning...");
    Some(Cmd::ScanFiles { root })
}

fn close(model: &mut AppModel) {
    model.finder = None;
    model.return_to_normal();
}

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    let Some(finder) = model.finder.as_mut() else {
        model.return_to_normal();
        return Some(Cmd::Redraw);
    };

    if key.is_ctrl('j') {
        finder.select_next();
        return Some(Cmd::Redraw);
    }
    if key.is_ctrl('k') {
        finder.select_prev();
        return Some(Cmd::Redraw);
    }

    match key.key {
        KeyCode::Escape => {
            close(model);
            model.ui.set_status("Finder closed");
        }
        KeyCode::Enter => {
            let selected = finder.selected_path();
            close(model);
            return match selected {
                Some(path) => app::open_in_new_tab(model, Some(path)),
                None => Some(Cmd::Redraw),
            };
        }
        KeyCode::Down => finder.select_next(),
        KeyCode::Up => finder.select_prev(),
        KeyCode::Backspace => {
            finder.query.pop();
            finder.refilter();
        }
        _ => {
            finder.query.push(key.text()?);
            finder.refilter();
        }
    }
    Some(Cmd::Redraw)
}

pub fn update_finder(model: &mut AppModel, msg: FinderMsg) -> Option<Cmd> {
    match msg {
        FinderMsg::ScanCompleted { root, result } => {
            let Some(finder) = model.finder.as_mut().filter(|f| f.root == root) else {
                tracing::debug!(root = %root.display(), "Dropping scan for a closed finder");
                return None;
            };
            finder.scanning = false;
            match result {
                Ok(files) => {
                    let count = files.len();
                    finder.files = files;
                    finder.refilter();
                    model.ui.set_status(format!("{} files", count));
                }
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "File scan failed");
                    model.ui.set_status(format!("Error: {}", e));
                }
            }
            Some(Cmd::Redraw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use std::path::PathBuf;

    fn finder_model() -> AppModel {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        open(&mut model);
        update_finder(
            &mut model,
            FinderMsg::ScanCompleted {
                root: PathBuf::from("/work"),
                result: Ok(vec![
                    "README.md".to_string(),
                    "src/main.go".to_string(),
                    "src/util.go".to_string(),
                ]),
            },
        );
        model
    }

    #[test]
    fn test_open_starts_scan() {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        let cmd = open(&mut model);
        assert_eq!(model.mode, Mode::FuzzyFind);
        assert!(matches!(cmd, Some(Cmd::ScanFiles { ref root }) if root == &PathBuf::from("/work")));
    }

    #[test]
    fn test_scan_after_close_ignored() {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        open(&mut model);
        handle_key(&mut model, Keystroke::key(KeyCode::Escape));
        let cmd = update_finder(
            &mut model,
            FinderMsg::ScanCompleted {
                root: PathBuf::from("/work"),
                result: Ok(vec!["a.go".to_string()]),
            },
        );
        assert!(cmd.is_none());
        assert!(model.finder.is_none());
        assert_eq!(model.mode, Mode::Normal);
    }

    #[test]
    fn test_query_filters_and_enter_opens() {
        let mut model = finder_model();
        for ch in "util".chars() {
            handle_key(&mut model, Keystroke::char(ch));
        }
        let cmd = handle_key(&mut model, Keystroke::key(KeyCode::Enter));
        assert!(matches!(
            cmd,
            Some(Cmd::LoadFile { ref path, .. }) if path == &PathBuf::from("/work/src/util.go")
        ));
        assert!(model.finder.is_none());
        assert_eq!(model.session.tabs.len(), 2);
    }

    #[test]
    fn test_selection_moves() {
        let mut model = finder_model();
        handle_key(&mut model, Keystroke::ctrl('j'));
        handle_key(&mut model, Keystroke::key(KeyCode::Down));
        assert_eq!(model.finder.as_ref().map(|f| f.selected), Some(2));
        handle_key(&mut model, Keystroke::ctrl('k'));
        assert_eq!(model.finder.as_ref().map(|f| f.selected), Some(1));
    }
}
