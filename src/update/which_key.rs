//! Which-key menu: single-key actions behind `Space`

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::{AppModel, Focus, SplitKind};

use super::{app, command, file_tree, finder, vcs};

/// Entries shown in the menu popup
pub const MENU_ENTRIES: &[(char, &str)] = &[
    ('f', "find file"),
    ('e', "explorer"),
    ('g', "git"),
    ('w', "save"),
    ('q', "quit pane"),
    ('v', "vertical split"),
    ('s', "horizontal split"),
    ('t', "terminal"),
    ('T', "line numbers"),
    ('p', "paste"),
    ('c', "completion"),
    ('?', "help"),
];

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    if matches!(key.key, KeyCode::Escape | KeyCode::Space) {
        model.return_to_normal();
        model.ui.clear_status();
        return Some(Cmd::Redraw);
    }
    let action = key.text()?;

    // Unknown keys leave the menu open
    if !MENU_ENTRIES.iter().any(|(k, _)| *k == action) {
        return None;
    }

    model.return_to_normal();
    model.ui.clear_status();

    match action {
        'f' => finder::open(model),
        'e' => {
            model.file_tree.visible = true;
            model.set_focus(Focus::FileTree);
            let root = model.file_tree.root.clone();
            file_tree::load_root(model, root)
        }
        'g' => {
            model.vcs.visible = true;
            model.set_focus(Focus::Vcs);
            Some(vcs::refresh(model))
        }
        'w' => app::save_active(model, None, false),
        'q' => app::close_active_pane(model),
        'v' => app::split(model, SplitKind::Vertical, None),
        's' => app::split(model, SplitKind::Horizontal, None),
        't' => Some(Cmd::SpawnShell {
            shell: model.config.shell.clone(),
        }),
        'T' => command::toggle_line_numbers(model),
        'p' => Some(Cmd::ReadClipboard),
        'c' => {
            let completion = &mut model.completion;
            completion.enabled = !completion.enabled;
            if !completion.enabled {
                completion.hide();
            }
            let state = if completion.enabled { "on" } else { "off" };
            model.ui.set_status(format!("Completion {}", state));
            Some(Cmd::Redraw)
        }
        '?' => command::open_help(model),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::model::Mode;
    use std::path::PathBuf;

    fn menu_model() -> AppModel {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        model.mode = Mode::WhichKey;
        model
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut model = menu_model();
        let cmd = handle_key(&mut model, Keystroke::char('z'));
        assert!(cmd.is_none());
        assert_eq!(model.mode, Mode::WhichKey);
    }

    #[test]
    fn test_space_closes() {
        let mut model = menu_model();
        handle_key(&mut model, Keystroke::char(' '));
        assert_eq!(model.mode, Mode::Normal);
    }

    #[test]
    fn test_explorer_focuses_tree() {
        let mut model = menu_model();
        let cmd = handle_key(&mut model, Keystroke::char('e'));
        assert!(model.file_tree.visible);
        assert_eq!(model.mode, Mode::FileTree);
        assert!(matches!(cmd, Some(Cmd::LoadDirectory { ref path }) if path == &PathBuf::from("/work")));
    }

    #[test]
    fn test_toggle_completion() {
        let mut model = menu_model();
        handle_key(&mut model, Keystroke::char('c'));
        assert!(!model.completion.enabled);
        assert_eq!(model.mode, Mode::Normal);
        assert_eq!(model.ui.status_message, "Completion off");
    }

    #[test]
    fn test_split_from_menu() {
        let mut model = menu_model();
        handle_key(&mut model, Keystroke::char('v'));
        assert_eq!(model.session.active_tab().split, SplitKind::Vertical);
    }
}
