//! Commit message prompt

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::AppModel;

use super::vcs;

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    match key.key {
        KeyCode::Escape => {
            model.ui.input.clear();
            model.return_to_normal();
            model.ui.set_status("Commit aborted");
        }
        KeyCode::Enter => {
            let message = model.ui.take_input();
            let message = message.trim();
            if message.is_empty() {
                model.return_to_normal();
                model.ui.set_status("Commit aborted: empty message");
                return Some(Cmd::Redraw);
            }
            model.return_to_normal();
            return Some(vcs::commit(model, message.to_string()));
        }
        KeyCode::Backspace => {
            model.ui.input.pop();
        }
        _ => model.ui.input.push(key.text()?),
    }
    Some(Cmd::Redraw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::model::{Focus, Mode};
    use std::path::PathBuf;

    fn commit_model() -> AppModel {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/repo"), 80, 24);
        model.vcs.visible = true;
        model.set_focus(Focus::Vcs);
        model.mode = Mode::CommitMessage;
        model
    }

    #[test]
    fn test_escape_aborts_without_side_effect() {
        let mut model = commit_model();
        handle_key(&mut model, Keystroke::char('x'));
        let cmd = handle_key(&mut model, Keystroke::key(KeyCode::Escape));
        assert!(matches!(cmd, Some(Cmd::Redraw)));
        assert_eq!(model.mode, Mode::Normal);
        assert_eq!(model.focus, Focus::Vcs);
        assert!(model.ui.input.is_empty());
    }

    #[test]
    fn test_empty_message_returns_to_normal() {
        let mut model = commit_model();
        handle_key(&mut model, Keystroke::char(' '));
        let cmd = handle_key(&mut model, Keystroke::key(KeyCode::Enter));
        assert!(matches!(cmd, Some(Cmd::Redraw)));
        assert_eq!(model.mode, Mode::Normal);
        assert_eq!(model.focus, Focus::Vcs);
        assert_eq!(model.ui.status_message, "Commit aborted: empty message");
        assert!(model.ui.input.is_empty());
    }

    #[test]
    fn test_enter_commits() {
        let mut model = commit_model();
        for ch in "init".chars() {
            handle_key(&mut model, Keystroke::char(ch));
        }
        let cmd = handle_key(&mut model, Keystroke::key(KeyCode::Enter));
        assert!(matches!(
            cmd,
            Some(Cmd::VcsCommit { ref root, ref message }) if message == "init" && root == &PathBuf::from("/repo")
        ));
        assert_eq!(model.mode, Mode::Normal);
    }
}
