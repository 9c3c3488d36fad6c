//! Normal mode with the editor focused

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::{AppModel, Mode};

use super::finder;

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    if key.is_ctrl('p') {
        return finder::open(model);
    }
    if key.is_ctrl('t') || key.is_ctrl('\\') {
        return Some(Cmd::SpawnShell {
            shell: model.config.shell.clone(),
        });
    }
    if key.mods.ctrl() || key.mods.alt() {
        return None;
    }

    match key.key {
        KeyCode::Char('i') => {
            model.mode = Mode::Insert;
            model.ui.set_status("-- INSERT --");
        }
        KeyCode::Char(':') => {
            model.mode = Mode::Command;
            model.ui.input.clear();
            model.ui.clear_status();
        }
        KeyCode::Char('h') | KeyCode::Left => model.buffer_mut().move_left(),
        KeyCode::Char('l') | KeyCode::Right => model.buffer_mut().move_right(),
        KeyCode::Char('j') | KeyCode::Down => model.buffer_mut().move_down(),
        KeyCode::Char('k') | KeyCode::Up => model.buffer_mut().move_up(),
        KeyCode::Char('0') | KeyCode::Home => model.buffer_mut().move_line_start(),
        KeyCode::Char('$') | KeyCode::End => model.buffer_mut().move_line_end(),
        KeyCode::Char('H') => model.session.prev_tab(),
        KeyCode::Char('L') => model.session.next_tab(),
        KeyCode::Tab => transform_buffer(model),
        KeyCode::Char('p') => return Some(Cmd::ReadClipboard),
        KeyCode::Space => {
            model.mode = Mode::WhichKey;
            model.ui.set_status("Press a key...");
        }
        _ => return None,
    }

    Some(Cmd::Redraw)
}

/// Replace the active buffer with the plugin's transform of it.
/// On any failure the buffer is left as it was.
pub(super) fn transform_buffer(model: &mut AppModel) {
    let text = model.buffer().text();
    match model.plugin.transform(&text) {
        Ok(output) => {
            model.buffer_mut().set_text(&output);
            model.ui.set_status("Plugin processed buffer");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Plugin transform failed");
            model.ui.set_status(format!("Plugin error: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::model::Buffer;
    use crate::plugin::{CallOutput, PluginBridge, PluginError, PluginHost};
    use std::path::PathBuf;

    #[derive(Debug)]
    struct Fails;

    impl PluginHost for Fails {
        fn call(&mut self, _function: &str, _input: &[u8]) -> Result<CallOutput, PluginError> {
            Ok(CallOutput {
                code: 1,
                output: Vec::new(),
            })
        }
    }

    #[derive(Debug)]
    struct Shout;

    impl PluginHost for Shout {
        fn call(&mut self, _function: &str, input: &[u8]) -> Result<CallOutput, PluginError> {
            Ok(CallOutput {
                code: 0,
                output: String::from_utf8_lossy(input).to_uppercase().into_bytes(),
            })
        }
    }

    fn model_with(text: &str) -> AppModel {
        let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
        *model.buffer_mut() = Buffer::from_text(text);
        model
    }

    #[test]
    fn test_motion_keys() {
        let mut model = model_with("hello\nworld");
        handle_key(&mut model, Keystroke::char('$'));
        assert_eq!(model.buffer().cursor_column, 5);
        handle_key(&mut model, Keystroke::char('j'));
        assert_eq!(model.buffer().cursor_line, 1);
        handle_key(&mut model, Keystroke::char('0'));
        assert_eq!(model.buffer().cursor_column, 0);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut model = model_with("abc");
        let before = model.buffer().clone();
        assert!(handle_key(&mut model, Keystroke::char('z')).is_none());
        assert!(handle_key(&mut model, Keystroke::ctrl('y')).is_none());
        assert_eq!(model.buffer(), &before);
        assert_eq!(model.mode, Mode::Normal);
    }

    #[test]
    fn test_plugin_failure_leaves_buffer() {
        let mut model = model_with("abc");
        model.plugin = PluginBridge::with_host(Box::new(Fails));
        handle_key(&mut model, Keystroke::key(KeyCode::Tab));
        assert_eq!(model.buffer().text(), "abc");
        assert!(model.ui.status_message.starts_with("Plugin error"));
    }

    #[test]
    fn test_plugin_transform_replaces_buffer() {
        let mut model = model_with("abc\ndef");
        model.buffer_mut().cursor_line = 1;
        model.plugin = PluginBridge::with_host(Box::new(Shout));
        handle_key(&mut model, Keystroke::key(KeyCode::Tab));
        assert_eq!(model.buffer().text(), "ABC\nDEF");
        assert_eq!(model.buffer().cursor_line, 1);
    }

    #[test]
    fn test_ctrl_t_spawns_shell() {
        let mut model = model_with("");
        let cmd = handle_key(&mut model, Keystroke::ctrl('t'));
        assert!(matches!(cmd, Some(Cmd::SpawnShell { .. })));
    }
}
