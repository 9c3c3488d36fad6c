//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::PathBuf;

use kestrel::commands::Cmd;
use kestrel::config::EditorConfig;
use kestrel::keymap::{KeyCode, Keystroke};
use kestrel::messages::Msg;
use kestrel::model::{AppModel, Buffer};
use kestrel::update::update;

/// Create a test model with given text and cursor position.
/// Completion is off so Escape always leaves insert mode in one press.
pub fn test_model(text: &str, line: usize, column: usize) -> AppModel {
    let mut model = AppModel::new(EditorConfig::default(), PathBuf::from("/work"), 80, 24);
    model.completion.enabled = false;
    let buffer = model.buffer_mut();
    *buffer = Buffer::from_text(text);
    buffer.cursor_line = line;
    buffer.cursor_column = column;
    model
}

/// Press one key through the full reducer
pub fn press(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    update(model, Msg::key(key))
}

/// Type each character as a plain key press
pub fn type_text(model: &mut AppModel, text: &str) -> Vec<Cmd> {
    text.chars()
        .filter_map(|c| press(model, Keystroke::char(c)))
        .collect()
}

pub fn escape(model: &mut AppModel) -> Option<Cmd> {
    press(model, Keystroke::key(KeyCode::Escape))
}

pub fn enter(model: &mut AppModel) -> Option<Cmd> {
    press(model, Keystroke::key(KeyCode::Enter))
}

/// Run an ex command the way a user types it
pub fn ex(model: &mut AppModel, command: &str) -> Option<Cmd> {
    press(model, Keystroke::char(':'));
    type_text(model, command);
    enter(model)
}

/// Whether a command (or any member of a batch) is `Quit`
pub fn quits(cmd: Option<Cmd>) -> bool {
    cmd.map(Cmd::flatten)
        .unwrap_or_default()
        .iter()
        .any(|c| matches!(c, Cmd::Quit))
}
