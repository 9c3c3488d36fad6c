//! Insert mode

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::{AppModel, Mode};

use super::completion;

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    if key.is_ctrl('v') {
        return Some(Cmd::ReadClipboard);
    }
    if key.is_ctrl('k') {
        return Some(move_vertical(model, false));
    }
    if key.is_ctrl('j') {
        return Some(move_vertical(model, true));
    }

    match key.key {
        KeyCode::Escape => {
            if model.completion.visible {
                model.completion.hide();
            } else {
                model.mode = Mode::Normal;
                model.buffer_mut().move_left();
                model.ui.clear_status();
            }
            Some(Cmd::Redraw)
        }
        KeyCode::Enter => {
            if model.completion.visible {
                return completion::accept(model);
            }
            model.buffer_mut().insert_newline(true);
            Some(Cmd::Redraw)
        }
        KeyCode::Tab => {
            if let Some(text) = model.prediction.take() {
                model.buffer_mut().insert_str(&text);
                return Some(Cmd::Redraw);
            }
            if model.completion.visible {
                return completion::accept(model);
            }
            let spaces = " ".repeat(model.config.tab_width);
            model.buffer_mut().insert_str(&spaces);
            Some(Cmd::Redraw)
        }
        KeyCode::Backspace => {
            model.buffer_mut().backspace();
            model.completion.hide();
            Some(Cmd::Redraw)
        }
        KeyCode::Up => Some(move_vertical(model, false)),
        KeyCode::Down => Some(move_vertical(model, true)),
        KeyCode::Left => {
            model.buffer_mut().move_left_wrapping();
            Some(Cmd::Redraw)
        }
        KeyCode::Right => {
            model.buffer_mut().move_right_wrapping();
            Some(Cmd::Redraw)
        }
        KeyCode::Home => {
            model.buffer_mut().move_line_start();
            Some(Cmd::Redraw)
        }
        KeyCode::End => {
            model.buffer_mut().move_line_end();
            Some(Cmd::Redraw)
        }
        _ => {
            let ch = key.text()?;
            model.buffer_mut().type_char(ch);
            if is_identifier_char(ch) {
                completion::trigger(model).or(Some(Cmd::Redraw))
            } else {
                model.completion.hide();
                Some(Cmd::Redraw)
            }
        }
    }
}

/// Up/Down: cycle the popup when it is open, otherwise move the cursor
fn move_vertical(model: &mut AppModel, down: bool) -> Cmd {
    match (model.completion.visible, down) {
        (true, true) => model.completion.select_next(),
        (true, false) => model.completion.select_prev(),
        (false, true) => model.buffer_mut().move_down(),
        (false, false) => model.buffer_mut().move_up(),
    }
    Cmd::Redraw
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}
