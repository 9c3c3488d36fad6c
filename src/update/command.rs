//! Command line (`:`) input and ex command execution

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::{AppModel, Mode, SplitKind};

use super::{app, file_tree, vcs};

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    match key.key {
        KeyCode::Escape => {
            model.ui.input.clear();
            model.return_to_normal();
            model.ui.clear_status();
        }
        KeyCode::Enter => {
            let input = model.ui.take_input();
            model.return_to_normal();
            return run_command(model, &input);
        }
        KeyCode::Backspace => {
            if model.ui.input.pop().is_none() {
                model.return_to_normal();
            }
        }
        _ => match key.text() {
            Some(ch) => model.ui.input.push(ch),
            None => return None,
        },
    }
    Some(Cmd::Redraw)
}

/// Execute one ex command line (without the leading `:`)
pub fn run_command(model: &mut AppModel, input: &str) -> Option<Cmd> {
    let input = input.trim();
    let (name, arg) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (input, None),
    };
    let path = arg.map(|a| resolve(model, a));

    tracing::debug!(command = name, ?arg, "Ex command");

    match name {
        "" => {
            model.ui.clear_status();
            Some(Cmd::Redraw)
        }
        "w" | "write" => app::save_active(model, path, false),
        "wq" | "x" => app::save_active(model, path, true),
        "q" | "quit" => app::close_active_pane(model),
        "q!" | "quit!" => Some(Cmd::Quit),
        "tabnew" | "tabe" | "tabedit" => app::open_in_new_tab(model, path),
        "vsp" | "vsplit" => app::split(model, SplitKind::Vertical, path),
        "sp" | "split" => app::split(model, SplitKind::Horizontal, path),
        "tree" | "e" | "explore" => file_tree::toggle(model),
        "git" => vcs::toggle(model),
        "toggle-nu" | "tn" => toggle_line_numbers(model),
        "help" | "h" => open_help(model),
        "commit" => match arg {
            Some(message) => Some(vcs::commit(model, message.to_string())),
            None => {
                model.ui.set_status("Commit message required: :commit <message>");
                Some(Cmd::Redraw)
            }
        },
        _ => {
            model.ui.set_status(format!("Unknown command: {}", input));
            Some(Cmd::Redraw)
        }
    }
}

pub(super) fn toggle_line_numbers(model: &mut AppModel) -> Option<Cmd> {
    model.ui.show_line_numbers = !model.ui.show_line_numbers;
    model.ui.set_status(if model.ui.show_line_numbers {
        "Line numbers on"
    } else {
        "Line numbers off"
    });
    Some(Cmd::Redraw)
}

pub(super) fn open_help(model: &mut AppModel) -> Option<Cmd> {
    model.ui.help_scroll = 0;
    model.mode = Mode::Help;
    model.ui.set_status("Help (j/k scroll, Esc to close)");
    Some(Cmd::Redraw)
}

/// Relative paths are taken from the working directory, `~/` from home
fn resolve(model: &AppModel, arg: &str) -> PathBuf {
    if let Some(rest) = arg.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    let path = PathBuf::from(arg);
    if path.is_absolute() {
        path
    } else {
        model.cwd.join(path)
    }
}
