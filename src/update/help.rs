//! Help overlay

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::AppModel;

/// Key reference shown by `:help` and `Space ?`
pub const HELP_LINES: &[&str] = &[
    "NORMAL",
    "  i            insert mode",
    "  :            command line",
    "  h j k l      move",
    "  0 $          line start / end",
    "  H L          previous / next tab",
    "  Tab          run plugin on buffer",
    "  p            paste clipboard",
    "  Space        menu",
    "  Ctrl+P       find file",
    "  Ctrl+T       shell",
    "  Ctrl+H/J/K/L move between panes and panels",
    "",
    "INSERT",
    "  Esc          normal mode",
    "  Enter        newline / accept completion",
    "  Tab          accept prediction or completion",
    "  Up Down      cycle completions",
    "  Ctrl+V       paste",
    "",
    "COMMANDS",
    "  :w [path]    save",
    "  :wq :x       save and close",
    "  :q :q!       close pane / quit",
    "  :tabnew [p]  new tab",
    "  :vsp :sp [p] split",
    "  :tree :e     file tree",
    "  :git         git panel",
    "  :tn          toggle line numbers",
    "  :commit msg  commit staged changes",
    "",
    "FILE TREE",
    "  Enter        open / enter directory",
    "  - Backspace  parent directory",
    "  a r d        create / rename / delete",
    "",
    "GIT PANEL",
    "  Space        stage / unstage",
    "  c C          commit / stage all and commit",
    "  Enter        diff",
    "  r i P        refresh / init / push",
];

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    match key.key {
        KeyCode::Escape | KeyCode::Space | KeyCode::Char('q') | KeyCode::Char('?') => {
            model.return_to_normal();
            model.ui.clear_status();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if model.ui.help_scroll + 1 < HELP_LINES.len() {
                model.ui.help_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            model.ui.help_scroll = model.ui.help_scroll.saturating_sub(1);
        }
        _ => return None,
    }
    Some(Cmd::Redraw)
}
