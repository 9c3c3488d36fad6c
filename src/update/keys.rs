//! Key routing
//!
//! Every key goes to exactly one handler, picked from a table keyed by the
//! current mode and, in the normal-family modes, the focused panel.

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::model::{AppModel, Focus, Mode, SplitKind};

use super::{
    command, commit, file_tree, finder, help, insert, merge, normal, prediction, vcs, which_key,
};

/// A key handler for one (mode, focus) cell
pub type KeyHandler = fn(&mut AppModel, Keystroke) -> Option<Cmd>;

/// The (Mode, Focus) table
pub fn handler_for(mode: Mode, focus: Focus) -> KeyHandler {
    match (mode, focus) {
        (Mode::Normal, Focus::Editor) => normal::handle_key,
        (Mode::Normal, Focus::Vcs) => vcs::handle_key,
        (Mode::Normal, Focus::FileTree) | (Mode::FileTree, _) => file_tree::handle_key,
        (Mode::Insert, _) => insert::handle_key,
        (Mode::Command, _) => command::handle_key,
        (Mode::FuzzyFind, _) => finder::handle_key,
        (Mode::WhichKey, _) => which_key::handle_key,
        (Mode::Help, _) => help::handle_key,
        (Mode::CommitMessage, _) => commit::handle_key,
    }
}

/// Route one keystroke
pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    let cmd = if key.is_ctrl('c') {
        cancel(model)
    } else if let Some(cmd) = spatial_navigation(model, key) {
        Some(cmd)
    } else {
        handler_for(model.mode, model.focus)(model, key)
    };
    // Any key invalidates a pending or visible prediction
    merge(cmd, prediction::on_keystroke(model))
}

/// Ctrl+C never quits: it backs out of insert and command input
fn cancel(model: &mut AppModel) -> Option<Cmd> {
    match model.mode {
        Mode::Insert => {
            model.completion.hide();
            model.mode = Mode::Normal;
            model.ui.set_status("Cancelled");
        }
        Mode::Command => {
            model.ui.input.clear();
            model.return_to_normal();
            model.ui.set_status("Cancelled");
        }
        _ => model.ui.set_status("Press :q to quit"),
    }
    Some(Cmd::Redraw)
}

/// Ctrl+H/J/K/L between split panes, the sidebar and the VCS panel.
/// Returns None when the key is not a navigation key here, so the mode
/// handler sees it.
fn spatial_navigation(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    let normal_family = matches!(model.mode, Mode::Normal | Mode::FileTree);
    if !normal_family || !key.mods.ctrl() || model.file_tree.prompt.is_some() {
        return None;
    }
    let KeyCode::Char(c) = key.key else {
        return None;
    };

    let moved = match (c, model.focus) {
        ('h', Focus::Editor) => {
            model.session.focus_pane(false, SplitKind::Vertical) || focus_if(model, Focus::FileTree)
        }
        ('h', Focus::Vcs) => focus_if(model, Focus::FileTree),
        ('l', Focus::FileTree) => focus_if(model, Focus::Editor),
        ('l', Focus::Editor) => model.session.focus_pane(true, SplitKind::Vertical),
        ('j', Focus::Editor) => {
            model.session.focus_pane(true, SplitKind::Horizontal) || focus_if(model, Focus::Vcs)
        }
        ('k', Focus::Vcs) => focus_if(model, Focus::Editor),
        ('k', Focus::Editor) => model.session.focus_pane(false, SplitKind::Horizontal),
        ('h' | 'j' | 'k' | 'l', _) => false,
        _ => return None,
    };

    // A navigation key with nowhere to go is still consumed
    moved.then_some(Cmd::Redraw).or(Some(Cmd::None))
}

/// Focus a panel if it is showing
fn focus_if(model: &mut AppModel, focus: Focus) -> bool {
    let visible = match focus {
        Focus::Editor => true,
        Focus::FileTree => model.file_tree.visible,
        Focus::Vcs => model.vcs.visible,
    };
    if visible {
        model.set_focus(focus);
    }
    visible
}
