//! VCS panel keys and git results

use crate::commands::Cmd;
use crate::keymap::{KeyCode, Keystroke};
use crate::messages::VcsMsg;
use crate::model::{AppModel, Focus, Mode};
use crate::vcs::{self, PushEvent};

use super::app;

/// Re-read status for the panel root
pub(super) fn refresh(model: &mut AppModel) -> Cmd {
    model.vcs.loading = true;
    Cmd::VcsRefresh {
        root: model.vcs.root.clone(),
    }
}

/// `:git` - show and focus the panel, or hide it
pub(super) fn toggle(model: &mut AppModel) -> Option<Cmd> {
    if model.vcs.visible {
        model.vcs.visible = false;
        if model.focus == Focus::Vcs {
            model.set_focus(Focus::Editor);
        }
        return Some(Cmd::Redraw);
    }
    model.vcs.visible = true;
    model.set_focus(Focus::Vcs);
    Some(refresh(model))
}

pub(super) fn commit(model: &mut AppModel, message: String) -> Cmd {
    model.vcs.loading = true;
    model.ui.set_status("Committing...");
    Cmd::VcsCommit {
        root: model.vcs.root.clone(),
        message,
    }
}

/// Commits need a repository; `i` creates one
fn require_repo(model: &mut AppModel) -> bool {
    if !model.vcs.snapshot.is_repo {
        model.ui.set_status("Not a git repository (press i to initialize)");
    }
    model.vcs.snapshot.is_repo
}

fn start_commit_message(model: &mut AppModel) {
    model.mode = Mode::CommitMessage;
    model.ui.input.clear();
    model.ui.set_status("Commit message (Enter to commit, Esc to abort)");
}

pub fn handle_key(model: &mut AppModel, key: Keystroke) -> Option<Cmd> {
    if key.mods.ctrl() || key.mods.alt() {
        return None;
    }
    let root = model.vcs.root.clone();

    match key.key {
        KeyCode::Char('j') | KeyCode::Down => model.vcs.select_next(),
        KeyCode::Char('k') | KeyCode::Up => model.vcs.select_prev(),
        KeyCode::Space => {
            let entry = model.vcs.selected_entry()?.clone();
            model.vcs.loading = true;
            return Some(Cmd::VcsToggleStage {
                root,
                path: entry.path,
                staged: entry.staged,
            });
        }
        KeyCode::Char('c') => {
            if require_repo(model) {
                start_commit_message(model);
            }
        }
        KeyCode::Char('C') => {
            if !require_repo(model) {
                return Some(Cmd::Redraw);
            }
            if model.vcs.staging_all {
                model.ui.set_status("Already staging changes");
                return Some(Cmd::Redraw);
            }
            // The prompt opens once staging has finished
            model.vcs.staging_all = true;
            model.vcs.loading = true;
            model.ui.set_status("Staging all changes...");
            return Some(Cmd::VcsStageAll { root });
        }
        KeyCode::Char('r') => return Some(refresh(model)),
        KeyCode::Char('i') => {
            model.ui.set_status("Initializing repository...");
            return Some(Cmd::VcsInit { path: root });
        }
        KeyCode::Char('P') => {
            if model.vcs.pushing {
                model.ui.set_status("Push already running");
            } else {
                model.vcs.pushing = true;
                model.ui.set_status("Pushing...");
                return Some(Cmd::VcsPush { root });
            }
        }
        KeyCode::Enter => {
            let entry = model.vcs.selected_entry()?.clone();
            return Some(Cmd::VcsDiff { root, entry });
        }
        KeyCode::Char('E') => {
            return app::open_in_new_tab(model, Some(root.join(".git").join("config")));
        }
        KeyCode::Escape => {
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

/// Handle VCS messages
pub fn update_vcs(model: &mut AppModel, msg: VcsMsg) -> Option<Cmd> {
    match msg {
        VcsMsg::StatusLoaded { root, result } => {
            if root != model.vcs.root {
                tracing::debug!(root = %root.display(), "Dropping status for another root");
                return None;
            }
            match result {
                Ok(snapshot) => model.vcs.apply_snapshot(snapshot),
                Err(e) => {
                    model.vcs.loading = false;
                    tracing::warn!(error = %e, "git status failed");
                    model.ui.set_status(format!("Git error: {}", e));
                }
            }
            Some(Cmd::Redraw)
        }

        VcsMsg::OpCompleted(result) => {
            match result {
                Ok(summary) => model.ui.set_status(summary),
                Err(e) => {
                    tracing::warn!(error = %e, "git command failed");
                    model.ui.set_status(format!("Git error: {}", e));
                }
            }
            Some(refresh(model))
        }

        VcsMsg::StagedAll(result) => {
            model.vcs.staging_all = false;
            match result {
                Ok(_) if model.mode == Mode::Normal && model.focus == Focus::Vcs => {
                    start_commit_message(model);
                }
                Ok(summary) => model.ui.set_status(summary),
                Err(e) => {
                    tracing::warn!(error = %e, "git add -A failed");
                    model.ui.set_status(format!("Git error: {}", e));
                }
            }
            Some(refresh(model))
        }

        VcsMsg::DiffLoaded { title, result } => {
            match result {
                Ok(text) => {
                    let mut buffer = model.empty_buffer();
                    buffer.set_text(&text);
                    buffer.cursor_line = 0;
                    buffer.cursor_column = 0;
                    buffer.modified = false;
                    let pane = model.session.active_pane_mut();
                    pane.buffer = buffer;
                    pane.scroll = 0;
                    model.session.active_tab_mut().name = title;
                    model.set_focus(Focus::Editor);
                }
                Err(e) => model.ui.set_status(format!("Git error: {}", e)),
            }
            Some(Cmd::Redraw)
        }

        VcsMsg::PushStarted(channel) => Some(Cmd::AwaitPushEvent { channel }),

        VcsMsg::PushEvent { event, channel } => {
            match event {
                PushEvent::Line(line) => model.ui.set_status(format!("GIT: {}", line)),
                PushEvent::Finished(Ok(())) => model.ui.set_status("Push complete"),
                PushEvent::Finished(Err(e)) if vcs::is_auth_failure(&e) => {
                    tracing::warn!(error = %e, "Push rejected for missing credentials");
                    model.ui.set_status(
                        "Push failed: authentication required (set up a credential helper or SSH key)",
                    );
                }
                PushEvent::Finished(Err(e)) => {
                    tracing::warn!(error = %e, "Push failed");
                    model.ui.set_status(format!("Push failed: {}", e));
                }
            }
            Some(Cmd::batch(vec![Cmd::Redraw, Cmd::AwaitPushEvent { channel }]))
        }

        VcsMsg::PushClosed => {
            model.vcs.pushing = false;
            Some(refresh(model))
        }
    }
}
