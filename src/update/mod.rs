//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. `update` consumes
//! exactly one message and returns the side effects it wants performed.

mod app;
mod command;
mod commit;
mod completion;
mod file_tree;
mod finder;
mod help;
mod insert;
pub mod keys;
pub mod layout;
mod lsp;
mod normal;
mod prediction;
mod vcs;
mod which_key;

use std::path::PathBuf;

use crate::cli::StartupMode;
use crate::commands::Cmd;
use crate::messages::{InputMsg, Msg, PluginMsg};
use crate::model::AppModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use command::run_command;
pub use finder::update_finder;
pub use help::HELP_LINES;
pub use lsp::update_lsp;
pub use prediction::update_prediction;
pub use vcs::update_vcs;
pub use which_key::MENU_ENTRIES;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Input(InputMsg::Key(key)) => keys::handle_key(model, key),
        Msg::Input(InputMsg::Resize { cols, rows }) => {
            model.terminal_size = (cols, rows);
            Some(Cmd::Redraw)
        }
        Msg::App(m) => app::update_app(model, m),
        Msg::Vcs(m) => vcs::update_vcs(model, m),
        Msg::Finder(m) => finder::update_finder(model, m),
        Msg::Lsp(m) => lsp::update_lsp(model, m),
        Msg::Plugin(PluginMsg::Loaded(result)) => {
            if let Err(e) = &result {
                tracing::warn!(error = %e, "Plugin failed to load");
                model.ui.set_status(format!("Plugin error: {}", e));
            }
            model.plugin.install(result);
            Some(Cmd::Redraw)
        }
        Msg::Prediction(m) => prediction::update_prediction(model, m),
    };

    layout::sync_layout(model);
    let sync = lsp::sync_documents(model);
    merge(result, sync)
}

/// Commands issued once the terminal is up: open the initial file, load the
/// plugin, start the language server, read VCS status
pub fn startup(model: &mut AppModel, mode: StartupMode) -> Cmd {
    let mut cmds = Vec::new();

    match mode {
        StartupMode::Empty => {}
        StartupMode::File(path) => {
            let pane = model.session.active_pane().id;
            model.buffer_mut().path = Some(path.clone());
            model.session.active_tab_mut().refresh_name();
            cmds.push(Cmd::LoadFile {
                pane,
                path,
                tab_width: model.config.tab_width,
            });
        }
        StartupMode::Directory(path) => {
            model.file_tree.visible = true;
            model.set_focus(crate::model::Focus::FileTree);
            if let Some(cmd) = file_tree::load_root(model, path) {
                cmds.push(cmd);
            }
        }
    }

    cmds.push(Cmd::LoadPlugin {
        path: resolve(&model.cwd, &model.config.plugin_path),
    });

    if model.config.language_server.enabled {
        model.lsp.mark_starting();
        cmds.push(Cmd::StartLanguageServer {
            command: model.config.language_server.command.clone(),
            args: model.config.language_server.args.clone(),
            root: model.cwd.clone(),
        });
    } else {
        model.lsp.stop();
    }

    cmds.push(vcs::refresh(model));
    layout::sync_layout(model);
    Cmd::batch(cmds)
}

fn resolve(cwd: &std::path::Path, path: &std::path::Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Combine two optional commands into one
pub(crate) fn merge(a: Option<Cmd>, b: Option<Cmd>) -> Option<Cmd> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => Some(Cmd::batch(vec![a, b])),
    }
}

/// Traced update wrapper (debug builds only)
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg.name();
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    debug!(target: "message", msg = %msg_name, mode = %model.mode, "processing");

    let result = update_inner(model, msg);

    debug_assert!(
        model.buffer().cursor_column <= model.buffer().line_len(model.buffer().cursor_line),
        "cursor column out of range after {}",
        msg_name
    );

    result
}
