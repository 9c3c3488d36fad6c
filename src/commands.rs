//! Command types for the Elm-style architecture
//!
//! Commands are the side effects an update asks for. Each variant is plain
//! data; `runtime::dispatch::Dispatcher` interprets them, and every background
//! task answers with exactly one message.

use std::path::PathBuf;

use serde_json::Value;

use crate::messages::StreamChannel;
use crate::model::session::PaneId;
use crate::vcs::{PushEvent, StatusEntry};

/// Commands returned by update functions
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of the UI
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
    /// Request application exit
    Quit,

    // === File I/O ===
    /// Read a file into `pane`, expanding tabs; replies `AppMsg::FileLoaded`
    LoadFile {
        pane: PaneId,
        path: PathBuf,
        tab_width: usize,
    },
    /// Write prepared content; replies `AppMsg::FileSaved`
    SaveFile {
        pane: PaneId,
        revision: u64,
        path: PathBuf,
        content: String,
        close_after: bool,
    },
    /// List a directory for the file tree; replies `AppMsg::DirectoryLoaded`
    LoadDirectory { path: PathBuf },
    CreatePath { path: PathBuf, is_dir: bool },
    RenamePath { from: PathBuf, to: PathBuf },
    DeletePath { path: PathBuf },
    /// Recursive scan for the fuzzy finder
    ScanFiles { root: PathBuf },
    ReadClipboard,

    // === Plugin ===
    LoadPlugin { path: PathBuf },

    // === Language server ===
    StartLanguageServer {
        command: String,
        args: Vec<String>,
        root: PathBuf,
    },
    /// Write one already-encoded frame to the server
    LspSend { frame: Vec<u8> },
    /// Wait for the next server frame
    AwaitLspFrame { channel: StreamChannel<Value> },

    // === Version control ===
    VcsRefresh { root: PathBuf },
    VcsToggleStage {
        root: PathBuf,
        path: String,
        staged: bool,
    },
    VcsStageAll { root: PathBuf },
    VcsCommit { root: PathBuf, message: String },
    VcsInit { path: PathBuf },
    VcsDiff { root: PathBuf, entry: StatusEntry },
    VcsPush { root: PathBuf },
    /// Wait for the next push output line
    AwaitPushEvent { channel: StreamChannel<PushEvent> },

    // === Timers and processes ===
    /// Sleep, then report `PredictionMsg::DebounceElapsed`
    PredictionDebounce { generation: u64, delay_ms: u64 },
    /// Suspend the TUI and run an interactive shell
    SpawnShell { shell: String },
}

impl Cmd {
    /// Create a batch of commands, flattening away no-ops
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            // Quit doesn't need redraw - app is exiting
            Cmd::Quit => false,
            // Background work redraws when its result message arrives
            Cmd::LspSend { .. }
            | Cmd::AwaitLspFrame { .. }
            | Cmd::AwaitPushEvent { .. }
            | Cmd::PredictionDebounce { .. } => false,
            _ => true,
        }
    }

    /// Iterate this command and any nested batch members, depth first
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            other => vec![other],
        }
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
