//! Message types for the Elm-style architecture
//!
//! Every state change flows through these types. Key presses and the result of
//! every background task arrive on the same queue and are reduced one at a time.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::keymap::Keystroke;
use crate::model::file_tree::TreeEntry;
use crate::model::session::PaneId;
use crate::plugin::PluginHost;
use crate::vcs::{PushEvent, VcsSnapshot};

/// Receiving end of a one-directional stream (server frames, push output).
///
/// Shared so a waiting task can take one item and hand the channel back with
/// the message it produces. The producer closes the stream by dropping its
/// sender.
pub type StreamChannel<T> = Arc<Mutex<Receiver<T>>>;

/// Create a stream: the sender goes to the producer thread
pub fn stream_channel<T>() -> (Sender<T>, StreamChannel<T>) {
    let (tx, rx) = mpsc::channel();
    (tx, Arc::new(Mutex::new(rx)))
}

/// Terminal input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMsg {
    Key(Keystroke),
    Resize { cols: u16, rows: u16 },
}

/// File and process completions
#[derive(Debug)]
pub enum AppMsg {
    /// File read finished; `Ok(None)` means the file does not exist yet
    FileLoaded {
        pane: PaneId,
        path: PathBuf,
        result: Result<Option<String>, String>,
    },
    /// Save finished; `revision` is the buffer revision that was written
    FileSaved {
        pane: PaneId,
        revision: u64,
        result: Result<String, String>,
        close_after: bool,
    },
    DirectoryLoaded {
        path: PathBuf,
        result: Result<Vec<TreeEntry>, String>,
    },
    /// Create/rename/delete in the file tree finished
    FsOpCompleted(Result<String, String>),
    ClipboardRead(Result<String, String>),
    /// The interactive shell returned control to the editor
    ShellExited(Result<(), String>),
}

/// Version-control results
#[derive(Debug)]
pub enum VcsMsg {
    StatusLoaded {
        root: PathBuf,
        result: Result<VcsSnapshot, String>,
    },
    /// Stage/unstage/commit/init finished
    OpCompleted(Result<String, String>),
    /// `git add -A` before a commit finished
    StagedAll(Result<String, String>),
    DiffLoaded {
        title: String,
        result: Result<String, String>,
    },
    PushStarted(StreamChannel<PushEvent>),
    PushEvent {
        event: PushEvent,
        channel: StreamChannel<PushEvent>,
    },
    /// Push output stream closed
    PushClosed,
}

#[derive(Debug)]
pub enum FinderMsg {
    ScanCompleted {
        root: PathBuf,
        result: Result<Vec<String>, String>,
    },
}

/// Language-server transport events
#[derive(Debug)]
pub enum LspMsg {
    Started(Result<StreamChannel<Value>, String>),
    Frame {
        frame: Value,
        channel: StreamChannel<Value>,
    },
    /// Server output reached EOF
    Closed,
}

#[derive(Debug)]
pub enum PluginMsg {
    Loaded(Result<Option<Box<dyn PluginHost>>, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionMsg {
    /// Quiet period after a keystroke ended
    DebounceElapsed { generation: u64 },
}

/// Top-level message type
#[derive(Debug)]
pub enum Msg {
    Input(InputMsg),
    App(AppMsg),
    Vcs(VcsMsg),
    Finder(FinderMsg),
    Lsp(LspMsg),
    Plugin(PluginMsg),
    Prediction(PredictionMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn key(keystroke: Keystroke) -> Self {
        Msg::Input(InputMsg::Key(keystroke))
    }

    pub fn resize(cols: u16, rows: u16) -> Self {
        Msg::Input(InputMsg::Resize { cols, rows })
    }

    /// Short name used for the update tracing span
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Input(InputMsg::Key(_)) => "Input::Key",
            Msg::Input(InputMsg::Resize { .. }) => "Input::Resize",
            Msg::App(m) => match m {
                AppMsg::FileLoaded { .. } => "App::FileLoaded",
                AppMsg::FileSaved { .. } => "App::FileSaved",
                AppMsg::DirectoryLoaded { .. } => "App::DirectoryLoaded",
                AppMsg::FsOpCompleted(_) => "App::FsOpCompleted",
                AppMsg::ClipboardRead(_) => "App::ClipboardRead",
                AppMsg::ShellExited(_) => "App::ShellExited",
            },
            Msg::Vcs(m) => match m {
                VcsMsg::StatusLoaded { .. } => "Vcs::StatusLoaded",
                VcsMsg::OpCompleted(_) => "Vcs::OpCompleted",
                VcsMsg::StagedAll(_) => "Vcs::StagedAll",
                VcsMsg::DiffLoaded { .. } => "Vcs::DiffLoaded",
                VcsMsg::PushStarted(_) => "Vcs::PushStarted",
                VcsMsg::PushEvent { .. } => "Vcs::PushEvent",
                VcsMsg::PushClosed => "Vcs::PushClosed",
            },
            Msg::Finder(FinderMsg::ScanCompleted { .. }) => "Finder::ScanCompleted",
            Msg::Lsp(m) => match m {
                LspMsg::Started(_) => "Lsp::Started",
                LspMsg::Frame { .. } => "Lsp::Frame",
                LspMsg::Closed => "Lsp::Closed",
            },
            Msg::Plugin(PluginMsg::Loaded(_)) => "Plugin::Loaded",
            Msg::Prediction(PredictionMsg::DebounceElapsed { .. }) => "Prediction::DebounceElapsed",
        }
    }
}
