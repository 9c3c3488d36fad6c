//! Application model - the complete state of the editor
//!
//! One `AppModel` value exists for the whole session. Only the reducer in
//! `crate::update` mutates it, one message at a time.

pub mod buffer;
pub mod completion;
pub mod file_tree;
pub mod finder;
pub mod mode;
pub mod pane;
pub mod session;
pub mod ui;
pub mod vcs;

pub use buffer::{Buffer, Position};
pub use completion::{CompletionState, PredictionState};
pub use file_tree::{FileTreeState, TreeEntry, TreePrompt};
pub use finder::FinderState;
pub use mode::{Focus, Mode};
pub use pane::{Pane, Rect};
pub use session::{CloseOutcome, PaneId, Session, SplitKind, Tab, TabId};
pub use ui::UiState;
pub use vcs::VcsPanelState;

use std::path::PathBuf;

use crate::config::EditorConfig;
use crate::lsp::{self, LspClient};
use crate::plugin::PluginBridge;

/// Width of the line number gutter in cells (e.g. " 123 ")
pub const LINE_NUMBER_GUTTER_CHARS: u16 = 5;

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    pub session: Session,
    pub mode: Mode,
    pub focus: Focus,
    /// UI state (status bar, command line)
    pub ui: UiState,
    pub file_tree: FileTreeState,
    pub vcs: VcsPanelState,
    /// Present while the fuzzy finder is open
    pub finder: Option<FinderState>,
    pub completion: CompletionState,
    pub prediction: PredictionState,
    pub lsp: LspClient,
    pub plugin: PluginBridge,
    pub config: EditorConfig,
    /// Terminal dimensions in cells
    pub terminal_size: (u16, u16),
    /// Working directory; root for the finder, VCS and language server
    pub cwd: PathBuf,
}

impl AppModel {
    /// Create a model with one empty buffer
    pub fn new(config: EditorConfig, cwd: PathBuf, cols: u16, rows: u16) -> Self {
        let mut buffer = Buffer::new();
        buffer.indent_width = config.tab_width;
        Self {
            session: Session::new(buffer),
            mode: Mode::Normal,
            focus: Focus::Editor,
            ui: UiState::new(config.show_line_numbers),
            file_tree: FileTreeState::new(cwd.clone()),
            vcs: VcsPanelState::new(cwd.clone()),
            finder: None,
            completion: CompletionState::new(config.completion_enabled),
            prediction: PredictionState::default(),
            lsp: LspClient::new(lsp::path_to_uri(&cwd)),
            plugin: PluginBridge::default(),
            config,
            terminal_size: (cols, rows),
            cwd,
        }
    }

    /// Buffer of the active pane (read-only)
    #[inline]
    pub fn buffer(&self) -> &Buffer {
        self.session.active_buffer()
    }

    /// Buffer of the active pane (mutable)
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.session.active_buffer_mut()
    }

    /// A fresh buffer carrying the configured indent width
    pub fn empty_buffer(&self) -> Buffer {
        let mut buffer = Buffer::new();
        buffer.indent_width = self.config.tab_width;
        buffer
    }

    /// Give input focus to a panel; the tree has its own mode
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.mode = match focus {
            Focus::FileTree => Mode::FileTree,
            Focus::Editor | Focus::Vcs => Mode::Normal,
        };
    }

    /// Leave any transient mode and return to the focused panel
    pub fn return_to_normal(&mut self) {
        self.set_focus(self.focus);
    }
}
