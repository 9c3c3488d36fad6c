//! Editing mode and panel focus

use std::fmt;

/// The single, session-wide input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// Typing an ex command after `:`
    Command,
    /// Navigating the file tree sidebar
    FileTree,
    FuzzyFind,
    WhichKey,
    Help,
    /// Typing a commit message
    CommitMessage,
}

impl Mode {
    /// Label shown in the status bar
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::FileTree => "TREE",
            Mode::FuzzyFind => "FIND",
            Mode::WhichKey => "MENU",
            Mode::Help => "HELP",
            Mode::CommitMessage => "COMMIT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which panel receives keys in the normal-family modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Focus {
    #[default]
    Editor,
    FileTree,
    Vcs,
}
