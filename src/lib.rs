//! Kestrel - a modal terminal text editor
//!
//! The editor follows the Elm Architecture: all state lives in
//! [`AppModel`], keys and task results arrive as [`Msg`] values, and
//! `update::update` turns each one into an optional [`Cmd`] that the
//! runtime executes off the main thread.

pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod config_paths;
pub mod fileio;
pub mod finder;
pub mod keymap;
pub mod lsp;
pub mod messages;
pub mod model;
pub mod plugin;
pub mod runtime;
pub mod tracing;
pub mod update;
pub mod vcs;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use messages::Msg;
pub use model::AppModel;
