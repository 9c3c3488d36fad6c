//! Command interpreter
//!
//! Every `Cmd` that needs I/O runs on its own thread and answers with exactly
//! one `Msg` on the shared queue. `dispatch` itself never blocks; the only
//! state it keeps is the language-server process handle.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::commands::Cmd;
use crate::fileio;
use crate::finder;
use crate::lsp::LspProcess;
use crate::messages::{
    stream_channel, AppMsg, FinderMsg, LspMsg, Msg, PluginMsg, PredictionMsg, StreamChannel,
    VcsMsg,
};
use crate::model::file_tree;
use crate::plugin;
use crate::vcs::{Git, PushEvent};

/// What the main loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// Suspend the terminal and run this shell
    Shell(String),
}

impl Outcome {
    /// The most significant of two outcomes; quitting wins
    fn merge(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Quit, _) | (_, Outcome::Quit) => Outcome::Quit,
            (Outcome::Shell(s), _) | (_, Outcome::Shell(s)) => Outcome::Shell(s),
            _ => Outcome::Continue,
        }
    }
}

pub struct Dispatcher {
    tx: Sender<Msg>,
    lsp: Option<LspProcess>,
}

impl Dispatcher {
    pub fn new(tx: Sender<Msg>) -> Self {
        Self { tx, lsp: None }
    }

    /// Run `f` on a worker thread and queue its message
    fn spawn<F>(&self, f: F)
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(f());
        });
    }

    pub fn dispatch(&mut self, cmd: Cmd) -> Outcome {
        match cmd {
            Cmd::None | Cmd::Redraw => {}
            Cmd::Quit => return Outcome::Quit,
            Cmd::Batch(cmds) => {
                return cmds
                    .into_iter()
                    .fold(Outcome::Continue, |acc, cmd| acc.merge(self.dispatch(cmd)));
            }
            Cmd::SpawnShell { shell } => return Outcome::Shell(shell),

            // =================================================================
            // Files
            // =================================================================
            Cmd::LoadFile {
                pane,
                path,
                tab_width,
            } => self.spawn(move || {
                let result = fileio::read_for_edit(&path, tab_width);
                Msg::App(AppMsg::FileLoaded { pane, path, result })
            }),
            Cmd::SaveFile {
                pane,
                revision,
                path,
                content,
                close_after,
            } => self.spawn(move || {
                let result = fileio::write_file(&path, &content);
                Msg::App(AppMsg::FileSaved {
                    pane,
                    revision,
                    result,
                    close_after,
                })
            }),
            Cmd::LoadDirectory { path } => self.spawn(move || {
                let result = file_tree::list_directory(&path).map_err(|e| e.to_string());
                Msg::App(AppMsg::DirectoryLoaded { path, result })
            }),
            Cmd::CreatePath { path, is_dir } => self.spawn(move || {
                let result = if is_dir {
                    std::fs::create_dir_all(&path)
                } else {
                    create_empty_file(&path)
                };
                fs_op_msg(result, format!("Created {}", path.display()))
            }),
            Cmd::RenamePath { from, to } => self.spawn(move || {
                let result = std::fs::rename(&from, &to);
                fs_op_msg(result, format!("Renamed to {}", to.display()))
            }),
            Cmd::DeletePath { path } => self.spawn(move || {
                let result = if path.is_dir() {
                    std::fs::remove_dir_all(&path)
                } else {
                    std::fs::remove_file(&path)
                };
                fs_op_msg(result, format!("Deleted {}", path.display()))
            }),
            Cmd::ScanFiles { root } => self.spawn(move || {
                let result = finder::scan_files(&root).map_err(|e| e.to_string());
                Msg::Finder(FinderMsg::ScanCompleted { root, result })
            }),
            Cmd::ReadClipboard => self.spawn(|| {
                let result = arboard::Clipboard::new()
                    .and_then(|mut clipboard| clipboard.get_text())
                    .map_err(|e| e.to_string());
                Msg::App(AppMsg::ClipboardRead(result))
            }),

            // =================================================================
            // Plugin
            // =================================================================
            Cmd::LoadPlugin { path } => self.spawn(move || {
                let result = plugin::load(&path).map_err(|e| e.to_string());
                Msg::Plugin(PluginMsg::Loaded(result))
            }),

            // =================================================================
            // Language server
            // =================================================================
            Cmd::StartLanguageServer {
                command,
                args,
                root,
            } => self.start_language_server(&command, &args, &root),
            Cmd::LspSend { frame } => match &self.lsp {
                Some(process) if process.send(frame) => {}
                _ => tracing::debug!("Dropping frame for a stopped language server"),
            },
            Cmd::AwaitLspFrame { channel } => self.spawn(move || match recv(&channel) {
                Some(frame) => Msg::Lsp(LspMsg::Frame { frame, channel }),
                None => Msg::Lsp(LspMsg::Closed),
            }),

            // =================================================================
            // Version control
            // =================================================================
            Cmd::VcsRefresh { root } => self.spawn(move || {
                let result = Git::new(&root).snapshot().map_err(|e| e.to_string());
                Msg::Vcs(VcsMsg::StatusLoaded { root, result })
            }),
            Cmd::VcsToggleStage { root, path, staged } => self.spawn(move || {
                let git = Git::new(root);
                let result = if staged {
                    git.unstage(&path).map(|_| format!("Unstaged {}", path))
                } else {
                    git.stage(&path).map(|_| format!("Staged {}", path))
                };
                Msg::Vcs(VcsMsg::OpCompleted(result.map_err(|e| e.to_string())))
            }),
            Cmd::VcsStageAll { root } => self.spawn(move || {
                let result = Git::new(root)
                    .stage_all()
                    .map(|_| "Staged all changes".to_string())
                    .map_err(|e| e.to_string());
                Msg::Vcs(VcsMsg::StagedAll(result))
            }),
            Cmd::VcsCommit { root, message } => self.spawn(move || {
                let result = Git::new(root).commit(&message).map_err(|e| e.to_string());
                Msg::Vcs(VcsMsg::OpCompleted(result))
            }),
            Cmd::VcsInit { path } => self.spawn(move || {
                let result = Git::new(&path)
                    .init()
                    .map(|_| format!("Initialized repository in {}", path.display()))
                    .map_err(|e| e.to_string());
                Msg::Vcs(VcsMsg::OpCompleted(result))
            }),
            Cmd::VcsDiff { root, entry } => self.spawn(move || {
                let title = format!("diff {}", entry.path);
                let result = Git::new(root).diff(&entry).map_err(|e| e.to_string());
                Msg::Vcs(VcsMsg::DiffLoaded { title, result })
            }),
            Cmd::VcsPush { root } => {
                let (events, channel) = stream_channel::<PushEvent>();
                std::thread::spawn(move || Git::new(root).push_streaming(&events));
                let _ = self.tx.send(Msg::Vcs(VcsMsg::PushStarted(channel)));
            }
            Cmd::AwaitPushEvent { channel } => self.spawn(move || match recv(&channel) {
                Some(event) => Msg::Vcs(VcsMsg::PushEvent { event, channel }),
                None => Msg::Vcs(VcsMsg::PushClosed),
            }),

            // =================================================================
            // Timers
            // =================================================================
            Cmd::PredictionDebounce {
                generation,
                delay_ms,
            } => self.spawn(move || {
                std::thread::sleep(Duration::from_millis(delay_ms));
                Msg::Prediction(PredictionMsg::DebounceElapsed { generation })
            }),
        }
        Outcome::Continue
    }

    fn start_language_server(&mut self, command: &str, args: &[String], root: &Path) {
        let result = match LspProcess::spawn(command, args, root) {
            Ok((process, inbound)) => {
                self.lsp = Some(process);
                Ok(inbound)
            }
            Err(e) => Err(e.to_string()),
        };
        let _ = self.tx.send(Msg::Lsp(LspMsg::Started(result)));
    }

    /// Kill the language server, if any
    pub fn shutdown(&mut self) {
        if let Some(mut process) = self.lsp.take() {
            process.shutdown();
        }
    }
}

/// Take one item from a stream; `None` once the producer is gone
fn recv<T>(channel: &StreamChannel<T>) -> Option<T> {
    let rx = match channel.lock() {
        Ok(rx) => rx,
        Err(poisoned) => poisoned.into_inner(),
    };
    rx.recv().ok()
}

fn create_empty_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(drop)
}

fn fs_op_msg(result: std::io::Result<()>, summary: String) -> Msg {
    Msg::App(AppMsg::FsOpCompleted(
        result.map(|_| summary).map_err(|e| e.to_string()),
    ))
}
