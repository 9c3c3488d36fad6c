//! Event loop
//!
//! One thread owns the model. Each iteration polls the terminal briefly, then
//! drains the message queue that background tasks write to, feeding every
//! message through `update` in arrival order. Redraws happen once per
//! iteration at most.

use std::process::Command;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use crate::commands::Cmd;
use crate::keymap::keystroke_from_crossterm;
use crate::messages::{AppMsg, Msg};
use crate::model::AppModel;
use crate::update::update;
use crate::view::Renderer;

use super::dispatch::{Dispatcher, Outcome};
use super::terminal::TerminalGuard;

/// Terminal poll interval; also bounds queue latency
const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    model: AppModel,
    dispatcher: Dispatcher,
    msg_rx: Receiver<Msg>,
    renderer: Renderer,
    needs_redraw: bool,
}

impl App {
    pub fn new(model: AppModel) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            dispatcher: Dispatcher::new(msg_tx),
            msg_rx,
            renderer: Renderer::new(),
            needs_redraw: true,
        }
    }

    /// Run until the user quits. `startup` is dispatched once the terminal is up.
    pub fn run(mut self, startup: Cmd) -> Result<()> {
        let mut terminal = TerminalGuard::enter().context("failed to initialize terminal")?;
        tracing::info!("Editor started");

        let result = self.event_loop(&mut terminal, startup);

        self.dispatcher.shutdown();
        drop(terminal);
        tracing::info!("Editor exited");
        result
    }

    fn event_loop(&mut self, terminal: &mut TerminalGuard, startup: Cmd) -> Result<()> {
        if self.process_cmd(terminal, startup)? {
            return Ok(());
        }

        loop {
            if self.needs_redraw {
                self.renderer.draw(&self.model)?;
                self.needs_redraw = false;
            }

            if event::poll(POLL_INTERVAL)? {
                let msg = match event::read()? {
                    Event::Key(key) => keystroke_from_crossterm(&key).map(Msg::key),
                    Event::Resize(cols, rows) => Some(Msg::resize(cols, rows)),
                    _ => None,
                };
                if let Some(msg) = msg {
                    // Input always repaints, even when the key was a no-op
                    self.needs_redraw = true;
                    if self.handle_msg(terminal, msg)? {
                        return Ok(());
                    }
                }
            }

            while let Ok(msg) = self.msg_rx.try_recv() {
                if self.handle_msg(terminal, msg)? {
                    return Ok(());
                }
            }
        }
    }

    /// Reduce one message. Returns true when the program should exit.
    fn handle_msg(&mut self, terminal: &mut TerminalGuard, msg: Msg) -> Result<bool> {
        match update(&mut self.model, msg) {
            Some(cmd) => self.process_cmd(terminal, cmd),
            None => Ok(false),
        }
    }

    fn process_cmd(&mut self, terminal: &mut TerminalGuard, cmd: Cmd) -> Result<bool> {
        if cmd.needs_redraw() {
            self.needs_redraw = true;
        }
        match self.dispatcher.dispatch(cmd) {
            Outcome::Continue => Ok(false),
            Outcome::Quit => Ok(true),
            Outcome::Shell(shell) => {
                let result = run_shell(terminal, &shell)?;
                self.renderer.invalidate();
                self.handle_msg(terminal, Msg::App(AppMsg::ShellExited(result)))
            }
        }
    }
}

/// Suspend the editor and run an interactive shell in the same terminal
fn run_shell(terminal: &mut TerminalGuard, shell: &str) -> Result<Result<(), String>> {
    terminal.suspend()?;
    tracing::info!(shell, "Spawning shell");
    println!("Type 'exit' to return to the editor.");

    let result = match Command::new(shell).status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => {
            tracing::debug!(%status, "Shell exited with failure");
            Ok(())
        }
        Err(e) => Err(format!("{}: {}", shell, e)),
    };

    terminal.resume()?;
    Ok(result)
}
