//! Raw mode and alternate screen, restored on drop and on panic

use std::io;

use crossterm::{cursor, execute, terminal};

/// RAII guard for the editor's terminal state
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen
    pub fn enter() -> io::Result<Self> {
        activate()?;

        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = deactivate();
            default_hook(info);
        }));

        Ok(Self { active: true })
    }

    /// Hand the terminal to a child process
    pub fn suspend(&mut self) -> io::Result<()> {
        if self.active {
            deactivate()?;
            self.active = false;
        }
        Ok(())
    }

    /// Take the terminal back after `suspend`
    pub fn resume(&mut self) -> io::Result<()> {
        if !self.active {
            activate()?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = deactivate();
        }
        let _ = std::panic::take_hook();
    }
}

fn activate() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        io::stdout(),
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    )
}

fn deactivate() -> io::Result<()> {
    execute!(
        io::stdout(),
        cursor::Show,
        cursor::SetCursorStyle::DefaultUserShape,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()
}
