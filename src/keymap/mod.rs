//! Keyboard input types
//!
//! ```text
//! crossterm::KeyEvent → Keystroke → update::keys (Mode, Focus) handler
//! ```

mod crossterm_adapter;
mod types;

pub use crossterm_adapter::keystroke_from_crossterm;
pub use types::{KeyCode, Keystroke, Modifiers};
