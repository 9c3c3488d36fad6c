//! Runtime - terminal integration and the command interpreter
//!
//! - `app` - the event loop: input polling, the message queue, rendering
//! - `dispatch` - runs `Cmd`s on worker threads
//! - `terminal` - raw mode / alternate screen guard

pub mod app;
pub mod dispatch;
pub mod terminal;

pub use app::App;
pub use dispatch::{Dispatcher, Outcome};
