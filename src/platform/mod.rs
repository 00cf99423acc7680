//! Platform layer
//!
//! Handles the outside world for the native terminal build:
//! - Keyboard input on a listener thread
//! - Raw-mode screen output

pub mod input;
pub mod terminal;

pub use input::{InputReceiver, InputSender, InputSignal, input_channel, spawn_key_listener};
pub use terminal::TerminalScreen;
