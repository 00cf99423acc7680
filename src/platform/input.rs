//! Keyboard input
//!
//! A background thread maps key presses to signals and publishes them into a
//! single-slot channel. The game loop takes at most the latest one per tick.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::watch;
use tokio::sync::watch::error::SendError;

use crate::sim::Direction;

/// Pause after a failed terminal read before trying again
const READ_RETRY: Duration = Duration::from_millis(50);

/// A player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    MoveUp,
    MoveDown,
    Quit,
}

impl InputSignal {
    /// Lane change requested by this signal
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputSignal::MoveUp => Some(Direction::Up),
            InputSignal::MoveDown => Some(Direction::Down),
            InputSignal::Quit => None,
        }
    }
}

/// Map a key event to a signal; only presses count
pub fn signal_for_key(key: &KeyEvent) -> Option<InputSignal> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(InputSignal::MoveUp),
        KeyCode::Down => Some(InputSignal::MoveDown),
        KeyCode::Esc => Some(InputSignal::Quit),
        // Raw mode swallows SIGINT
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputSignal::Quit)
        }
        _ => None,
    }
}

/// Writer half of the input slot
#[derive(Debug)]
pub struct InputSender {
    tx: watch::Sender<Option<InputSignal>>,
}

impl InputSender {
    /// Overwrite the pending signal. Fails once the receiver is gone.
    pub fn publish(&self, signal: InputSignal) -> Result<(), SendError<Option<InputSignal>>> {
        self.tx.send(Some(signal))
    }
}

/// Reader half of the input slot
#[derive(Debug)]
pub struct InputReceiver {
    rx: watch::Receiver<Option<InputSignal>>,
}

impl InputReceiver {
    /// The most recent signal published since the last call, if any
    pub fn take_latest(&mut self) -> Option<InputSignal> {
        match self.rx.has_changed() {
            Ok(true) => *self.rx.borrow_and_update(),
            // Listener gone or nothing new
            _ => None,
        }
    }
}

/// Create a connected single-slot input channel
pub fn input_channel() -> (InputSender, InputReceiver) {
    let (tx, rx) = watch::channel(None);
    (InputSender { tx }, InputReceiver { rx })
}

/// Spawn the key listener thread
///
/// The thread ends after the receiver has been dropped and the next key is read.
pub fn spawn_key_listener(sender: InputSender) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("key-listener".to_string())
        .spawn(move || listen(sender))
}

fn listen(sender: InputSender) {
    loop {
        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Failed to read terminal event: {e}");
                thread::sleep(READ_RETRY);
                continue;
            }
        };
        let Some(signal) = signal_for_key(&key) else {
            continue;
        };
        log::trace!("Input {signal:?}");
        if sender.publish(signal).is_err() {
            log::debug!("Input receiver dropped, stopping key listener");
            return;
        }
    }
}
