//! Terminal screen backed by crossterm
//!
//! Owns raw mode and the alternate screen for the lifetime of a run.

use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor, execute, queue,
    style::{self, Color},
    terminal::{self, ClearType},
};

use crate::game::FrameSink;
use crate::renderer::{Frame, Tint};

/// Terminal color for a tint
pub fn color_for(tint: Tint) -> Option<Color> {
    match tint {
        Tint::Plain => None,
        Tint::Obstacle => Some(Color::Red),
        Tint::PowerUp | Tint::Shield => Some(Color::Green),
        Tint::Divider => Some(Color::Yellow),
    }
}

/// Raw-mode alternate screen; restored on `announce` or drop
pub struct TerminalScreen {
    out: Stdout,
    active: bool,
}

impl TerminalScreen {
    /// Switch the terminal into game mode
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out, active: true })
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

impl FrameSink for TerminalScreen {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        let out = &mut self.out;
        queue!(out, cursor::MoveTo(0, 0))?;
        for line in &frame.lines {
            for span in &line.spans {
                match color_for(span.tint) {
                    Some(color) => queue!(
                        out,
                        style::SetForegroundColor(color),
                        style::Print(&span.text),
                        style::ResetColor
                    )?,
                    None => queue!(out, style::Print(&span.text))?,
                }
            }
            queue!(
                out,
                terminal::Clear(ClearType::UntilNewLine),
                style::Print("\r\n")
            )?;
        }
        queue!(out, terminal::Clear(ClearType::FromCursorDown))?;
        out.flush()
    }

    fn announce(&mut self, message: &str) -> io::Result<()> {
        self.restore()?;
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("Failed to restore terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_colors() {
        assert_eq!(color_for(Tint::Plain), None);
        assert_eq!(color_for(Tint::Obstacle), Some(Color::Red));
        assert_eq!(color_for(Tint::PowerUp), Some(Color::Green));
        assert_eq!(color_for(Tint::Shield), Some(Color::Green));
        assert_eq!(color_for(Tint::Divider), Some(Color::Yellow));
    }
}
