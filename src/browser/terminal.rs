//! Terminal capability used by the browser
//!
//! The browser only needs a handful of operations: enter and leave
//! full-screen mode, query the size, write styled text at a position, and
//! read one key at a time. `Terminal` captures exactly that so the event
//! loop can run against a scripted fake in tests. `CrosstermTerminal` is the
//! real implementation.

use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::error::TerminalError;

use super::state::Action;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub rows: u16,
    pub cols: u16,
}

/// Text attributes for `Terminal::write_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        underline: false,
        reverse: false,
    };
    pub const BOLD: Style = Style {
        bold: true,
        underline: false,
        reverse: false,
    };
    pub const UNDERLINE: Style = Style {
        bold: false,
        underline: true,
        reverse: false,
    };
    pub const REVERSE: Style = Style {
        bold: false,
        underline: false,
        reverse: true,
    };
}

/// Minimal full-screen terminal interface.
pub trait Terminal {
    /// Switch to full-screen mode and hide the cursor.
    fn enter(&mut self) -> Result<(), TerminalError>;

    /// Restore the terminal to the state it was in before `enter`.
    fn leave(&mut self) -> Result<(), TerminalError>;

    fn size(&self) -> Result<Size, TerminalError>;

    fn clear(&mut self) -> Result<(), TerminalError>;

    /// Write `text` starting at `row`, `col`. Callers keep text within the
    /// screen width.
    fn write_at(&mut self, row: u16, col: u16, text: &str, style: Style)
    -> Result<(), TerminalError>;

    fn flush(&mut self) -> Result<(), TerminalError>;

    /// Block for the next input event. Returns `None` for keys with no
    /// binding and for non-key events such as resizes.
    fn read_action(&mut self) -> Result<Option<Action>, TerminalError>;
}

/// Map a key press to a browser action.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q' | 'Q') => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k' | 'K') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j' | 'J') => Some(Action::Down),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l' | 'L') => Some(Action::Open),
        KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h' | 'H') => Some(Action::Back),
        KeyCode::Char('s' | 'S') => Some(Action::CycleSort),
        _ => None,
    }
}

/// Real terminal backed by crossterm on stdout.
pub struct CrosstermTerminal {
    stdout: Stdout,
    active: bool,
}

impl CrosstermTerminal {
    /// Fails with `NotATerminal` unless both stdin and stdout are terminals.
    pub fn new() -> Result<Self, TerminalError> {
        if !(io::stdin().is_terminal() && io::stdout().is_terminal()) {
            return Err(TerminalError::NotATerminal);
        }
        Ok(Self {
            stdout: io::stdout(),
            active: false,
        })
    }
}

impl Terminal for CrosstermTerminal {
    fn enter(&mut self) -> Result<(), TerminalError> {
        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let raw = terminal::disable_raw_mode();
        screen?;
        raw?;
        Ok(())
    }

    fn size(&self) -> Result<Size, TerminalError> {
        let (cols, rows) = terminal::size()?;
        Ok(Size { rows, cols })
    }

    fn clear(&mut self) -> Result<(), TerminalError> {
        queue!(self.stdout, Clear(ClearType::All))?;
        Ok(())
    }

    fn write_at(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        style: Style,
    ) -> Result<(), TerminalError> {
        queue!(self.stdout, cursor::MoveTo(col, row))?;
        if style.bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        if style.underline {
            queue!(self.stdout, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
        }
        queue!(self.stdout, Print(text), SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        self.stdout.flush()?;
        Ok(())
    }

    fn read_action(&mut self) -> Result<Option<Action>, TerminalError> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(action_for_key(key)),
            _ => Ok(None),
        }
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(action_for_key(key(KeyCode::Up)), Some(Action::Up));
        assert_eq!(action_for_key(key(KeyCode::Char('k'))), Some(Action::Up));
        assert_eq!(action_for_key(key(KeyCode::Down)), Some(Action::Down));
        assert_eq!(action_for_key(key(KeyCode::Char('J'))), Some(Action::Down));
        assert_eq!(action_for_key(key(KeyCode::PageUp)), Some(Action::PageUp));
        assert_eq!(action_for_key(key(KeyCode::PageDown)), Some(Action::PageDown));
        assert_eq!(action_for_key(key(KeyCode::Home)), Some(Action::Home));
        assert_eq!(action_for_key(key(KeyCode::End)), Some(Action::End));
    }

    #[test]
    fn test_open_back_sort_quit_keys() {
        for code in [KeyCode::Enter, KeyCode::Right, KeyCode::Char('l')] {
            assert_eq!(action_for_key(key(code)), Some(Action::Open));
        }
        for code in [KeyCode::Left, KeyCode::Backspace, KeyCode::Char('h')] {
            assert_eq!(action_for_key(key(code)), Some(Action::Back));
        }
        assert_eq!(action_for_key(key(KeyCode::Char('s'))), Some(Action::CycleSort));
        assert_eq!(action_for_key(key(KeyCode::Char('Q'))), Some(Action::Quit));
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(action_for_key(key(KeyCode::Char('x'))), None);
        assert_eq!(action_for_key(key(KeyCode::Tab)), None);
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            None
        );
    }
}
