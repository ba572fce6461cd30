// ============================================================================
// Event handling
// ============================================================================
// Keyboard events and periodic ticks for the TUI event loop.
//
// The predicates below classify raw crossterm events; whether a key actually
// applies depends on the current context (edit mode, active tab) and is
// decided by the guards in the main event handler.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Application-level events.
#[derive(Debug, Clone)]
pub enum Event {
    /// Key pressed
    Key(KeyEvent),

    /// Regular tick (no input within the poll window)
    Tick,

    /// An error occurred while reading events
    Error,
}

/// Event reader polling the terminal with a fixed timeout.
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Reads the next event, returning Tick when the 250ms poll window
    /// elapses without input. Only key presses are forwarded; releases and
    /// repeats on platforms that report them are folded into Tick.
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                CrosstermEvent::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        Ok(Event::Key(key))
                    } else {
                        Ok(Event::Tick)
                    }
                }
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// 'q' : quit (two-step confirmation). Only outside edit mode.
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

pub fn is_backspace_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Backspace)
    } else {
        false
    }
}

/// 'i' : enter edit mode on a form pane (Vim-like insert).
pub fn is_edit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('i') | KeyCode::Char('I'))
    } else {
        false
    }
}

/// Right arrow, Tab or 'l' : next tab. Only outside edit mode.
pub fn is_next_tab_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(
            key.code,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') | KeyCode::Char('L')
        )
    } else {
        false
    }
}

/// Left arrow, Shift-Tab or 'h' : previous tab. Only outside edit mode.
pub fn is_previous_tab_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(
            key.code,
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Char('H')
        )
    } else {
        false
    }
}

/// '1'..'5' : direct tab selection. Returns the 0-based tab index.
pub fn tab_digit_from_event(event: &Event) -> Option<usize> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            if ('1'..='5').contains(&c) {
                return Some(c as usize - '1' as usize);
            }
        }
    }
    None
}

/// Down arrow or Tab : focus the next form field (edit mode).
pub fn is_focus_next_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Down | KeyCode::Tab)
    } else {
        false
    }
}

/// Up arrow or Shift-Tab : focus the previous form field (edit mode).
pub fn is_focus_previous_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Up | KeyCode::BackTab)
    } else {
        false
    }
}

/// Printable character usable in a form field (ticker symbols, ISO
/// timestamps, signed decimals).
pub fn is_field_char_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(c) if !c.is_control())
    } else {
        false
    }
}

/// Extracts the character from a key event, if any.
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(is_quit_event(&key(KeyCode::Char('Q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('x'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_tab_digit_mapping() {
        assert_eq!(tab_digit_from_event(&key(KeyCode::Char('1'))), Some(0));
        assert_eq!(tab_digit_from_event(&key(KeyCode::Char('5'))), Some(4));
        assert_eq!(tab_digit_from_event(&key(KeyCode::Char('6'))), None);
        assert_eq!(tab_digit_from_event(&key(KeyCode::Char('0'))), None);
        assert_eq!(tab_digit_from_event(&Event::Tick), None);
    }

    #[test]
    fn test_field_chars() {
        assert!(is_field_char_event(&key(KeyCode::Char('B'))));
        assert!(is_field_char_event(&key(KeyCode::Char('-'))));
        assert!(is_field_char_event(&key(KeyCode::Char(':'))));
        assert!(is_field_char_event(&key(KeyCode::Char('.'))));
        assert!(!is_field_char_event(&key(KeyCode::Enter)));
    }

    #[test]
    fn test_tab_navigation_events() {
        assert!(is_next_tab_event(&key(KeyCode::Right)));
        assert!(is_next_tab_event(&key(KeyCode::Tab)));
        assert!(is_previous_tab_event(&key(KeyCode::Left)));
        assert!(is_previous_tab_event(&key(KeyCode::BackTab)));
        assert!(!is_next_tab_event(&key(KeyCode::Up)));
    }
}
