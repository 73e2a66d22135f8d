//! Terminal input mapped to session commands.
//!
//! Crossterm events are converted via `From` so the session loop only sees
//! [`Input`]. Only key presses count; releases and repeats map to
//! [`Input::Ignored`].

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Keyboard-driven session commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Quit,
    /// Move keyboard focus to the next clickable view.
    FocusNext,
    FocusPrevious,
    /// Click the focused view.
    Activate,
    /// Scroll the container around the focused view by one cell.
    Scroll { dx: i16, dy: i16 },
}

impl Command {
    /// `Ctrl+C`, `q` and `Esc` quit; `Tab`/`BackTab` move focus; `Enter` and
    /// space activate; arrow keys scroll.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Self::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Tab => Some(Self::FocusNext),
            KeyCode::BackTab => Some(Self::FocusPrevious),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Self::Activate),
            KeyCode::Up => Some(Self::Scroll { dx: 0, dy: -1 }),
            KeyCode::Down => Some(Self::Scroll { dx: 0, dy: 1 }),
            KeyCode::Left => Some(Self::Scroll { dx: -1, dy: 0 }),
            KeyCode::Right => Some(Self::Scroll { dx: 1, dy: 0 }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// What the session loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Left button pressed at a cell.
    Click { x: u16, y: u16 },
    /// Mouse wheel turned over a cell.
    Wheel { x: u16, y: u16, dx: i16, dy: i16 },
    Resize { width: u16, height: u16 },
    Ignored,
}

impl From<Event> for Input {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Command::from_key(&key).map_or(Input::Ignored, Input::Command),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Input::Click {
                    x: mouse.column,
                    y: mouse.row,
                },
                MouseEventKind::ScrollUp => wheel(mouse.column, mouse.row, 0, -1),
                MouseEventKind::ScrollDown => wheel(mouse.column, mouse.row, 0, 1),
                MouseEventKind::ScrollLeft => wheel(mouse.column, mouse.row, -1, 0),
                MouseEventKind::ScrollRight => wheel(mouse.column, mouse.row, 1, 0),
                _ => Input::Ignored,
            },
            Event::Resize(width, height) => Input::Resize { width, height },
            _ => Input::Ignored,
        }
    }
}

fn wheel(x: u16, y: u16, dx: i16, dy: i16) -> Input {
    Input::Wheel { x, y, dx, dy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn quit_keys() {
        for event in [
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
            press(KeyCode::Char('q'), KeyModifiers::NONE),
            press(KeyCode::Esc, KeyModifiers::NONE),
        ] {
            assert_eq!(Input::from(event), Input::Command(Command::Quit));
        }
    }

    #[test]
    fn plain_c_is_ignored() {
        assert_eq!(
            Input::from(press(KeyCode::Char('c'), KeyModifiers::NONE)),
            Input::Ignored
        );
    }

    #[test]
    fn focus_and_activate() {
        assert_eq!(
            Input::from(press(KeyCode::Tab, KeyModifiers::NONE)),
            Input::Command(Command::FocusNext)
        );
        assert_eq!(
            Input::from(press(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Input::Command(Command::FocusPrevious)
        );
        assert_eq!(
            Input::from(press(KeyCode::Enter, KeyModifiers::NONE)),
            Input::Command(Command::Activate)
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(Input::from(Event::Key(release)), Input::Ignored);
    }

    #[test]
    fn left_click_only() {
        assert_eq!(
            Input::from(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Input::Click { x: 3, y: 4 }
        );
        assert_eq!(
            Input::from(mouse(MouseEventKind::Down(MouseButton::Right), 3, 4)),
            Input::Ignored
        );
        assert_eq!(Input::from(mouse(MouseEventKind::Moved, 0, 0)), Input::Ignored);
    }

    #[test]
    fn arrows_scroll() {
        assert_eq!(
            Input::from(press(KeyCode::Down, KeyModifiers::NONE)),
            Input::Command(Command::Scroll { dx: 0, dy: 1 })
        );
        assert_eq!(
            Input::from(press(KeyCode::Left, KeyModifiers::NONE)),
            Input::Command(Command::Scroll { dx: -1, dy: 0 })
        );
    }

    #[test]
    fn wheel_scrolls_under_cursor() {
        assert_eq!(
            Input::from(mouse(MouseEventKind::ScrollUp, 2, 5)),
            Input::Wheel { x: 2, y: 5, dx: 0, dy: -1 }
        );
        assert_eq!(
            Input::from(mouse(MouseEventKind::ScrollRight, 0, 0)),
            Input::Wheel { x: 0, y: 0, dx: 1, dy: 0 }
        );
    }

    #[test]
    fn resize() {
        assert_eq!(
            Input::from(Event::Resize(80, 24)),
            Input::Resize {
                width: 80,
                height: 24
            }
        );
    }
}
