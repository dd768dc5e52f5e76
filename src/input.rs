use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
}

impl Command {
    /// Key presses only; releases, repeats, mouse and resize events map to
    /// nothing.
    pub fn from_event(event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::from_key_event(key),
            _ => None,
        }
    }

    pub fn from_key_event(key: &KeyEvent) -> Option<Command> {
        // Raw mode swallows SIGINT, so Ctrl+C stands in for closing the window
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                Some(Command::Turn(Direction::Up))
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(Command::Turn(Direction::Down))
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(Command::Turn(Direction::Left))
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(Command::Turn(Direction::Right))
            }
            KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}
