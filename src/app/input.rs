use crossterm::event::{Event, KeyEventKind};
use ropey::Rope;

use crate::app::{Action, App, TerminalAction};
use crate::editor::{BufferAction, Coord};
use crate::input::Key;

impl App {
    /// Translate a terminal event into an action.
    ///
    /// `size` is the last known terminal size; it is updated on resize.
    pub(super) fn handle_event(event: &Event, size: &mut Coord) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                Some(Action::from(TerminalAction::Key {
                    key: Key::from(*key),
                    size: *size,
                }))
            }
            Event::Resize(width, height) => {
                *size = Coord::from_terminal(*width, *height);
                Some(Action::from(TerminalAction::Resize { size: *size }))
            }
            // Bracketed paste arrives as one event and bypasses key bindings.
            Event::Paste(text) => Some(Action::from(BufferAction::InsertText(Rope::from_str(text)))),
            _ => None,
        }
    }
}
