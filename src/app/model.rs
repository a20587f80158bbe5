use std::sync::Arc;
use std::time::SystemTime;

use im::Vector;
use tracing::debug;

use crate::editor::{Buffer, Coord, Text};
use crate::input::{KeyMap, KeySeq, default_key_map};

use super::command::{CommandTable, default_commands};

/// An entry in the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub time_stamp: SystemTime,
    pub content: Arc<str>,
}

/// The complete editor state.
///
/// Values are never mutated once handed out: every transition builds a new
/// `Application`, sharing the parts it did not touch with the previous one.
#[derive(Debug, Clone)]
pub struct Application {
    /// The buffer being edited
    pub current: Buffer,
    /// Key sequence to command name bindings
    pub keys: KeyMap,
    /// Commands available by name
    pub commands: CommandTable,
    /// Keys received so far that form a strict prefix of some binding
    pub input: KeySeq,
    /// Cut and copied fragments, most recent last
    pub clipboard: Vector<Text>,
    /// Status and echo history, oldest first
    pub messages: Vector<Message>,
    /// Text typed into the extended-command prompt, when it is open
    pub prompt: Option<String>,
    /// Last terminal size reported by the host
    pub size: Coord,
}

impl Application {
    /// Create a state editing `buffer` with the default bindings and commands.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            current: buffer,
            keys: default_key_map(),
            commands: default_commands(),
            input: KeySeq::new(),
            clipboard: Vector::new(),
            messages: Vector::new(),
            prompt: None,
            size: Coord::default(),
        }
    }

    pub fn with_keys(self, keys: KeyMap) -> Self {
        Self { keys, ..self }
    }

    pub fn with_commands(self, commands: CommandTable) -> Self {
        Self { commands, ..self }
    }

    pub fn with_size(self, size: Coord) -> Self {
        Self { size, ..self }
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(Buffer::empty())
    }
}

/// Append a message stamped with the current time.
pub fn put_message(mut state: Application, content: impl Into<Arc<str>>) -> Application {
    let content = content.into();
    debug!(message = %content, "message");
    state.messages.push_back(Message {
        time_stamp: SystemTime::now(),
        content,
    });
    state
}

/// Push a fragment onto the clipboard.
pub fn put_clipboard(mut state: Application, content: Text) -> Application {
    state.clipboard.push_back(content);
    state
}

/// Forget any pending key sequence.
pub fn clear_input(mut state: Application) -> Application {
    state.input = KeySeq::new();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use ropey::Rope;

    #[test]
    fn test_put_message_appends_in_order() {
        let state = put_message(Application::default(), "one");
        let state = put_message(state, String::from("two"));
        assert_eq!(state.messages.len(), 2);
        assert_eq!(&*state.messages[0].content, "one");
        assert_eq!(state.last_message().map(|m| &*m.content), Some("two"));
        assert!(state.messages[0].time_stamp <= state.messages[1].time_stamp);
    }

    #[test]
    fn test_put_message_keeps_previous_snapshot() {
        let before = Application::default();
        let after = put_message(before.clone(), "hi");
        assert!(before.messages.is_empty());
        assert_eq!(after.messages.len(), 1);
    }

    #[test]
    fn test_put_clipboard_pushes_last() {
        let state = put_clipboard(Application::default(), Rope::from_str("a"));
        let state = put_clipboard(state, Rope::from_str("b"));
        assert_eq!(state.clipboard.len(), 2);
        assert_eq!(state.clipboard.last().map(ToString::to_string), Some("b".to_string()));
    }

    #[test]
    fn test_clear_input_empties_pending_keys() {
        let mut state = Application::default();
        state.input.push_back(Key::ctrl('x'));
        let state = clear_input(state);
        assert!(state.input.is_empty());
    }
}
