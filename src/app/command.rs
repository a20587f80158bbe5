//! Named commands and the combinators that build them.
//!
//! A [`Command`] is a stateless function from `(Application, terminal size)`
//! to [`Outcome`]. The combinators lift plain buffer operations into
//! commands so that clipboard and message bookkeeping happens in one place,
//! [`apply_edit`].

use std::fmt;
use std::sync::Arc;

use im::HashMap;
use tracing::debug;

use crate::editor::{Buffer, Coord, Edit, Text, editor_size};
use crate::error::EditorError;
use crate::input::{Key, SELF_INSERT};

use super::model::{Application, clear_input};
use super::update::{Action, Outcome, apply_edit, save};

type CommandFn = dyn Fn(Application, Coord) -> Outcome + Send + Sync;

/// A shareable, re-invocable state transition.
#[derive(Clone)]
pub struct Command(Arc<CommandFn>);

impl Command {
    pub fn new(f: impl Fn(Application, Coord) -> Outcome + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the command against `state` for a terminal of `size`.
    pub fn invoke(&self, state: Application, size: Coord) -> Outcome {
        (self.0)(state, size)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Command(..)")
    }
}

/// Commands addressable by name.
#[derive(Clone, Default)]
pub struct CommandTable {
    commands: HashMap<Arc<str>, Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same table with `name` bound to `command`.
    pub fn with(&self, name: &str, command: Command) -> Self {
        Self {
            commands: self.commands.update(Arc::from(name), command),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All command names, sorted.
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<_> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Lift `buffer -> edit` into a command.
pub fn edit_command<F, E>(f: F) -> Command
where
    F: Fn(&Buffer) -> E + Send + Sync + 'static,
    E: Into<Edit>,
{
    Command::new(move |state, size| {
        let edit = f(&state.current);
        Outcome::Continue(apply_edit(state, size, edit))
    })
}

/// Lift `(buffer, text) -> edit` into a command fed with the newest
/// clipboard entry.
///
/// Invoked with an empty clipboard the command leaves the state unchanged.
pub fn paste_command<F, E>(f: F) -> Command
where
    F: Fn(&Buffer, &Text) -> E + Send + Sync + 'static,
    E: Into<Edit>,
{
    Command::new(move |state, size| {
        let Some(text) = state.clipboard.last() else {
            debug!("{}", EditorError::EmptyClipboardPaste);
            return Outcome::Continue(state);
        };
        let edit = f(&state.current, text);
        Outcome::Continue(apply_edit(state, size, edit))
    })
}

/// Lift a pure viewport change into a command.
pub fn scroll_command<F>(f: F) -> Command
where
    F: Fn(&Buffer, Coord) -> Buffer + Send + Sync + 'static,
{
    Command::new(move |mut state, size| {
        state.current = f(&state.current, editor_size(size));
        Outcome::Continue(state)
    })
}

/// Lift `(buffer, key) -> edit` into a command fed with the last key of the
/// pending input.
pub fn key_command<F, E>(f: F) -> Command
where
    F: Fn(&Buffer, Key) -> E + Send + Sync + 'static,
    E: Into<Edit>,
{
    Command::new(move |state, size| {
        let Some(key) = state.input.last().copied() else {
            return Outcome::Continue(state);
        };
        let edit = f(&state.current, key);
        Outcome::Continue(apply_edit(state, size, edit))
    })
}

fn insert_key(buffer: &Buffer, key: Key) -> Buffer {
    key.printable()
        .map_or_else(|| buffer.clone(), |c| buffer.insert_char(c))
}

/// The built-in command set.
pub fn default_commands() -> CommandTable {
    CommandTable::new()
        .with("backward-char", edit_command(Buffer::move_left))
        .with("forward-char", edit_command(Buffer::move_right))
        .with("previous-line", edit_command(Buffer::move_up))
        .with("next-line", edit_command(Buffer::move_down))
        .with("move-beginning-of-line", edit_command(Buffer::move_line_start))
        .with("move-end-of-line", edit_command(Buffer::move_line_end))
        .with("backward-word", edit_command(Buffer::move_word_left))
        .with("forward-word", edit_command(Buffer::move_word_right))
        .with("beginning-of-buffer", edit_command(Buffer::move_buffer_start))
        .with("end-of-buffer", edit_command(Buffer::move_buffer_end))
        .with("page-down", scroll_command(Buffer::page_down))
        .with("page-up", scroll_command(Buffer::page_up))
        .with(SELF_INSERT, key_command(insert_key))
        .with("newline", edit_command(Buffer::insert_newline))
        .with("insert-tab", edit_command(Buffer::insert_tab))
        .with("delete-backward-char", edit_command(Buffer::delete_back))
        .with("delete-char", edit_command(Buffer::delete_forward))
        .with("kill-line", edit_command(Buffer::kill_line))
        .with("kill-region", edit_command(Buffer::cut))
        .with("copy-region", edit_command(Buffer::copy))
        .with("yank", paste_command(Buffer::insert_text))
        .with("set-mark", edit_command(Buffer::start_selection))
        .with(
            "keyboard-quit",
            Command::new(|mut state, _| {
                state.current = state.current.clear_selection();
                Outcome::Continue(clear_input(state))
            }),
        )
        .with("mark-whole-buffer", edit_command(Buffer::select_all))
        .with("undo", edit_command(Buffer::undo))
        .with("save-buffer", Command::new(|state, _| save(state)))
        .with("quit", Command::new(|_, _| Outcome::Propagate(Action::Quit)))
        .with(
            "execute-extended-command",
            Command::new(|mut state, _| {
                state.prompt = Some(String::new());
                Outcome::Continue(state)
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::model::put_clipboard;
    use ropey::Rope;

    const SIZE: Coord = Coord::new(24, 80);

    fn state_with(text: &str) -> Application {
        Application::new(Buffer::from_text(text))
    }

    fn continued(outcome: Outcome) -> Application {
        match outcome {
            Outcome::Continue(state) => state,
            Outcome::Propagate(action) => panic!("unexpected propagate: {action:?}"),
        }
    }

    #[test]
    fn test_edit_command_replaces_buffer() {
        let cmd = edit_command(|b: &Buffer| b.insert_char('x'));
        let state = continued(cmd.invoke(state_with("ab"), SIZE));
        assert_eq!(state.current.text(), "xab");
        assert!(state.clipboard.is_empty());
    }

    #[test]
    fn test_edit_command_with_text_pushes_clipboard() {
        let cmd = edit_command(Buffer::kill_line);
        let state = continued(cmd.invoke(state_with("hello\nworld"), SIZE));
        assert_eq!(state.current.text(), "\nworld");
        assert_eq!(state.clipboard.len(), 1);
        assert_eq!(state.clipboard[0].to_string(), "hello");
    }

    #[test]
    fn test_paste_command_reads_last_entry_without_popping() {
        let cmd = paste_command(Buffer::insert_text);
        let state = put_clipboard(state_with(""), Rope::from_str("old"));
        let state = put_clipboard(state, Rope::from_str("new"));
        let state = continued(cmd.invoke(state, SIZE));
        assert_eq!(state.current.text(), "new");
        assert_eq!(state.clipboard.len(), 2);
    }

    #[test]
    fn test_paste_command_on_empty_clipboard_is_noop() {
        let cmd = paste_command(Buffer::insert_text);
        let before = state_with("abc");
        let after = continued(cmd.invoke(before.clone(), SIZE));
        assert_eq!(after.current, before.current);
        assert!(after.messages.is_empty());
    }

    #[test]
    fn test_scroll_command_uses_editor_size() {
        let cmd = scroll_command(Buffer::page_down);
        let state = state_with(&"x\n".repeat(100));
        let state = continued(cmd.invoke(state, SIZE));
        assert_eq!(state.current.cursor().line, 22);
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_key_command_uses_last_pending_key() {
        let cmd = key_command(insert_key);
        let mut state = state_with("");
        state.input.push_back(Key::ctrl('x'));
        state.input.push_back(Key::char('q'));
        let state = continued(cmd.invoke(state, SIZE));
        assert_eq!(state.current.text(), "q");
    }

    #[test]
    fn test_key_command_without_input_is_noop() {
        let cmd = key_command(insert_key);
        let before = state_with("abc");
        let after = continued(cmd.invoke(before.clone(), SIZE));
        assert_eq!(after.current, before.current);
    }

    #[test]
    fn test_command_is_reusable() {
        let cmd = edit_command(|b: &Buffer| b.insert_char('!'));
        let once = continued(cmd.invoke(state_with(""), SIZE));
        let twice = continued(cmd.invoke(once, SIZE));
        assert_eq!(twice.current.text(), "!!");
    }

    #[test]
    fn test_quit_propagates() {
        let outcome = default_commands()
            .lookup("quit")
            .unwrap()
            .invoke(state_with(""), SIZE);
        assert!(matches!(outcome, Outcome::Propagate(Action::Quit)));
    }

    #[test]
    fn test_every_default_binding_names_a_command() {
        let commands = default_commands();
        let keys = crate::input::default_key_map();
        for (seq, name) in keys.iter() {
            assert!(commands.contains(name), "{} is bound to missing {name}", crate::input::describe(seq));
        }
        assert!(commands.contains(SELF_INSERT));
    }
}
