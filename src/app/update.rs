use std::path::Path;

use crossterm::event::KeyCode;
use tracing::{debug, info, warn};

use crate::editor::{BufferAction, Coord, Edit, editor_size};
use crate::error::EditorError;
use crate::input::{Key, KeyMatch, describe};
use crate::store::{FileStore, Store, StoreError};

use super::model::{Application, clear_input, put_clipboard, put_message};

/// A single event delivered by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    /// A key press, together with the terminal size at the time.
    Key { key: Key, size: Coord },
    /// The terminal changed size.
    Resize { size: Coord },
}

/// Everything the reducer can be asked to handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Terminal(TerminalAction),
    /// An edit request applied directly, bypassing key bindings.
    Buffer(BufferAction),
    /// Request to end the session; never consumed by the reducer.
    Quit,
}

impl From<TerminalAction> for Action {
    fn from(action: TerminalAction) -> Self {
        Self::Terminal(action)
    }
}

impl From<BufferAction> for Action {
    fn from(action: BufferAction) -> Self {
        Self::Buffer(action)
    }
}

/// The result of a state transition.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The next state.
    Continue(Application),
    /// An action handed back, unconsumed, to the host loop.
    Propagate(Action),
}

impl Outcome {
    /// Transform the state of a `Continue`, leaving `Propagate` untouched.
    pub fn map(self, f: impl FnOnce(Application) -> Application) -> Self {
        match self {
            Self::Continue(state) => Self::Continue(f(state)),
            propagate @ Self::Propagate(_) => propagate,
        }
    }

    /// The next state, if the transition continued.
    pub fn state(&self) -> Option<&Application> {
        match self {
            Self::Continue(state) => Some(state),
            Self::Propagate(_) => None,
        }
    }
}

/// Pure function mapping an action and the current state to an outcome.
///
/// All state transitions happen here; nothing is mutated in place.
pub fn update(state: Application, action: Action) -> Outcome {
    match action {
        Action::Terminal(TerminalAction::Key { key, size }) => {
            let state = state.with_size(size);
            if state.prompt.is_some() {
                prompt_key(state, key, size)
            } else {
                dispatch_key(state, key, size)
            }
        }
        Action::Terminal(TerminalAction::Resize { size }) => {
            debug!(rows = size.row, cols = size.col, "resize");
            let mut state = state.with_size(size);
            state.current = state.current.resize(editor_size(size));
            Outcome::Continue(state)
        }
        Action::Buffer(op) => {
            let size = state.size;
            let edit = state.current.apply(&op);
            Outcome::Continue(apply_edit(state, size, edit))
        }
        Action::Quit => {
            info!("quit requested");
            Outcome::Propagate(Action::Quit)
        }
    }
}

fn dispatch_key(mut state: Application, key: Key, size: Coord) -> Outcome {
    state.input.push_back(key);
    match state.keys.lookup(&state.input) {
        KeyMatch::Exact(name) => eval_command(state, &name, size).map(clear_input),
        KeyMatch::Prefix => Outcome::Continue(state),
        KeyMatch::None => {
            let seq = describe(&state.input);
            debug!(keys = %seq, "unbound key sequence");
            let state = clear_input(state);
            Outcome::Continue(put_message(
                state,
                EditorError::UnboundKeySequence(seq).to_string(),
            ))
        }
    }
}

fn prompt_key(mut state: Application, key: Key, size: Coord) -> Outcome {
    let Some(mut text) = state.prompt.take() else {
        return Outcome::Continue(state);
    };
    match (key.code, key.printable()) {
        (KeyCode::Enter, _) if text.trim().is_empty() => return Outcome::Continue(state),
        (KeyCode::Enter, _) => return eval_command(state, text.trim(), size),
        (KeyCode::Esc, _) => return Outcome::Continue(state),
        (KeyCode::Char('g'), _) if key == Key::ctrl('g') => return Outcome::Continue(state),
        (KeyCode::Backspace, _) => {
            text.pop();
        }
        (_, Some(c)) => text.push(c),
        _ => {}
    }
    state.prompt = Some(text);
    Outcome::Continue(state)
}

/// Fold a buffer-level edit back into the application state.
///
/// Extracted text, if any, is pushed onto the clipboard. The cursor is kept
/// inside the visible region for a terminal of `size`.
pub fn apply_edit(mut state: Application, size: Coord, edit: impl Into<Edit>) -> Application {
    let (buffer, text) = edit.into().into_parts();
    state.current = buffer.scroll_to_cursor(editor_size(size));
    match text {
        Some(text) => put_clipboard(state, text),
        None => state,
    }
}

/// Run the command registered under `name`.
///
/// Unknown names are reported in the message log; this never fails.
pub fn eval_command(state: Application, name: &str, size: Coord) -> Outcome {
    match state.commands.lookup(name).cloned() {
        Some(command) => {
            debug!(command = name, "eval");
            command.invoke(state, size)
        }
        None => {
            warn!(command = name, "unknown command");
            Outcome::Continue(put_message(
                state,
                EditorError::UnknownCommandName(name.to_string()).to_string(),
            ))
        }
    }
}

/// Insert the newest clipboard entry at the cursor.
///
/// With an empty clipboard the state is returned unchanged.
pub fn paste(state: Application, size: Coord) -> Application {
    let Some(text) = state.clipboard.last() else {
        debug!("{}", EditorError::EmptyClipboardPaste);
        return state;
    };
    let edit = state.current.insert_text(text);
    apply_edit(state, size, edit)
}

/// Write the current buffer to its file.
pub fn save(state: Application) -> Outcome {
    save_with(state, &FileStore)
}

/// Write the current buffer through `store`.
///
/// Success and failure both end up as a message; the buffer content is
/// never discarded.
pub fn save_with(mut state: Application, store: &dyn Store) -> Outcome {
    let result = state
        .current
        .path()
        .map(Path::to_path_buf)
        .ok_or(StoreError::NoPath)
        .and_then(|path| store.save(&state.current, &path).map(|()| path));
    match result {
        Ok(path) => {
            info!(path = %path.display(), "saved");
            state.current = state.current.mark_clean();
            Outcome::Continue(put_message(state, format!("wrote {}", path.display())))
        }
        Err(err) => {
            warn!(error = %err, "save failed");
            Outcome::Continue(put_message(state, EditorError::SaveFailure(err).to_string()))
        }
    }
}
