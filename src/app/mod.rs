//! Application state, reducer and host loop.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Application`]: The complete, immutable editor state
//! - [`Action`]: Everything the reducer can be asked to handle
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Host loop that feeds terminal events to [`update`]

mod command;
mod event_loop;
mod input;
mod model;
mod update;

pub use command::{
    Command, CommandTable, default_commands, edit_command, key_command, paste_command,
    scroll_command,
};
pub use model::{Application, Message, clear_input, put_clipboard, put_message};
pub use update::{
    Action, Outcome, TerminalAction, apply_edit, eval_command, paste, save, save_with, update,
};

use std::path::PathBuf;

use crate::input::{KeyMap, default_key_map};

/// Owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    keys: KeyMap,
}

impl App {
    /// Create an editor for the given file, or a scratch buffer.
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            keys: default_key_map(),
        }
    }

    /// Use a custom key map instead of the defaults.
    pub fn with_keys(mut self, keys: KeyMap) -> Self {
        self.keys = keys;
        self
    }
}
