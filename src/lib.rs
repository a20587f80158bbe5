// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. input::KeyParseError)
    clippy::module_name_repetitions
)]

//! # Quire
//!
//! A small emacs-flavoured terminal text editor built on persistent values.
//!
//! Quire edits one file at a time with:
//! - Emacs-style multi-key bindings (`C-x C-s`, `M-x`, ...)
//! - A kill ring style clipboard and per-buffer undo
//! - Commands looked up by name from an extensible table
//!
//! ## Architecture
//!
//! Quire uses The Elm Architecture (TEA) pattern:
//! - **Model**: [`Application`](app::Application), an immutable snapshot
//! - **Action**: Terminal events and direct buffer edits
//! - **Update**: Pure state transitions returning an [`Outcome`](app::Outcome)
//! - **View**: Render to terminal
//!
//! Every snapshot stays valid after a transition; nothing is edited in place.
//!
//! ## Modules
//!
//! - [`app`]: Application state, reducer, commands and host loop
//! - [`editor`]: Rope-backed buffer and terminal coordinates
//! - [`input`]: Keys, key sequences and bindings
//! - [`store`]: Loading and saving files
//! - [`ui`]: Terminal UI components
//! - [`config`]: Command-line and rc-file flags

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{Action, App, Application, Outcome, update};
    pub use crate::editor::{Buffer, BufferAction, Coord};
    pub use crate::input::{Key, KeyMap};
}
