//! Keys, key sequences and key bindings.

mod key;
mod keymap;

pub use key::{Key, KeyParseError, KeySeq, describe, parse_seq};
pub use keymap::{KeyMap, KeyMatch, SELF_INSERT, default_key_map};
