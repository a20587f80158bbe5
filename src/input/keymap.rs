use std::sync::Arc;

use im::HashMap;

use super::key::{Key, KeyParseError, KeySeq, parse_seq};

/// Name of the command plain printable keys fall back to.
pub const SELF_INSERT: &str = "insert";

/// Result of looking up a pending key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatch {
    /// The sequence is bound to the named command.
    Exact(Arc<str>),
    /// The sequence is a strict prefix of at least one binding.
    Prefix,
    /// Nothing is or could become bound to this sequence.
    None,
}

/// A persistent table from key sequences to command names.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<KeySeq, Arc<str>>,
    self_insert: Option<Arc<str>>,
}

impl KeyMap {
    /// An empty map with no self-insert fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same map with `seq` bound to `command`.
    pub fn bind(&self, seq: KeySeq, command: &str) -> Self {
        Self {
            bindings: self.bindings.update(seq, Arc::from(command)),
            self_insert: self.self_insert.clone(),
        }
    }

    /// Bind a sequence given in textual notation, e.g. `"C-x C-s"`.
    pub fn bind_str(&self, seq: &str, command: &str) -> Result<Self, KeyParseError> {
        Ok(self.bind(parse_seq(seq)?, command))
    }

    /// Route unbound plain printable keys to `command`.
    pub fn with_self_insert(&self, command: &str) -> Self {
        Self {
            bindings: self.bindings.clone(),
            self_insert: Some(Arc::from(command)),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All explicit bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeySeq, &str)> {
        self.bindings.iter().map(|(seq, command)| (seq, &**command))
    }

    /// Match a pending sequence against the bindings.
    pub fn lookup(&self, seq: &KeySeq) -> KeyMatch {
        if let Some(command) = self.bindings.get(seq) {
            return KeyMatch::Exact(command.clone());
        }
        let extends = self
            .bindings
            .keys()
            .any(|bound| bound.len() > seq.len() && bound.iter().zip(seq.iter()).all(|(a, b)| a == b));
        if extends {
            return KeyMatch::Prefix;
        }
        match (&self.self_insert, single_printable(seq)) {
            (Some(command), true) => KeyMatch::Exact(command.clone()),
            _ => KeyMatch::None,
        }
    }
}

fn single_printable(seq: &KeySeq) -> bool {
    seq.len() == 1 && seq.front().and_then(Key::printable).is_some()
}

const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("<left>", "backward-char"),
    ("C-b", "backward-char"),
    ("<right>", "forward-char"),
    ("C-f", "forward-char"),
    ("<up>", "previous-line"),
    ("C-p", "previous-line"),
    ("<down>", "next-line"),
    ("C-n", "next-line"),
    ("<home>", "move-beginning-of-line"),
    ("C-a", "move-beginning-of-line"),
    ("<end>", "move-end-of-line"),
    ("C-e", "move-end-of-line"),
    ("M-b", "backward-word"),
    ("M-f", "forward-word"),
    ("M-<", "beginning-of-buffer"),
    ("M->", "end-of-buffer"),
    ("<next>", "page-down"),
    ("C-v", "page-down"),
    ("<prior>", "page-up"),
    ("M-v", "page-up"),
    ("RET", "newline"),
    ("TAB", "insert-tab"),
    ("DEL", "delete-backward-char"),
    ("<delete>", "delete-char"),
    ("C-d", "delete-char"),
    ("C-k", "kill-line"),
    ("C-w", "kill-region"),
    ("M-w", "copy-region"),
    ("C-y", "yank"),
    ("C-SPC", "set-mark"),
    ("C-g", "keyboard-quit"),
    ("C-x h", "mark-whole-buffer"),
    ("C-/", "undo"),
    ("C-_", "undo"),
    // Terminals deliver C-/ and C-_ as 0x1f, which crossterm reports as C-7.
    ("C-7", "undo"),
    ("C-x u", "undo"),
    ("C-x C-s", "save-buffer"),
    ("C-x C-c", "quit"),
    ("M-x", "execute-extended-command"),
];

/// The built-in emacs-like bindings, with self-insert enabled.
pub fn default_key_map() -> KeyMap {
    DEFAULT_BINDINGS
        .iter()
        .filter_map(|(seq, command)| parse_seq(seq).ok().map(|seq| (seq, *command)))
        .fold(KeyMap::new(), |keys, (seq, command)| keys.bind(seq, command))
        .with_self_insert(SELF_INSERT)
}
