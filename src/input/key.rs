use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use im::Vector;
use thiserror::Error;

/// An ordered sequence of keys.
pub type KeySeq = Vector<Key>;

/// Errors from parsing the textual key notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key description")]
    Empty,
    #[error("unknown key: {0}")]
    Unknown(String),
}

/// A single key press: a key code plus the modifiers that matter for binding.
///
/// Only `Ctrl` and `Alt` are kept; shift is already reflected in the char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code,
            modifiers: modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT),
        }
    }

    /// An unmodified key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn alt(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    /// The char this key would insert, if it is a plain printable key.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_empty() && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("C-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("M-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("SPC"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("RET"),
            KeyCode::Tab => f.write_str("TAB"),
            KeyCode::Backspace => f.write_str("DEL"),
            KeyCode::Esc => f.write_str("ESC"),
            KeyCode::F(n) => write!(f, "<f{n}>"),
            code => match named_code(code) {
                Some(name) => write!(f, "<{name}>"),
                None => f.write_str("<unknown>"),
            },
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s;
        loop {
            if rest.len() > 2 && rest.starts_with("C-") {
                modifiers |= KeyModifiers::CONTROL;
            } else if rest.len() > 2 && rest.starts_with("M-") {
                modifiers |= KeyModifiers::ALT;
            } else {
                break;
            }
            rest = &rest[2..];
        }
        let code = parse_code(rest).ok_or_else(|| KeyParseError::Unknown(s.to_string()))?;
        Ok(Self::new(code, modifiers))
    }
}

fn parse_code(name: &str) -> Option<KeyCode> {
    match name {
        "SPC" => return Some(KeyCode::Char(' ')),
        "RET" => return Some(KeyCode::Enter),
        "TAB" => return Some(KeyCode::Tab),
        "DEL" => return Some(KeyCode::Backspace),
        "ESC" => return Some(KeyCode::Esc),
        _ => {}
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let inner = name.strip_prefix('<')?.strip_suffix('>')?;
    if let Some(n) = inner.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return Some(KeyCode::F(n));
    }
    NAMED_CODES
        .iter()
        .find(|(n, _)| *n == inner)
        .map(|(_, code)| *code)
}

fn named_code(code: KeyCode) -> Option<&'static str> {
    NAMED_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

const NAMED_CODES: &[(&str, KeyCode)] = &[
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("prior", KeyCode::PageUp),
    ("next", KeyCode::PageDown),
    ("delete", KeyCode::Delete),
    ("insert", KeyCode::Insert),
    ("backtab", KeyCode::BackTab),
];

/// Parse a space separated key sequence such as `"C-x C-s"`.
pub fn parse_seq(s: &str) -> Result<KeySeq, KeyParseError> {
    let seq = s
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<KeySeq, _>>()?;
    if seq.is_empty() {
        return Err(KeyParseError::Empty);
    }
    Ok(seq)
}

/// Render a key sequence in the same notation [`parse_seq`] accepts.
pub fn describe(seq: &KeySeq) -> String {
    seq.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_control_key() {
        assert_eq!("C-x".parse::<Key>(), Ok(Key::ctrl('x')));
    }

    #[test]
    fn test_parse_meta_and_control() {
        let key: Key = "C-M-a".parse().unwrap();
        assert_eq!(key.code, KeyCode::Char('a'));
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));
        assert!(key.modifiers.contains(KeyModifiers::ALT));
    }

    #[test]
    fn test_parse_control_minus() {
        assert_eq!("C--".parse::<Key>(), Ok(Key::ctrl('-')));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!("RET".parse::<Key>(), Ok(Key::plain(KeyCode::Enter)));
        assert_eq!("<next>".parse::<Key>(), Ok(Key::plain(KeyCode::PageDown)));
        assert_eq!("<f5>".parse::<Key>(), Ok(Key::plain(KeyCode::F(5))));
        assert_eq!("C-SPC".parse::<Key>(), Ok(Key::ctrl(' ')));
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert_eq!(
            "<nope>".parse::<Key>(),
            Err(KeyParseError::Unknown("<nope>".to_string()))
        );
        assert!("C-".parse::<Key>().is_err());
        assert_eq!("".parse::<Key>(), Err(KeyParseError::Empty));
    }

    #[test]
    fn test_display_matches_parse() {
        for text in ["C-x", "M-w", "RET", "DEL", "<up>", "<prior>", "a", "C-SPC", "<f12>"] {
            let key: Key = text.parse().unwrap();
            assert_eq!(key.to_string(), text);
        }
    }

    #[test]
    fn test_shift_is_dropped() {
        let key = Key::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key, Key::char('A'));
        assert_eq!(key.printable(), Some('A'));
    }

    #[test]
    fn test_control_keys_are_not_printable() {
        assert_eq!(Key::ctrl('a').printable(), None);
        assert_eq!(Key::plain(KeyCode::Enter).printable(), None);
    }

    #[test]
    fn test_parse_seq_and_describe() {
        let seq = parse_seq("C-x  C-s").unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(describe(&seq), "C-x C-s");
        assert_eq!(parse_seq("   "), Err(KeyParseError::Empty));
    }
}
