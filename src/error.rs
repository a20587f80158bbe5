//! Recoverable editor errors.
//!
//! None of these abort a transition. Their `Display` text is what ends up in
//! the message log.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{0} is undefined")]
    UnboundKeySequence(String),
    #[error("unknown command: {0}")]
    UnknownCommandName(String),
    #[error("save failed: {0}")]
    SaveFailure(#[from] StoreError),
    #[error("clipboard is empty")]
    EmptyClipboardPaste,
}
