//! Persistent text buffer.
//!
//! Provides a rope-backed, immutable buffer with cursor, selection and undo
//! history. Every operation returns a new buffer; older values stay valid.

mod buffer;
mod coord;

pub use buffer::{Buffer, BufferAction, Cursor, Edit, TAB_WIDTH, Text};
pub use coord::{CHROME_ROWS, Coord, editor_size};
