use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use im::Vector;
use ropey::Rope;

use super::coord::Coord;

/// A fragment of text extracted from or inserted into a buffer.
pub type Text = Rope;

/// Number of spaces inserted by [`Buffer::insert_tab`].
pub const TAB_WIDTH: usize = 4;

/// Oldest undo snapshots are dropped past this depth.
const MAX_HISTORY: usize = 1024;

/// Cursor position in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars, within the line.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffer-level edit requests.
///
/// This is the closed set of operations that can be delivered to a buffer
/// directly, without going through a key binding.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveLineStart,
    MoveLineEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveBufferStart,
    MoveBufferEnd,
    InsertChar(char),
    InsertText(Text),
    Newline,
    Tab,
    DeleteBack,
    DeleteForward,
    KillLine,
    Copy,
    Cut,
    StartSelection,
    ClearSelection,
    SelectAll,
    Undo,
}

/// The result of a buffer operation.
///
/// Operations that extract text (kill, copy, cut) produce a fragment that
/// the caller is expected to push onto the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Buffer(Buffer),
    WithText(Buffer, Text),
}

impl Edit {
    /// Split into the new buffer and the extracted fragment, if any.
    pub fn into_parts(self) -> (Buffer, Option<Text>) {
        match self {
            Self::Buffer(buffer) => (buffer, None),
            Self::WithText(buffer, text) => (buffer, Some(text)),
        }
    }
}

impl From<Buffer> for Edit {
    fn from(buffer: Buffer) -> Self {
        Self::Buffer(buffer)
    }
}

impl From<(Buffer, Text)> for Edit {
    fn from((buffer, text): (Buffer, Text)) -> Self {
        Self::WithText(buffer, text)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    content: Rope,
    cursor: Cursor,
}

/// An immutable text buffer backed by a rope.
///
/// Every operation takes `&self` and returns a new buffer. Clones share the
/// rope's tree nodes, so older buffers stay valid and cheap to keep around.
#[derive(Clone, PartialEq)]
pub struct Buffer {
    content: Rope,
    cursor: Cursor,
    anchor: Option<Cursor>,
    scroll: Coord,
    path: Option<Arc<Path>>,
    dirty: bool,
    history: Vector<Snapshot>,
}

impl Buffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            content: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
            scroll: Coord::default(),
            path: None,
            dirty: false,
            history: Vector::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Associate the buffer with a file path.
    pub fn with_path(&self, path: &Path) -> Self {
        Self {
            path: Some(Arc::from(path)),
            ..self.clone()
        }
    }

    /// The file this buffer saves to, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The underlying rope.
    pub const fn content(&self) -> &Rope {
        &self.content
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Top-left corner of the visible region.
    pub const fn scroll(&self) -> Coord {
        self.scroll
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// The same buffer, marked as saved.
    pub fn mark_clean(&self) -> Self {
        Self {
            dirty: false,
            ..self.clone()
        }
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.content.len_lines() {
            return None;
        }
        let line = self.content.line(line_idx);
        Some(line.slice(..self.line_len(line_idx)).to_string())
    }

    /// Length of a line in chars (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.content.len_lines() {
            return 0;
        }
        let line = self.content.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && is_line_break(line.char(len - 1)) {
            len -= 1;
            if len > 0 && line.char(len) == '\n' && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// The selected region as `(start, end)` cursors, ordered.
    pub fn selection(&self) -> Option<(Cursor, Cursor)> {
        let anchor = self.anchor?;
        if (anchor.line, anchor.col) <= (self.cursor.line, self.cursor.col) {
            Some((anchor, self.cursor))
        } else {
            Some((self.cursor, anchor))
        }
    }

    /// Apply a buffer-level action.
    pub fn apply(&self, action: &BufferAction) -> Edit {
        match action {
            BufferAction::MoveLeft => self.move_left().into(),
            BufferAction::MoveRight => self.move_right().into(),
            BufferAction::MoveUp => self.move_up().into(),
            BufferAction::MoveDown => self.move_down().into(),
            BufferAction::MoveLineStart => self.move_line_start().into(),
            BufferAction::MoveLineEnd => self.move_line_end().into(),
            BufferAction::MoveWordLeft => self.move_word_left().into(),
            BufferAction::MoveWordRight => self.move_word_right().into(),
            BufferAction::MoveBufferStart => self.move_buffer_start().into(),
            BufferAction::MoveBufferEnd => self.move_buffer_end().into(),
            BufferAction::InsertChar(ch) => self.insert_char(*ch).into(),
            BufferAction::InsertText(text) => self.insert_text(text).into(),
            BufferAction::Newline => self.insert_newline().into(),
            BufferAction::Tab => self.insert_tab().into(),
            BufferAction::DeleteBack => self.delete_back().into(),
            BufferAction::DeleteForward => self.delete_forward().into(),
            BufferAction::KillLine => self.kill_line(),
            BufferAction::Copy => self.copy(),
            BufferAction::Cut => self.cut(),
            BufferAction::StartSelection => self.start_selection().into(),
            BufferAction::ClearSelection => self.clear_selection().into(),
            BufferAction::SelectAll => self.select_all().into(),
            BufferAction::Undo => self.undo().into(),
        }
    }

    // --- Movement ---

    pub fn move_left(&self) -> Self {
        let cursor = if self.cursor.col > 0 {
            Cursor::at(self.cursor.line, self.clamped_col() - 1)
        } else if self.cursor.line > 0 {
            let line = self.cursor.line - 1;
            Cursor::at(line, self.line_len(line))
        } else {
            return self.clone();
        };
        self.with_cursor(cursor)
    }

    pub fn move_right(&self) -> Self {
        let len = self.line_len(self.cursor.line);
        let cursor = if self.cursor.col < len {
            Cursor::at(self.cursor.line, self.cursor.col + 1)
        } else if self.cursor.line + 1 < self.line_count() {
            Cursor::at(self.cursor.line + 1, 0)
        } else {
            return self.clone();
        };
        self.with_cursor(cursor)
    }

    pub fn move_up(&self) -> Self {
        self.move_lines_up(1)
    }

    pub fn move_down(&self) -> Self {
        self.move_lines_down(1)
    }

    /// Move cursor to the beginning of the line.
    pub fn move_line_start(&self) -> Self {
        self.with_cursor(Cursor::at(self.cursor.line, 0))
    }

    /// Move cursor to the end of the line.
    pub fn move_line_end(&self) -> Self {
        self.with_cursor(Cursor::at(self.cursor.line, self.line_len(self.cursor.line)))
    }

    /// Move cursor to the start of the previous word.
    pub fn move_word_left(&self) -> Self {
        let col = self.clamped_col();
        if col == 0 {
            return self.move_left();
        }
        let chars: Vec<char> = self.content.line(self.cursor.line).chars().take(col).collect();
        let mut pos = chars.len();
        while pos > 0 && !is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        self.with_cursor(Cursor::at(self.cursor.line, pos))
    }

    /// Move cursor past the current word and the gap that follows it.
    pub fn move_word_right(&self) -> Self {
        let len = self.line_len(self.cursor.line);
        if self.cursor.col >= len {
            return self.move_right();
        }
        let chars: Vec<char> = self.content.line(self.cursor.line).chars().take(len).collect();
        let mut pos = self.cursor.col;
        while pos < len && is_word_char(chars[pos]) {
            pos += 1;
        }
        while pos < len && !is_word_char(chars[pos]) {
            pos += 1;
        }
        self.with_cursor(Cursor::at(self.cursor.line, pos))
    }

    pub fn move_buffer_start(&self) -> Self {
        self.with_cursor(Cursor::new())
    }

    pub fn move_buffer_end(&self) -> Self {
        let last = self.line_count().saturating_sub(1);
        self.with_cursor(Cursor::at(last, self.line_len(last)))
    }

    /// Move cursor to a specific line and column, clamped to the content.
    pub fn move_to(&self, line: usize, col: usize) -> Self {
        let line = line.min(self.line_count().saturating_sub(1));
        self.with_cursor(Cursor::at(line, col.min(self.line_len(line))))
    }

    /// Move the cursor and the scroll origin one viewport down.
    pub fn page_down(&self, viewport: Coord) -> Self {
        let rows = viewport.row.max(1);
        let last = self.line_count().saturating_sub(1);
        let moved = self.move_lines_down(rows);
        Self {
            scroll: Coord {
                row: (self.scroll.row + rows).min(last),
                ..self.scroll
            },
            ..moved
        }
        .scroll_to_cursor(viewport)
    }

    /// Move the cursor and the scroll origin one viewport up.
    pub fn page_up(&self, viewport: Coord) -> Self {
        let rows = viewport.row.max(1);
        let moved = self.move_lines_up(rows);
        Self {
            scroll: Coord {
                row: self.scroll.row.saturating_sub(rows),
                ..self.scroll
            },
            ..moved
        }
        .scroll_to_cursor(viewport)
    }

    // --- Editing ---

    /// Insert a character at the cursor position.
    pub fn insert_char(&self, ch: char) -> Self {
        let idx = self.cursor_char_idx();
        let mut content = self.content.clone();
        content.insert_char(idx, ch);
        let cursor = char_to_cursor(&content, idx + 1);
        self.edited(content, cursor)
    }

    /// Insert a text fragment at the cursor position.
    pub fn insert_text(&self, text: &Text) -> Self {
        if text.len_chars() == 0 {
            return self.clone();
        }
        let idx = self.cursor_char_idx();
        let mut content = self.content.clone();
        content.insert(idx, &text.to_string());
        let cursor = char_to_cursor(&content, idx + text.len_chars());
        self.edited(content, cursor)
    }

    /// Split the current line at the cursor.
    pub fn insert_newline(&self) -> Self {
        self.insert_char('\n')
    }

    /// Insert [`TAB_WIDTH`] spaces.
    pub fn insert_tab(&self) -> Self {
        self.insert_text(&Rope::from_str(&" ".repeat(TAB_WIDTH)))
    }

    /// Delete the character before the cursor.
    pub fn delete_back(&self) -> Self {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return self.clone();
        }
        let start = if idx >= 2
            && self.content.char(idx - 1) == '\n'
            && self.content.char(idx - 2) == '\r'
        {
            idx - 2
        } else {
            idx - 1
        };
        let mut content = self.content.clone();
        content.remove(start..idx);
        let cursor = char_to_cursor(&content, start);
        self.edited(content, cursor)
    }

    /// Delete the character at the cursor.
    pub fn delete_forward(&self) -> Self {
        let idx = self.cursor_char_idx();
        let Some(end) = self.next_char_end(idx) else {
            return self.clone();
        };
        let mut content = self.content.clone();
        content.remove(idx..end);
        let cursor = char_to_cursor(&content, idx);
        self.edited(content, cursor)
    }

    /// Remove from the cursor to the end of the line.
    ///
    /// At the end of a line the line break itself is removed. At the end of
    /// the buffer nothing is removed and no text is produced.
    pub fn kill_line(&self) -> Edit {
        let idx = self.cursor_char_idx();
        let line_end = self.content.line_to_char(self.cursor.line) + self.line_len(self.cursor.line);
        let end = if idx < line_end {
            line_end
        } else if let Some(end) = self.next_char_end(idx) {
            end
        } else {
            return Edit::Buffer(self.clone());
        };
        self.remove_range(idx..end)
    }

    /// Copy the selection, clearing it.
    ///
    /// Without a selection the buffer is returned unchanged and no text is
    /// produced.
    pub fn copy(&self) -> Edit {
        let Some(range) = self.selection_range() else {
            return Edit::Buffer(self.clone());
        };
        let text = Rope::from(self.content.slice(range));
        Edit::WithText(self.clear_selection(), text)
    }

    /// Remove the selection and return it.
    pub fn cut(&self) -> Edit {
        let Some(range) = self.selection_range() else {
            return Edit::Buffer(self.clone());
        };
        self.remove_range(range)
    }

    // --- Selection ---

    /// Set the selection anchor at the cursor.
    pub fn start_selection(&self) -> Self {
        Self {
            anchor: Some(self.cursor),
            ..self.clone()
        }
    }

    pub fn clear_selection(&self) -> Self {
        Self {
            anchor: None,
            ..self.clone()
        }
    }

    /// Select the whole buffer, leaving the cursor at its end.
    pub fn select_all(&self) -> Self {
        Self {
            anchor: Some(Cursor::new()),
            ..self.move_buffer_end()
        }
    }

    /// Restore the content as it was before the last edit.
    pub fn undo(&self) -> Self {
        let mut history = self.history.clone();
        let Some(snapshot) = history.pop_back() else {
            return self.clone();
        };
        Self {
            content: snapshot.content,
            cursor: snapshot.cursor,
            anchor: None,
            dirty: true,
            history,
            ..self.clone()
        }
    }

    // --- Viewport ---

    /// Adjust the scroll origin so the cursor is inside `viewport`.
    pub fn scroll_to_cursor(&self, viewport: Coord) -> Self {
        Self {
            scroll: Coord {
                row: follow(self.scroll.row, self.cursor.line, viewport.row),
                col: follow(self.scroll.col, self.clamped_col(), viewport.col),
            },
            ..self.clone()
        }
    }

    /// Fit the visible region to a new viewport size.
    pub fn resize(&self, viewport: Coord) -> Self {
        self.scroll_to_cursor(viewport)
    }

    // --- Private helpers ---

    fn with_cursor(&self, cursor: Cursor) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }

    fn edited(&self, content: Rope, cursor: Cursor) -> Self {
        let mut history = self.history.clone();
        history.push_back(Snapshot {
            content: self.content.clone(),
            cursor: self.cursor,
        });
        if history.len() > MAX_HISTORY {
            history.pop_front();
        }
        Self {
            content,
            cursor,
            anchor: None,
            dirty: true,
            history,
            ..self.clone()
        }
    }

    fn remove_range(&self, range: Range<usize>) -> Edit {
        let text = Rope::from(self.content.slice(range.clone()));
        let mut content = self.content.clone();
        content.remove(range.clone());
        let cursor = char_to_cursor(&content, range.start);
        Edit::WithText(self.edited(content, cursor), text)
    }

    fn move_lines_up(&self, n: usize) -> Self {
        if self.cursor.line == 0 {
            return self.clone();
        }
        let line = self.cursor.line.saturating_sub(n);
        self.with_cursor(self.vertical_cursor(line))
    }

    fn move_lines_down(&self, n: usize) -> Self {
        let last = self.line_count().saturating_sub(1);
        if self.cursor.line >= last {
            return self.clone();
        }
        let line = (self.cursor.line + n).min(last);
        self.with_cursor(self.vertical_cursor(line))
    }

    fn vertical_cursor(&self, line: usize) -> Cursor {
        Cursor {
            line,
            col: self.cursor.col_memory.min(self.line_len(line)),
            col_memory: self.cursor.col_memory,
        }
    }

    fn clamped_col(&self) -> usize {
        self.cursor.col.min(self.line_len(self.cursor.line))
    }

    /// Convert the cursor position to a rope char index.
    fn cursor_char_idx(&self) -> usize {
        self.content.line_to_char(self.cursor.line) + self.clamped_col()
    }

    /// End of the char at `idx`, treating `\r\n` as one char.
    fn next_char_end(&self, idx: usize) -> Option<usize> {
        let len = self.content.len_chars();
        if idx >= len {
            return None;
        }
        if self.content.char(idx) == '\r' && idx + 1 < len && self.content.char(idx + 1) == '\n' {
            Some(idx + 2)
        } else {
            Some(idx + 1)
        }
    }

    fn selection_range(&self) -> Option<Range<usize>> {
        let (start, end) = self.selection()?;
        let to_idx = |c: Cursor| {
            self.content.line_to_char(c.line) + c.col.min(self.line_len(c.line))
        };
        Some(to_idx(start)..to_idx(end))
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field(
                "content",
                &format_args!("Rope({} lines)", self.content.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("scroll", &self.scroll)
            .field("path", &self.path)
            .field("dirty", &self.dirty)
            .field("history", &self.history.len())
            .finish()
    }
}

/// The chars ropey treats as ending a line.
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn char_to_cursor(content: &Rope, idx: usize) -> Cursor {
    let line = content.char_to_line(idx);
    Cursor::at(line, idx - content.line_to_char(line))
}

/// New scroll offset along one axis so that `pos` lies in `[offset, offset + span)`.
const fn follow(offset: usize, pos: usize, span: usize) -> usize {
    if span == 0 || pos < offset {
        pos
    } else if pos >= offset + span {
        pos + 1 - span
    } else {
        offset
    }
}
