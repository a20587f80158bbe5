/// Rows reserved below the text area (status line and message line).
pub const CHROME_ROWS: usize = 2;

/// A row/column pair.
///
/// Used both for positions (scroll origin) and for sizes (terminal or
/// viewport dimensions), where `row` is the height and `col` the width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Build a size from a terminal `(width, height)` pair as crossterm reports it.
    pub fn from_terminal(width: u16, height: u16) -> Self {
        Self {
            row: usize::from(height),
            col: usize::from(width),
        }
    }
}

/// The part of the terminal available to the text area.
pub const fn editor_size(size: Coord) -> Coord {
    Coord {
        row: size.row.saturating_sub(CHROME_ROWS),
        col: size.col,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_size_reserves_chrome_rows() {
        assert_eq!(editor_size(Coord::new(24, 80)), Coord::new(22, 80));
    }

    #[test]
    fn test_editor_size_saturates_on_tiny_terminal() {
        assert_eq!(editor_size(Coord::new(1, 10)), Coord::new(0, 10));
    }

    #[test]
    fn test_from_terminal_swaps_into_row_col() {
        assert_eq!(Coord::from_terminal(80, 24), Coord::new(24, 80));
    }
}
