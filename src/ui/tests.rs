use super::*;
use crate::app::{Application, put_message};
use crate::editor::Buffer;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::path::Path;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(40, 6);
    Terminal::new(backend).unwrap()
}

fn row_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width;
    (0..width)
        .map(|x| buffer.content()[usize::from(row * width + x)].symbol())
        .collect()
}

#[test]
fn test_render_shows_buffer_lines_with_numbers() {
    let state = Application::new(Buffer::from_text("hello\nworld"));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&state, frame)).unwrap();

    assert!(row_text(&terminal, 0).starts_with("1 hello"));
    assert!(row_text(&terminal, 1).starts_with("2 world"));
}

#[test]
fn test_status_bar_shows_file_and_position() {
    let buffer = Buffer::from_text("abc")
        .with_path(Path::new("/tmp/notes.txt"))
        .move_line_end()
        .insert_char('d');
    let state = Application::new(buffer);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&state, frame)).unwrap();

    let status = row_text(&terminal, 4);
    assert!(status.contains("notes.txt [modified]"), "status was {status:?}");
    assert!(status.contains("Ln 1, Col 5"), "status was {status:?}");
}

#[test]
fn test_status_bar_shows_pending_keys() {
    let mut state = Application::default();
    state.input.push_back(crate::input::Key::ctrl('x'));
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&state, frame)).unwrap();

    assert!(row_text(&terminal, 4).contains("C-x-"));
}

#[test]
fn test_message_bar_shows_latest_message() {
    let state = put_message(put_message(Application::default(), "first"), "second");
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&state, frame)).unwrap();

    assert!(row_text(&terminal, 5).starts_with("second"));
}

#[test]
fn test_message_bar_shows_open_prompt() {
    let mut state = put_message(Application::default(), "hidden");
    state.prompt = Some("und".to_string());
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&state, frame)).unwrap();

    assert!(row_text(&terminal, 5).starts_with("M-x und"));
}

#[test]
fn test_render_follows_scroll_origin() {
    let text: String = (1..=20).map(|i| format!("line {i}\n")).collect();
    let buffer = Buffer::from_text(&text)
        .move_to(15, 0)
        .scroll_to_cursor(crate::editor::Coord::new(4, 40));
    let state = Application::new(buffer);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&state, frame)).unwrap();

    assert!(row_text(&terminal, 3).contains("line 16"));
}

#[test]
fn test_line_number_width() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(line_number_width(123_456), 6);
}
