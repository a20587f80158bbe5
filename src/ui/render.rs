use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Application;
use crate::editor::{Buffer, CHROME_ROWS};

use super::status;

/// Render the complete UI.
pub fn render(state: &Application, frame: &mut Frame) {
    let area = frame.area();
    let chrome = u16::try_from(CHROME_ROWS).unwrap_or(u16::MAX);
    let text_area = Rect {
        height: area.height.saturating_sub(chrome),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: area.height.min(1),
        ..area
    };
    let message_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    render_buffer(&state.current, frame, text_area);
    status::render_status_bar(state, frame, status_area);
    status::render_message_bar(state, frame, message_area);
}

fn render_buffer(buf: &Buffer, frame: &mut Frame, area: Rect) {
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let text_width = usize::from(area.width.saturating_sub(gutter_width + 1));

    let scroll = buf.scroll();
    let cursor = buf.cursor();
    let hscroll = if text_width > 0 && cursor.col >= scroll.col + text_width {
        cursor.col + 1 - text_width
    } else {
        scroll.col
    };

    let start = scroll.row;
    let end = (start + usize::from(area.height)).min(total_lines);
    let selection = buf.selection();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        let chars: Vec<char> = line_text.chars().collect();
        let selected = selection.map_or(0..0, |(from, to)| {
            if line_idx < from.line || line_idx > to.line {
                0..0
            } else {
                let lo = if line_idx == from.line { from.col } else { 0 };
                let hi = if line_idx == to.line { to.col } else { usize::MAX };
                lo..hi
            }
        });
        let cursor_col = (line_idx == cursor.line).then(|| cursor.col.min(chars.len()));
        spans.extend(line_spans(&chars, hscroll, text_width, &selected, cursor_col));

        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

fn line_spans(
    chars: &[char],
    hscroll: usize,
    text_width: usize,
    selected: &Range<usize>,
    cursor_col: Option<usize>,
) -> Vec<Span<'static>> {
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
    let selected_style = Style::default().bg(Color::DarkGray);

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut used = 0;

    let visible = chars.iter().copied().chain(std::iter::once(' ')).enumerate().skip(hscroll);
    for (col, ch) in visible {
        let at_end = col == chars.len();
        if at_end && cursor_col != Some(col) {
            break;
        }
        let ch = if ch == '\t' { ' ' } else { ch };
        let width = ch.width().unwrap_or(0);
        if used + width > text_width {
            break;
        }
        used += width;

        let style = if cursor_col == Some(col) {
            cursor_style
        } else if selected.contains(&col) {
            selected_style
        } else {
            Style::default()
        };
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
