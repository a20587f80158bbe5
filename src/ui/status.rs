use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Application;
use crate::input::describe;

pub fn render_status_bar(state: &Application, frame: &mut Frame, area: Rect) {
    let buf = &state.current;
    let filename = buf
        .path()
        .and_then(|p| p.file_name())
        .map_or_else(|| "*scratch*".to_string(), |s| s.to_string_lossy().to_string());
    let dirty_indicator = if buf.is_dirty() { " [modified]" } else { "" };

    let c = buf.cursor();
    let pending = if state.input.is_empty() {
        String::new()
    } else {
        format!("  {}-", describe(&state.input))
    };

    let status = format!(
        " {filename}{dirty_indicator}  Ln {}, Col {}{pending}",
        c.line + 1,
        c.col + 1
    );
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::Magenta).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_message_bar(state: &Application, frame: &mut Frame, area: Rect) {
    let text = match (&state.prompt, state.last_message()) {
        (Some(prompt), _) => format!("M-x {prompt}"),
        (None, Some(message)) => message.content.to_string(),
        (None, None) => String::new(),
    };
    frame.render_widget(Paragraph::new(text), area);
}
