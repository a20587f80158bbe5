use std::io::stdout;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{Action, App, Application, Outcome, update};
use crate::editor::{Buffer, Coord, editor_size};
use crate::store::{FileStore, Store};

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, the terminal cannot be
    /// initialized, or reading terminal events fails.
    pub fn run(&mut self) -> Result<()> {
        let buffer = match &self.file_path {
            Some(path) => FileStore
                .load(path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
            None => Buffer::empty(),
        };

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal (quire requires an interactive terminal)")?;
        let area = terminal.size()?;
        let size = Coord::from_terminal(area.width, area.height);
        info!(rows = size.row, cols = size.col, path = ?self.file_path, "starting");

        let mut state = Application::new(buffer)
            .with_keys(self.keys.clone())
            .with_size(size);
        state.current = state.current.resize(editor_size(size));

        let result = execute!(stdout(), EnableBracketedPaste)
            .context("Failed to enable bracketed paste")
            .and_then(|()| Self::event_loop(&mut terminal, state, size));

        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, mut state: Application, mut size: Coord) -> Result<()> {
        loop {
            terminal.draw(|frame| crate::ui::render(&state, frame))?;

            let event = event::read()?;
            let Some(action) = Self::handle_event(&event, &mut size) else {
                continue;
            };

            // A propagated action leaves `state` as it was.
            match update(state.clone(), action) {
                Outcome::Continue(next) => state = next,
                Outcome::Propagate(Action::Quit) => {
                    info!("quit");
                    return Ok(());
                }
                Outcome::Propagate(other) => {
                    debug!(action = ?other, "ignoring propagated action");
                }
            }
        }
    }
}
