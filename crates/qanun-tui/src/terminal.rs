use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

use crate::branding::{APP_NAME, APP_SHORT_NAME};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> io::Result<Tui> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture,
        crossterm::event::EnableBracketedPaste,
    )?;
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend)
}

pub fn restore() -> io::Result<()> {
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture,
        crossterm::event::DisableBracketedPaste,
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

pub fn set_title(title: &str) -> io::Result<()> {
    crossterm::execute!(io::stdout(), crossterm::terminal::SetTitle(title))
}

pub fn default_title() -> String {
    format!("{} ({})", APP_NAME, APP_SHORT_NAME)
}

pub fn reset_title() -> io::Result<()> {
    set_title(&default_title())
}
