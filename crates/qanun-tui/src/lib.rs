pub mod api;
pub mod app;
pub mod branding;
pub mod components;
pub mod context;
pub mod event;
pub mod export;
pub mod input;
pub mod request;
pub mod terminal;
pub mod theme;
pub mod ui;

pub use api::{ApiClient, ApiError, ChatBackend};
pub use app::App;
pub use context::{ChatController, SendOutcome, SessionHistoryStore, Transcript};
pub use event::Event;
pub use export::ExportFormat;
pub use terminal::{reset_title, set_title};
pub use theme::Theme;

use qanun_config::Config;

fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::restore();
        default_hook(panic_info);
    }));
}

pub fn run_tui(config: &Config) -> anyhow::Result<()> {
    setup_panic_hook();

    let mut app = App::new(config)?;
    app.run()
}
