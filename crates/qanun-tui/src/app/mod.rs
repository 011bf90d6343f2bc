#[allow(clippy::module_inception)]
mod app;
mod layout;
mod state;

pub use app::App;
pub use layout::AppLayout;
pub use state::{AppState, Focus};
