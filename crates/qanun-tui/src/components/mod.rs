mod dialogs;
mod keyboard;
mod mode_bar;
mod prompt;
mod recording;
mod sidebar;
mod spinner;
mod transcript_view;

pub use dialogs::{centered_rect, dialog_inner, AlertDialog, AlertType, ExportDialog, HelpDialog};
pub use keyboard::KeyboardView;
pub use mode_bar::ModeBar;
pub use prompt::Prompt;
pub use recording::RecordingIndicator;
pub use sidebar::Sidebar;
pub use spinner::Spinner;
pub use transcript_view::TranscriptView;
