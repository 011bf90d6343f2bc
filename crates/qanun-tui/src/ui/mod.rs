mod escape;
mod text;

pub use escape::{escape_markup, sanitize_terminal};
pub use text::{display_width, pad_right, truncate, wrap_text};
