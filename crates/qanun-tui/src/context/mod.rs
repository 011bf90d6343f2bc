mod chat;
mod history;
mod transcript;

pub use chat::{ChatController, SelectTicket, SendOutcome, SendTicket};
pub use history::{HistoryRow, RefreshTicket, SessionHistoryStore};
pub use transcript::{Transcript, TranscriptEntry, TYPING_ID};
