use crossterm::event::{KeyEvent, MouseEvent};
use qanun_types::{SessionDetail, SessionSummary};

use crate::api::ApiError;
use crate::context::{RefreshTicket, SelectTicket, SendTicket};
use crate::input::DictationEvent;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    Paste(String),
    Custom(CustomEvent),
}

/// Completions reported back to the UI thread by background workers.
#[derive(Debug)]
pub enum CustomEvent {
    SendFinished {
        ticket: SendTicket,
        result: Result<String, ApiError>,
    },
    ClearFinished(Result<(), ApiError>),
    NewSessionFinished(Result<(), ApiError>),
    HistoryLoaded {
        ticket: RefreshTicket,
        result: Result<Vec<SessionSummary>, ApiError>,
    },
    SessionLoaded {
        ticket: SelectTicket,
        result: Result<SessionDetail, ApiError>,
    },
    Dictation(DictationEvent),
}
