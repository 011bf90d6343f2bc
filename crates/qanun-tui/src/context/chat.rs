use qanun_types::{Message, Mode, SessionDetail};

use crate::api::{ApiError, ChatBackend};
use crate::branding::{CONNECTION_ERROR, GREETING};
use crate::context::history::{RefreshTicket, SessionHistoryStore};
use crate::context::transcript::Transcript;
use crate::input::InputField;

/// A dispatched chat request. Replies are only applied while the
/// transcript epoch it was issued in is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    pub message: String,
    pub mode: Mode,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectTicket {
    pub session_id: String,
    seq: u64,
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input; nothing rendered, nothing sent.
    Skipped,
    Answered,
    Failed,
    /// The transcript was replaced while the request was in flight.
    Discarded { answered: bool },
}

impl SendOutcome {
    /// The history list is re-read after every request the server accepted.
    pub fn refreshes_history(self) -> bool {
        matches!(
            self,
            SendOutcome::Answered | SendOutcome::Discarded { answered: true }
        )
    }
}

/// Single owner of the session view-model: the visible transcript, the
/// sidebar cache and the draft being typed.
#[derive(Debug)]
pub struct ChatController {
    transcript: Transcript,
    history: SessionHistoryStore,
    input: InputField,
    epoch: u64,
    pending_sends: usize,
    select_seq: u64,
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatController {
    pub fn new() -> Self {
        let mut controller = Self {
            transcript: Transcript::new(),
            history: SessionHistoryStore::new(),
            input: InputField::new(),
            epoch: 0,
            pending_sends: 0,
            select_seq: 0,
        };
        controller.transcript.reset_to(Message::bot(GREETING));
        controller
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn history(&self) -> &SessionHistoryStore {
        &self.history
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputField {
        &mut self.input
    }

    pub fn pending_sends(&self) -> usize {
        self.pending_sends
    }

    pub fn is_busy(&self) -> bool {
        self.pending_sends > 0
    }

    fn reset_transcript(&mut self) {
        self.epoch += 1;
        self.pending_sends = 0;
        self.transcript.reset_to(Message::bot(GREETING));
    }

    // ---- send ----

    /// Renders the user turn, clears the draft and shows the placeholder.
    /// Returns `None` for blank text.
    pub fn begin_send(&mut self, text: &str, mode: Mode) -> Option<SendTicket> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.remove_typing();
        self.transcript.append(Message::user(text));
        self.input.clear();
        self.transcript.show_typing();
        self.pending_sends += 1;
        // A select still in flight would overwrite what was just typed.
        self.select_seq += 1;

        Some(SendTicket {
            message: text.to_string(),
            mode,
            epoch: self.epoch,
        })
    }

    pub fn finish_send(
        &mut self,
        ticket: SendTicket,
        result: Result<String, ApiError>,
    ) -> SendOutcome {
        let answered = result.is_ok();
        if ticket.epoch != self.epoch {
            match &result {
                Ok(_) => tracing::info!("discarding reply for a replaced transcript"),
                Err(error) => tracing::warn!(%error, "chat request failed after transcript reset"),
            }
            return SendOutcome::Discarded { answered };
        }

        self.pending_sends = self.pending_sends.saturating_sub(1);
        self.transcript.remove_typing();
        let outcome = match result {
            Ok(answer) => {
                self.transcript.append(Message::bot(answer));
                SendOutcome::Answered
            }
            Err(error) => {
                tracing::warn!(%error, "chat request failed");
                self.transcript.append(Message::bot(CONNECTION_ERROR));
                SendOutcome::Failed
            }
        };
        if self.pending_sends > 0 {
            self.transcript.show_typing();
        }
        outcome
    }

    pub fn send_message(
        &mut self,
        text: &str,
        mode: Mode,
        backend: &dyn ChatBackend,
    ) -> SendOutcome {
        let Some(ticket) = self.begin_send(text, mode) else {
            return SendOutcome::Skipped;
        };
        let result = backend.send_chat(&ticket.message, ticket.mode);
        let outcome = self.finish_send(ticket, result);
        if outcome.refreshes_history() {
            self.refresh_history(backend);
        }
        outcome
    }

    // ---- clear / new session ----

    pub fn begin_clear(&mut self) {
        self.reset_transcript();
    }

    pub fn finish_clear(&mut self, result: Result<(), ApiError>) {
        if let Err(error) = result {
            tracing::warn!(%error, "clear request failed");
        }
    }

    pub fn clear_chat(&mut self, backend: &dyn ChatBackend) {
        self.begin_clear();
        self.finish_clear(backend.clear());
        self.refresh_history(backend);
    }

    pub fn begin_new_session(&mut self) {
        self.reset_transcript();
        self.history.clear();
    }

    pub fn finish_new_session(&mut self, result: Result<(), ApiError>) {
        if let Err(error) = result {
            tracing::warn!(%error, "new session request failed");
        }
    }

    pub fn new_session(&mut self, backend: &dyn ChatBackend) {
        self.begin_new_session();
        self.finish_new_session(backend.new_session());
        self.refresh_history(backend);
    }

    // ---- select ----

    pub fn begin_select(&mut self, session_id: &str) -> SelectTicket {
        self.select_seq += 1;
        SelectTicket {
            session_id: session_id.to_string(),
            seq: self.select_seq,
            epoch: self.epoch,
        }
    }

    /// Replaces the transcript with the fetched session. Failures and
    /// superseded responses leave the view as it is. Returns whether the
    /// view changed.
    pub fn finish_select(
        &mut self,
        ticket: SelectTicket,
        result: Result<SessionDetail, ApiError>,
    ) -> bool {
        if ticket.seq != self.select_seq || ticket.epoch != self.epoch {
            tracing::debug!(session = %ticket.session_id, "dropping superseded session load");
            return false;
        }
        match result {
            Ok(detail) => {
                self.epoch += 1;
                self.pending_sends = 0;
                self.transcript.replace(detail.messages);
                self.history.set_active(&ticket.session_id);
                true
            }
            Err(error) => {
                tracing::warn!(session = %ticket.session_id, %error, "failed to load session");
                false
            }
        }
    }

    pub fn select_session(&mut self, session_id: &str, backend: &dyn ChatBackend) -> bool {
        let ticket = self.begin_select(session_id);
        let result = backend.get_session(session_id);
        self.finish_select(ticket, result)
    }

    // ---- history ----

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.history.begin_refresh()
    }

    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<qanun_types::SessionSummary>, ApiError>,
    ) -> bool {
        self.history.finish_refresh(ticket, result)
    }

    pub fn refresh_history(&mut self, backend: &dyn ChatBackend) -> bool {
        self.history.refresh(backend)
    }
}
