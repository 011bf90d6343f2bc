use qanun_types::SessionSummary;

use crate::api::{ApiError, ChatBackend};
use crate::branding::EMPTY_HISTORY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRow<'a> {
    Placeholder(&'static str),
    Session {
        summary: &'a SessionSummary,
        active: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Read-only mirror of the server's session list. Refreshed wholesale.
#[derive(Debug, Default)]
pub struct SessionHistoryStore {
    sessions: Vec<SessionSummary>,
    selected: Option<String>,
    issued: u64,
    applied: u64,
}

impl SessionHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SessionSummary> {
        self.sessions.get(index)
    }

    /// Drops the cache, e.g. when a new server session starts.
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.selected = None;
    }

    /// Marks `id` active until the next successful refresh.
    pub fn set_active(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    /// Index of the highlighted row. An explicit selection wins; otherwise
    /// the last row is active.
    pub fn active_index(&self) -> Option<usize> {
        match &self.selected {
            Some(id) => self.sessions.iter().position(|s| &s.id == id),
            None => self.sessions.len().checked_sub(1),
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_index()
            .and_then(|i| self.sessions.get(i))
            .map(|s| s.id.as_str())
    }

    pub fn rows(&self) -> Vec<HistoryRow<'_>> {
        if self.sessions.is_empty() {
            return vec![HistoryRow::Placeholder(EMPTY_HISTORY)];
        }
        let active = self.active_index();
        self.sessions
            .iter()
            .enumerate()
            .map(|(i, summary)| HistoryRow::Session {
                summary,
                active: active == Some(i),
            })
            .collect()
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Applies a fetched list. Errors and responses older than the last
    /// applied one leave the cache untouched. Returns whether it changed.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<SessionSummary>, ApiError>,
    ) -> bool {
        if ticket.0 < self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "dropping stale history");
            return false;
        }
        match result {
            Ok(sessions) => {
                self.applied = ticket.0;
                self.sessions = sessions;
                self.selected = None;
                true
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load history");
                false
            }
        }
    }

    pub fn refresh(&mut self, backend: &dyn ChatBackend) -> bool {
        let ticket = self.begin_refresh();
        self.finish_refresh(ticket, backend.list_history())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn summaries(ids: &[(&str, &str)]) -> Vec<SessionSummary> {
        ids.iter()
            .map(|(id, title)| SessionSummary::new(*id, *title))
            .collect()
    }

    fn status_error() -> ApiError {
        ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    #[test]
    fn empty_cache_renders_placeholder() {
        let store = SessionHistoryStore::new();
        assert_eq!(store.rows(), vec![HistoryRow::Placeholder(EMPTY_HISTORY)]);
        assert_eq!(store.active_index(), None);
    }

    #[test]
    fn last_row_is_active_by_default() {
        let mut store = SessionHistoryStore::new();
        let ticket = store.begin_refresh();
        store.finish_refresh(ticket, Ok(summaries(&[("a", "T1"), ("b", "T2")])));
        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        match (&rows[0], &rows[1]) {
            (
                HistoryRow::Session {
                    summary: first,
                    active: false,
                },
                HistoryRow::Session {
                    summary: second,
                    active: true,
                },
            ) => {
                assert_eq!(first.title, "T1");
                assert_eq!(second.title, "T2");
            }
            other => panic!("unexpected rows: {:?}", other),
        }
    }

    #[test]
    fn explicit_selection_until_next_refresh() {
        let mut store = SessionHistoryStore::new();
        let ticket = store.begin_refresh();
        store.finish_refresh(ticket, Ok(summaries(&[("a", "T1"), ("b", "T2")])));
        store.set_active("a");
        assert_eq!(store.active_id(), Some("a"));

        let ticket = store.begin_refresh();
        store.finish_refresh(ticket, Ok(summaries(&[("a", "T1"), ("b", "T2")])));
        assert_eq!(store.active_id(), Some("b"));
    }

    #[test]
    fn failed_refresh_keeps_cache() {
        let mut store = SessionHistoryStore::new();
        let ticket = store.begin_refresh();
        store.finish_refresh(ticket, Ok(summaries(&[("a", "T1")])));
        let ticket = store.begin_refresh();
        assert!(!store.finish_refresh(ticket, Err(status_error())));
        assert_eq!(store.sessions().len(), 1);
    }

    #[test]
    fn older_refresh_never_overwrites_newer() {
        let mut store = SessionHistoryStore::new();
        let older = store.begin_refresh();
        let newer = store.begin_refresh();
        assert!(store.finish_refresh(newer, Ok(summaries(&[("b", "new")]))));
        assert!(!store.finish_refresh(older, Ok(summaries(&[("a", "old")]))));
        assert_eq!(store.sessions()[0].id, "b");
    }

    #[test]
    fn unknown_selection_highlights_nothing() {
        let mut store = SessionHistoryStore::new();
        let ticket = store.begin_refresh();
        store.finish_refresh(ticket, Ok(summaries(&[("a", "T1")])));
        store.set_active("zzz");
        assert!(store.active_index().is_none());
    }
}
