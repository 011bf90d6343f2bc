use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use crate::api::ChatBackend;
use crate::event::{CustomEvent, Event};

type Job = Box<dyn FnOnce(&dyn ChatBackend) -> CustomEvent + Send>;

/// One worker thread that runs backend calls in submission order and posts
/// each completion to the UI event channel.
pub struct RequestLane {
    jobs: Sender<Job>,
}

impl RequestLane {
    pub fn spawn(backend: Arc<dyn ChatBackend>, events: Sender<Event>) -> std::io::Result<Self> {
        let (jobs, queue) = mpsc::channel::<Job>();
        thread::Builder::new()
            .name("qanun-requests".to_string())
            .spawn(move || {
                for job in queue {
                    let completion = job(backend.as_ref());
                    if events.send(Event::Custom(completion)).is_err() {
                        break;
                    }
                }
                tracing::debug!("request lane stopped");
            })?;
        Ok(Self { jobs })
    }

    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce(&dyn ChatBackend) -> CustomEvent + Send + 'static,
    {
        if self.jobs.send(Box::new(job)).is_err() {
            tracing::error!("request lane is gone; dropping request");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::context::ChatController;
    use parking_lot::Mutex;
    use qanun_types::{Mode, SessionDetail, SessionSummary};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<String>>,
    }

    impl ChatBackend for RecordingBackend {
        fn send_chat(&self, message: &str, _mode: Mode) -> Result<String, ApiError> {
            std::thread::sleep(Duration::from_millis(20));
            self.calls.lock().push(format!("chat:{}", message));
            Ok(format!("re:{}", message))
        }

        fn clear(&self) -> Result<(), ApiError> {
            self.calls.lock().push("clear".to_string());
            Ok(())
        }

        fn new_session(&self) -> Result<(), ApiError> {
            self.calls.lock().push("new".to_string());
            Ok(())
        }

        fn list_history(&self) -> Result<Vec<SessionSummary>, ApiError> {
            self.calls.lock().push("history".to_string());
            Ok(Vec::new())
        }

        fn get_session(&self, session_id: &str) -> Result<SessionDetail, ApiError> {
            self.calls.lock().push(format!("session:{}", session_id));
            Ok(SessionDetail::default())
        }
    }

    #[test]
    fn jobs_run_in_submission_order() {
        let backend = Arc::new(RecordingBackend::default());
        let (tx, rx) = mpsc::channel();
        let lane = RequestLane::spawn(backend.clone(), tx).unwrap();
        let mut controller = ChatController::new();

        let ticket = controller.begin_send("q1", Mode::General).unwrap();
        lane.submit(move |b| CustomEvent::SendFinished {
            result: b.send_chat(&ticket.message, ticket.mode),
            ticket,
        });
        controller.begin_new_session();
        lane.submit(|b| CustomEvent::NewSessionFinished(b.new_session()));
        let refresh = controller.begin_refresh();
        lane.submit(move |b| CustomEvent::HistoryLoaded {
            ticket: refresh,
            result: b.list_history(),
        });

        let mut seen = Vec::new();
        for _ in 0..3 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Event::Custom(CustomEvent::SendFinished { ticket, result }) => {
                    seen.push("send");
                    let outcome = controller.finish_send(ticket, result);
                    assert_eq!(
                        outcome,
                        crate::context::SendOutcome::Discarded { answered: true }
                    );
                }
                Event::Custom(CustomEvent::NewSessionFinished(result)) => {
                    seen.push("new");
                    controller.finish_new_session(result);
                }
                Event::Custom(CustomEvent::HistoryLoaded { ticket, result }) => {
                    seen.push("history");
                    controller.finish_refresh(ticket, result);
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }

        assert_eq!(seen, vec!["send", "new", "history"]);
        assert_eq!(
            *backend.calls.lock(),
            vec!["chat:q1".to_string(), "new".to_string(), "history".to_string()]
        );
        assert_eq!(controller.transcript().message_count(), 1);
    }
}
