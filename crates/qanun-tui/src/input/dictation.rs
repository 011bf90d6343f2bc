use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use qanun_util::abort::AbortController;
use qanun_util::format::format_clock;

use crate::event::{CustomEvent, Event};
use crate::input::InputField;

const CHILD_POLL: Duration = Duration::from_millis(50);
const TICK: Duration = Duration::from_secs(1);

/// Result of one single-utterance recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationOutcome {
    Transcript(String),
    Failed(String),
    /// Recognition ended without a result (silence or cancellation).
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationEvent {
    Tick { generation: u64, elapsed_secs: u64 },
    Finished { generation: u64, outcome: DictationOutcome },
}

#[derive(Debug, thiserror::Error)]
pub enum DictationError {
    #[error("no speech recognizer is configured")]
    Unsupported,
    #[error("failed to start dictation thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A speech-recognition capability. Implementations block until the
/// utterance resolves and must return promptly once `abort` is set.
pub trait SpeechRecognizer: Send + Sync {
    fn recognize(&self, abort: &AbortController) -> DictationOutcome;
}

/// Runs an external program and reads the transcript from its stdout.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    argv: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(argv: Vec<String>) -> Option<Self> {
        if argv.first().map_or(true, |program| program.trim().is_empty()) {
            return None;
        }
        Some(Self { argv })
    }

    fn spawn(&self) -> std::io::Result<Child> {
        Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

fn drain<R: Read + Send + 'static>(reader: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut reader) = reader {
            let _ = reader.read_to_string(&mut out);
        }
        out
    })
}

impl SpeechRecognizer for CommandRecognizer {
    fn recognize(&self, abort: &AbortController) -> DictationOutcome {
        let mut child = match self.spawn() {
            Ok(child) => child,
            Err(error) => {
                return DictationOutcome::Failed(format!("{}: {}", self.argv[0], error));
            }
        };
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            if abort.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                return DictationOutcome::Ended;
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(CHILD_POLL),
                Err(error) => {
                    let _ = child.kill();
                    return DictationOutcome::Failed(error.to_string());
                }
            }
        };

        let transcript = stdout.join().unwrap_or_default();
        let errors = stderr.join().unwrap_or_default();

        if !status.success() {
            let detail = errors.trim();
            return DictationOutcome::Failed(if detail.is_empty() {
                status.to_string()
            } else {
                detail.to_string()
            });
        }

        let transcript = transcript.trim();
        if transcript.is_empty() {
            DictationOutcome::Ended
        } else {
            DictationOutcome::Transcript(transcript.to_string())
        }
    }
}

#[derive(Debug)]
enum RecordingState {
    Idle,
    Recording {
        generation: u64,
        abort: AbortController,
    },
}

/// Recording toggle plus elapsed-time display.
pub struct Dictation {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    state: RecordingState,
    generation: u64,
    elapsed_secs: u64,
}

impl Dictation {
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            state: RecordingState::Idle,
            generation: 0,
            elapsed_secs: 0,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording { .. })
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn clock(&self) -> String {
        format_clock(self.elapsed_secs)
    }

    /// Starts a recording, or stops the running one.
    pub fn toggle(&mut self, events: &Sender<Event>) -> Result<bool, DictationError> {
        if self.is_recording() {
            self.stop();
            return Ok(false);
        }
        self.start(events)?;
        Ok(true)
    }

    pub fn start(&mut self, events: &Sender<Event>) -> Result<(), DictationError> {
        let recognizer = self
            .recognizer
            .clone()
            .ok_or(DictationError::Unsupported)?;
        if self.is_recording() {
            return Ok(());
        }

        self.generation += 1;
        let generation = self.generation;
        let abort = AbortController::new();

        let recognizer_abort = abort.clone();
        let recognizer_events = events.clone();
        thread::Builder::new()
            .name("qanun-dictation".to_string())
            .spawn(move || {
                let outcome = recognizer.recognize(&recognizer_abort);
                let _ = recognizer_events.send(Event::Custom(CustomEvent::Dictation(
                    DictationEvent::Finished {
                        generation,
                        outcome,
                    },
                )));
            })?;

        let ticker_abort = abort.clone();
        let ticker_events = events.clone();
        let ticker = thread::Builder::new()
            .name("qanun-dictation-timer".to_string())
            .spawn(move || {
                let mut elapsed_secs = 0;
                while ticker_abort.sleep(TICK) {
                    elapsed_secs += 1;
                    let event = Event::Custom(CustomEvent::Dictation(DictationEvent::Tick {
                        generation,
                        elapsed_secs,
                    }));
                    if ticker_events.send(event).is_err() {
                        break;
                    }
                }
            });
        if let Err(error) = ticker {
            abort.abort();
            return Err(error.into());
        }

        self.elapsed_secs = 0;
        self.state = RecordingState::Recording { generation, abort };
        tracing::info!(generation, "dictation started");
        Ok(())
    }

    /// Tears the recording down: recognizer and timer are cancelled and the
    /// clock reads `00:00`. Safe to call when idle.
    pub fn stop(&mut self) {
        if let RecordingState::Recording { generation, abort } =
            std::mem::replace(&mut self.state, RecordingState::Idle)
        {
            abort.abort();
            tracing::info!(generation, "dictation stopped");
        }
        self.elapsed_secs = 0;
    }

    fn current_generation(&self) -> Option<u64> {
        match &self.state {
            RecordingState::Recording { generation, .. } => Some(*generation),
            RecordingState::Idle => None,
        }
    }

    /// Applies an event from the recognizer or timer thread. Events from a
    /// recording that was already torn down are ignored. A transcript
    /// replaces the draft; every finish tears the recording down.
    pub fn handle_event(
        &mut self,
        event: DictationEvent,
        input: &mut InputField,
    ) -> Option<DictationOutcome> {
        match event {
            DictationEvent::Tick {
                generation,
                elapsed_secs,
            } => {
                if self.current_generation() == Some(generation) {
                    self.elapsed_secs = elapsed_secs;
                }
                None
            }
            DictationEvent::Finished {
                generation,
                outcome,
            } => {
                if self.current_generation() != Some(generation) {
                    return None;
                }
                match &outcome {
                    DictationOutcome::Transcript(text) => input.set_text(text.clone()),
                    DictationOutcome::Failed(error) => {
                        tracing::warn!(%error, "speech recognition failed")
                    }
                    DictationOutcome::Ended => {}
                }
                self.stop();
                Some(outcome)
            }
        }
    }
}
