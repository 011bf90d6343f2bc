pub mod color {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static ANSI_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
            .expect("valid ANSI pattern")
    });

    /// Removes CSI, OSC and two-byte escape sequences.
    pub fn strip_ansi(s: &str) -> String {
        ANSI_RE.replace_all(s, "").to_string()
    }
}

pub mod format {
    /// Recorder clock: `MM:SS`, minutes keep counting past an hour.
    pub fn format_clock(secs: u64) -> String {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

pub mod abort {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    const POLL_SLICE: Duration = Duration::from_millis(25);

    #[derive(Clone, Debug)]
    pub struct AbortController {
        cancelled: Arc<AtomicBool>,
    }

    impl AbortController {
        pub fn new() -> Self {
            Self {
                cancelled: Arc::new(AtomicBool::new(false)),
            }
        }

        pub fn abort(&self) {
            self.cancelled.store(true, Ordering::SeqCst);
        }

        pub fn is_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }

        /// Sleeps for `duration` unless aborted first. Returns `false` when aborted.
        pub fn sleep(&self, duration: Duration) -> bool {
            let deadline = Instant::now() + duration;
            loop {
                if self.is_cancelled() {
                    return false;
                }
                let now = Instant::now();
                if now >= deadline {
                    return true;
                }
                std::thread::sleep(POLL_SLICE.min(deadline - now));
            }
        }
    }

    impl Default for AbortController {
        fn default() -> Self {
            Self::new()
        }
    }
}
