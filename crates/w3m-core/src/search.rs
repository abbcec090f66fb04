//! Search-box debouncing
//!
//! Terms typed into the search field are debounced, filtered by minimum
//! length, and deduplicated against the last emitted term before a search
//! request is issued.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Quiet period before a term is emitted
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Shortest term that triggers a search, in characters
pub const MIN_SEARCH_LEN: usize = 2;

/// Debouncer for search terms
#[derive(Debug, Clone, Copy)]
pub struct SearchDebouncer {
    delay: Duration,
    min_len: usize,
}

impl SearchDebouncer {
    /// Create a debouncer
    pub fn new(delay: Duration, min_len: usize) -> Self {
        Self { delay, min_len }
    }

    /// True if a term is long enough to search for
    pub fn accepts(&self, term: &str) -> bool {
        term.chars().count() >= self.min_len
    }

    fn should_emit(&self, term: &str, last_emitted: Option<&str>) -> bool {
        self.accepts(term) && last_emitted != Some(term)
    }

    /// Spawn the debouncing task.
    ///
    /// When `input` closes, a pending term that passes the filters is
    /// emitted immediately and the output then closes.
    pub fn spawn(self, input: mpsc::Receiver<String>) -> mpsc::Receiver<String> {
        let (output, debounced) = mpsc::channel(16);
        tokio::spawn(self.run(input, output));
        debounced
    }

    async fn run(self, mut input: mpsc::Receiver<String>, output: mpsc::Sender<String>) {
        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();
        let mut last_emitted: Option<String> = None;

        loop {
            tokio::select! {
                term = input.recv() => match term {
                    Some(term) => {
                        pending = Some(term);
                        deadline = Instant::now() + self.delay;
                    }
                    None => {
                        // Input closed mid-debounce: flush the held term
                        if let Some(term) = pending.take() {
                            if self.should_emit(&term, last_emitted.as_deref()) {
                                debug!(term = %term, "Debounced search term");
                                let _ = output.send(term).await;
                            }
                        }
                        break;
                    }
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    let Some(term) = pending.take() else { continue };
                    if !self.should_emit(&term, last_emitted.as_deref()) {
                        continue;
                    }
                    debug!(term = %term, "Debounced search term");
                    if output.send(term.clone()).await.is_err() {
                        break;
                    }
                    last_emitted = Some(term);
                }
            }
        }
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE, MIN_SEARCH_LEN)
    }
}
