//! Debounced search.
//!
//! Two pieces keep product listings consistent while the shopper types:
//!
//! - [`Debouncer`] coalesces rapid edits: a value is emitted only after no new
//!   value arrived for the whole window, and only the last value is emitted.
//! - [`SearchGate`] stamps each refresh with a generation. A result is applied
//!   only if its ticket is still the newest, so a slow, superseded response can
//!   never overwrite the listing produced by a newer one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// Default quiescence window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Emits the latest pushed value once input has been quiet for `window`.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the debouncing task. Settled values arrive on the returned receiver.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(window, input_rx, output));
        (Self { input, task }, output_rx)
    }

    /// Record an edit. Returns `false` once the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            received = input.recv() => {
                let Some(value) = received else { break };
                pending = Some(value);
                deadline = Some(Instant::now() + window);
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                if let Some(value) = pending.take()
                    && output.send(value).is_err()
                {
                    break;
                }
            }
        }
    }
}

/// Ticket issued for one listing refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Generation counter guarding against out-of-order search results.
#[derive(Debug, Clone, Default)]
pub struct SearchGate {
    latest: u64,
    applied: u64,
}

impl SearchGate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: 0,
            applied: 0,
        }
    }

    /// Start a refresh, superseding every earlier ticket.
    pub const fn begin(&mut self) -> SearchTicket {
        self.latest += 1;
        SearchTicket(self.latest)
    }

    /// Whether `ticket` is still the newest one issued.
    #[must_use]
    pub const fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Accept a finished refresh if it is current. Returns whether to apply it.
    pub fn accept(&mut self, ticket: SearchTicket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.0,
                latest = self.latest,
                "Discarding superseded search result"
            );
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// Whether a refresh is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.applied != self.latest
    }
}
