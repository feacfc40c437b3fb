//! Completion handles for fire-and-forget plugin calls
//!
//! A plugin that does its I/O in the background returns a pending
//! [`Completion`] and resolves it from its worker through a [`Completer`].
//! The logger collects the handles of one call into a [`Dispatch`] and
//! never waits on them; callers that need a write to have landed wait on
//! the handles themselves.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// How a single plugin invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The sink accepted the record
    Delivered,
    /// The sink failed; the failure went to the plugin's error handler
    Failed,
    /// The sink dropped the job without reporting back
    Abandoned,
}

impl Outcome {
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered)
    }
}

#[derive(Debug)]
enum State {
    Ready(Outcome),
    Pending(Receiver<Outcome>),
}

/// Completion signal for one plugin invocation
#[derive(Debug)]
pub struct Completion {
    state: State,
}

impl Completion {
    /// An invocation that finished synchronously and succeeded
    pub fn delivered() -> Self {
        Self::ready(Outcome::Delivered)
    }

    /// An invocation that finished synchronously and failed
    pub fn failed() -> Self {
        Self::ready(Outcome::Failed)
    }

    pub fn ready(outcome: Outcome) -> Self {
        Self {
            state: State::Ready(outcome),
        }
    }

    /// Create a pending completion and the handle that resolves it
    pub fn channel() -> (Completer, Completion) {
        let (sender, receiver) = bounded(1);
        (
            Completer { sender },
            Completion {
                state: State::Pending(receiver),
            },
        )
    }

    /// Whether waiting would return immediately
    ///
    /// An outcome observed here is cached, so a later wait returns it
    /// without touching the channel. A dropped [`Completer`] counts as ready
    /// with [`Outcome::Abandoned`].
    pub fn is_ready(&mut self) -> bool {
        let outcome = match &self.state {
            State::Ready(_) => return true,
            State::Pending(receiver) => match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => Outcome::Abandoned,
            },
        };
        self.state = State::Ready(outcome);
        true
    }

    /// Block until the plugin reports back
    pub fn wait(self) -> Outcome {
        match self.state {
            State::Ready(outcome) => outcome,
            State::Pending(receiver) => receiver.recv().unwrap_or(Outcome::Abandoned),
        }
    }

    /// Wait at most `timeout`; `None` means the plugin is still working
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Outcome> {
        let outcome = match &self.state {
            State::Ready(outcome) => return Some(*outcome),
            State::Pending(receiver) => match receiver.recv_timeout(timeout) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => Outcome::Abandoned,
            },
        };
        self.state = State::Ready(outcome);
        Some(outcome)
    }

    /// Await the plugin without blocking the async executor
    #[cfg(feature = "async-completion")]
    pub async fn wait_async(self) -> Outcome {
        tokio::task::spawn_blocking(move || self.wait())
            .await
            .unwrap_or(Outcome::Abandoned)
    }
}

/// Resolves a pending [`Completion`]
#[derive(Debug)]
pub struct Completer {
    sender: Sender<Outcome>,
}

impl Completer {
    pub fn complete(self, outcome: Outcome) {
        // The waiting side may already be gone; that is fine.
        let _ = self.sender.send(outcome);
    }
}

/// Completion handles of one log call, in plugin registration order
#[derive(Debug, Default)]
pub struct Dispatch {
    completions: Vec<Completion>,
}

impl Dispatch {
    /// The dispatch of a call that was filtered out
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            completions: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, completion: Completion) {
        self.completions.push(completion);
    }

    /// Number of plugins invoked by the call
    pub fn len(&self) -> usize {
        self.completions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Completion> {
        self.completions.iter()
    }

    /// Block until every plugin has reported back
    pub fn wait_all(self) -> Vec<Outcome> {
        self.completions.into_iter().map(Completion::wait).collect()
    }
}

impl IntoIterator for Dispatch {
    type Item = Completion;
    type IntoIter = std::vec::IntoIter<Completion>;

    fn into_iter(self) -> Self::IntoIter {
        self.completions.into_iter()
    }
}
