//! Background worker shared by the I/O-bound plugins
//!
//! Each plugin that performs blocking I/O owns one worker thread. Jobs are
//! processed one at a time in submission order, so a single plugin never
//! reorders its own writes; separate plugins still run independently.

use crate::core::{LoggerError, Result, DEFAULT_SHUTDOWN_TIMEOUT};
use crossbeam_channel::{unbounded, Sender};
use std::thread;
use std::time::{Duration, Instant};

pub(crate) struct Worker<J: Send + 'static> {
    name: String,
    sender: Option<Sender<J>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<J: Send + 'static> Worker<J> {
    /// Spawn a worker thread running `handler` for every submitted job
    pub(crate) fn spawn<F>(name: impl Into<String>, mut handler: F) -> Result<Self>
    where
        F: FnMut(J) + Send + 'static,
    {
        let name = name.into();
        let (sender, receiver) = unbounded::<J>();

        let handle = thread::Builder::new()
            .name(format!("plugin-logger-{}", name))
            .spawn(move || {
                // Runs until every sender is dropped and the queue is drained
                for job in receiver.iter() {
                    handler(job);
                }
            })
            .map_err(|e| {
                LoggerError::io_operation("spawning plugin worker", name.clone(), e)
            })?;

        Ok(Self {
            name,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue a job; hands it back if the worker is gone
    pub(crate) fn submit(&self, job: J) -> std::result::Result<(), J> {
        match self.sender {
            Some(ref sender) => sender.send(job).map_err(|e| e.into_inner()),
            None => Err(job),
        }
    }

    /// Stop accepting jobs and wait for the queue to drain
    ///
    /// Returns `true` if the worker finished within `timeout`.
    pub(crate) fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!(
                        "[LOGGER ERROR] Worker for '{}' panicked during shutdown: {:?}",
                        self.name, e
                    );
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Worker for '{}' did not finish within {:?}. \
                     Some logs may be lost.",
                    self.name, timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl<J: Send + 'static> Drop for Worker<J> {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
