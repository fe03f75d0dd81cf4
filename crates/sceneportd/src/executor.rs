//! Single-threaded mutation authority.
//!
//! The [`Executor`] moves the document onto a dedicated worker thread and
//! accepts jobs over a FIFO channel. Connection threads submit work through
//! an [`ExecutorHandle`] and block until their job has run, so only one job
//! touches the document at any instant regardless of how many clients are
//! connected.
//!
//! There is no per-job timeout: a job that never returns stalls every caller
//! queued behind it.

use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, warn};

const EXECUTOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::executor");
const WORKER_THREAD_NAME: &str = "sceneport-executor";

type Job<D> = Box<dyn FnOnce(&mut D) + Send>;

enum Message<D> {
    Run(Job<D>),
    Stop,
}

/// Errors returned when a job cannot complete on the executor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The worker thread has stopped and no longer accepts jobs.
    #[error("execution context is unavailable")]
    Unavailable,
    /// The job panicked. The worker survives and keeps serving other jobs.
    #[error("operation panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
    /// The worker thread could not be spawned.
    #[error("failed to spawn executor thread: {message}")]
    Spawn {
        /// Operating system failure.
        message: String,
    },
}

impl ExecutorError {
    fn spawn(source: &io::Error) -> Self {
        Self::Spawn {
            message: source.to_string(),
        }
    }

    fn panicked(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_owned());
        Self::Panicked { message }
    }
}

/// Owner of the worker thread that holds the document `D`.
///
/// Dropping the executor stops the worker after it finishes the jobs already
/// queued.
pub struct Executor<D> {
    sender: Sender<Message<D>>,
    worker: Option<JoinHandle<()>>,
}

impl<D> fmt::Debug for Executor<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Executor")
            .field("running", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: Send + 'static> Executor<D> {
    /// Moves `document` onto a new worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Spawn`] when the thread cannot be created.
    pub fn spawn(document: D) -> Result<Self, ExecutorError> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || run_worker(document, &receiver))
            .map_err(|error| ExecutorError::spawn(&error))?;
        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }
}

impl<D> Executor<D> {
    /// Returns a handle for submitting jobs.
    #[must_use]
    pub fn handle(&self) -> ExecutorHandle<D> {
        ExecutorHandle {
            sender: self.sender.clone(),
        }
    }

    /// Stops the worker after the jobs already queued and waits for it.
    /// Later submissions fail with [`ExecutorError::Unavailable`].
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if self.sender.send(Message::Stop).is_err() {
            debug!(target: EXECUTOR_TARGET, "executor worker already gone");
        }
        if worker.join().is_err() {
            warn!(target: EXECUTOR_TARGET, "executor worker panicked");
        }
    }
}

impl<D> Drop for Executor<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cloneable submitter of jobs to an [`Executor`].
pub struct ExecutorHandle<D> {
    sender: Sender<Message<D>>,
}

impl<D> Clone for ExecutorHandle<D> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<D> fmt::Debug for ExecutorHandle<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("ExecutorHandle").finish_non_exhaustive()
    }
}

impl<D: 'static> ExecutorHandle<D> {
    /// Runs `job` against the document and blocks until it has finished.
    ///
    /// Jobs run one at a time in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Panicked`] when `job` panics, or
    /// [`ExecutorError::Unavailable`] once the worker has stopped.
    pub fn run_exclusive<R, F>(&self, job: F) -> Result<R, ExecutorError>
    where
        F: FnOnce(&mut D) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, outcome) = mpsc::sync_channel(1);
        let job: Job<D> = Box::new(move |document: &mut D| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| job(document)))
                .map_err(|payload| ExecutorError::panicked(payload.as_ref()));
            if reply.send(result).is_err() {
                debug!(target: EXECUTOR_TARGET, "caller stopped waiting for its result");
            }
        });
        self.sender
            .send(Message::Run(job))
            .map_err(|_| ExecutorError::Unavailable)?;
        outcome.recv().map_err(|_| ExecutorError::Unavailable)?
    }
}

fn run_worker<D>(mut document: D, receiver: &Receiver<Message<D>>) {
    debug!(target: EXECUTOR_TARGET, "executor worker started");
    while let Ok(message) = receiver.recv() {
        match message {
            Message::Run(job) => job(&mut document),
            Message::Stop => break,
        }
    }
    debug!(target: EXECUTOR_TARGET, "executor worker stopped");
}
