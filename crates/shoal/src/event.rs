//! Notifications emitted by the pool and its workers.
//!
//! Every observable step of a pool's life (a worker joining, picking up a
//! job, being told to stop, actually stopping, a job being turned away) is
//! published as a [`PoolEvent`]. Events are delivered on an unbounded
//! channel so emitting one never blocks a worker. A consumer that does not
//! care can drop the receiver; events are then discarded.
//!
//! The [`Display`](core::fmt::Display) form is a one-line, human-readable
//! rendering suitable for a console.

use crate::worker::WorkerId;
use core::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receiving end of a pool's notification stream.
pub type EventReceiver = mpsc::UnboundedReceiver<PoolEvent>;

/// Why a job was not admitted to the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// No worker was registered when the job was submitted.
    NoWorkers,
    /// The pool has shut down.
    ShutDown,
}

/// A single pool notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolEvent {
    /// A worker was registered and spawned.
    WorkerAdded { worker: WorkerId },
    /// A worker's termination signal fired. The worker stops on its own
    /// shortly after.
    WorkerSignaled { worker: WorkerId },
    /// A worker left its loop for good.
    WorkerStopped { worker: WorkerId },
    /// A worker took a job off the queue and is running it.
    JobProcessing { worker: WorkerId, payload: Arc<str> },
    /// A job was dropped at submission time.
    JobRejected {
        payload: Arc<str>,
        reason: RejectReason,
    },
    /// A queued job was still undelivered when the queue closed.
    JobDiscarded { payload: Arc<str> },
}

impl fmt::Display for PoolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkerAdded { worker } => write!(f, "worker {worker} added"),
            Self::WorkerSignaled { worker } => {
                write!(f, "worker {worker} received the stop signal")
            }
            Self::WorkerStopped { worker } => write!(f, "worker {worker} stopped"),
            Self::JobProcessing { worker, payload } => {
                write!(f, "worker {worker} is processing job {payload:?}")
            }
            Self::JobRejected {
                payload,
                reason: RejectReason::NoWorkers,
            } => write!(f, "no workers available for job {payload:?}"),
            Self::JobRejected {
                payload,
                reason: RejectReason::ShutDown,
            } => write!(f, "pool is shut down, job {payload:?} was dropped"),
            Self::JobDiscarded { payload } => {
                write!(f, "job {payload:?} was never processed and has been discarded")
            }
        }
    }
}

/// Sending end shared by the pool and every worker.
#[derive(Clone, Debug)]
pub(crate) struct EventSink {
    tx: mpsc::UnboundedSender<PoolEvent>,
}

impl EventSink {
    pub(crate) fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn emit(&self, event: PoolEvent) {
        #[cfg(feature = "tracing")]
        tracing::debug!("{event}");

        // Nobody listening is fine.
        let _ = self.tx.send(event);
    }
}
