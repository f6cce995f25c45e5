//! Error types for the worker pool.
//!
//! Most pool outcomes are plain values: an unknown id on removal is `false`
//! and a job with no worker to run it is reported as a
//! [`PoolEvent::JobRejected`]. The variants here cover the remaining cases
//! where an operation genuinely cannot proceed.
//!
//! ## Error Cases
//! - `InvalidConfig`: the pool was configured with unusable values.
//! - `QueueClosed`: a job was offered to a queue that is already closed. The
//!   job is handed back to the caller.
//! - `AlreadyClosed`: the job queue was asked to close twice.
//! - `ShutDown`: a worker was requested from a pool that has shut down.
//! - `AlreadyShutDown`: `shutdown` was called a second time.
//!
//! [`PoolEvent::JobRejected`]: crate::PoolEvent::JobRejected

use crate::job::Job;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the worker pool.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The pool configuration was rejected.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The job queue no longer accepts jobs.
    #[error("Job queue is closed, job {:?} was not queued", .0.payload())]
    QueueClosed(Job),

    /// The job queue was closed more than once.
    #[error("Job queue is already closed")]
    AlreadyClosed,

    /// The pool has shut down and cannot take new workers.
    #[error("Worker pool is shut down")]
    ShutDown,

    /// `shutdown` may only be called once per pool.
    #[error("Worker pool was already shut down")]
    AlreadyShutDown,
}
