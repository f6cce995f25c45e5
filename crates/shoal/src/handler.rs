//! Job execution seam.
//!
//! Workers hand every job they dequeue to a [`JobHandler`]. The pool never
//! looks at what a handler does and never collects a result: once `handle`
//! returns, the job is done. A worker always lets its handler finish the job
//! in hand, even if its termination signal fires in the meantime.

use crate::{job::Job, worker::WorkerId};

/// Executes jobs on behalf of a worker.
pub trait JobHandler: Send + Sync + 'static {
    /// Runs `job` on worker `worker`.
    fn handle(&self, worker: WorkerId, job: &Job) -> impl Future<Output = ()> + Send;
}

/// A handler that treats every job as unit work.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl JobHandler for NoopHandler {
    async fn handle(&self, _worker: WorkerId, _job: &Job) {}
}
