//! Worker identity and execution loop.
//!
//! A worker is an independent Tokio task that owns nothing but its
//! [`TerminationListener`] and shared handles to the pool's queue, handler
//! and event sink. It keeps taking jobs until its termination signal fires
//! or the queue closes, whichever comes first.

use crate::{
    event::{EventSink, PoolEvent},
    handler::JobHandler,
    queue::JobQueue,
    signal::TerminationListener,
};
use core::{fmt, str::FromStr};
use std::sync::Arc;

/// Identifier of a worker within a pool.
///
/// Ids are issued by the pool starting at `1`, strictly increase, and are
/// never reused, even after the worker they named has been removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    pub(crate) const FIRST: Self = Self(1);

    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for WorkerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for WorkerId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Main execution loop for a worker task.
///
/// Each iteration races the next job from the queue against the termination
/// signal. The signal is polled first, so once it has fired the worker never
/// takes another job; a job already dequeued is always run to completion
/// before the signal is looked at again.
///
/// # Arguments
///
/// - `worker_id`: Id issued by the pool (used in events and logs).
/// - `queue`: Shared [`JobQueue`] the worker takes jobs from.
/// - `listener`: This worker's half of its termination signal.
/// - `handler`: [`JobHandler`] that runs each job.
/// - `events`: Sink for [`PoolEvent::JobProcessing`] and
///   [`PoolEvent::WorkerStopped`].
///
/// # Exit Conditions
///
/// - `listener` fires (removal or pool shutdown).
/// - The queue is closed, which only happens after every registered worker
///   has been signalled.
pub(crate) async fn worker_loop<H>(
    worker_id: WorkerId,
    queue: Arc<JobQueue>,
    listener: TerminationListener,
    handler: Arc<H>,
    events: EventSink,
) where
    H: JobHandler,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    loop {
        let job = tokio::select! {
            biased;
            () = listener.fired() => break,
            job = queue.dequeue() => match job {
                Some(job) => job,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Worker {worker_id} saw the job queue close");
                    break;
                }
            },
        };

        events.emit(PoolEvent::JobProcessing {
            worker: worker_id,
            payload: job.shared_payload(),
        });
        handler.handle(worker_id, &job).await;
    }

    events.emit(PoolEvent::WorkerStopped { worker: worker_id });

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handler::NoopHandler, job::Job, signal::termination_signal};

    #[test]
    fn ids_parse_and_display_as_integers() {
        let id: WorkerId = "42".parse().unwrap();
        assert_eq!(id, WorkerId::from(42));
        assert_eq!(id.to_string(), "42");
        assert!("forty-two".parse::<WorkerId>().is_err());
        assert!("-1".parse::<WorkerId>().is_err());
    }

    #[tokio::test]
    async fn worker_processes_jobs_until_signalled() {
        let queue = Arc::new(JobQueue::new(4).unwrap());
        let (sink, mut events) = EventSink::channel();
        let (signal, listener) = termination_signal();
        let id = WorkerId::from(7);

        queue.enqueue(Job::from("a")).await.unwrap();
        let task = tokio::spawn(worker_loop(
            id,
            Arc::clone(&queue),
            listener,
            Arc::new(NoopHandler),
            sink,
        ));

        assert_eq!(
            events.recv().await,
            Some(PoolEvent::JobProcessing {
                worker: id,
                payload: "a".into()
            })
        );

        signal.fire();
        task.await.unwrap();
        assert_eq!(events.recv().await, Some(PoolEvent::WorkerStopped { worker: id }));
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn fired_signal_wins_over_a_ready_job() {
        let queue = Arc::new(JobQueue::new(4).unwrap());
        let (sink, mut events) = EventSink::channel();
        let (signal, listener) = termination_signal();

        queue.enqueue(Job::from("never")).await.unwrap();
        signal.fire();
        worker_loop(
            WorkerId::from(1),
            Arc::clone(&queue),
            listener,
            Arc::new(NoopHandler),
            sink,
        )
        .await;

        assert_eq!(
            events.recv().await,
            Some(PoolEvent::WorkerStopped {
                worker: WorkerId::from(1)
            })
        );
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn worker_exits_when_the_queue_closes() {
        let queue = Arc::new(JobQueue::new(1).unwrap());
        let (sink, mut events) = EventSink::channel();
        let (_signal, listener) = termination_signal();

        queue.close().await.unwrap();
        worker_loop(
            WorkerId::from(2),
            queue,
            listener,
            Arc::new(NoopHandler),
            sink,
        )
        .await;

        assert_eq!(
            events.recv().await,
            Some(PoolEvent::WorkerStopped {
                worker: WorkerId::from(2)
            })
        );
    }
}
