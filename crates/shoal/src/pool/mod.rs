//! The pool manager.
//!
//! [`WorkerPool`] is the sole owner of pool state: the job queue, the
//! registry of live workers (id to termination signal), the id counter and
//! the task tracker used to learn when every worker has exited. Callers only
//! ever see four operations: [`add_worker`], [`remove_worker`], [`add_job`]
//! and [`shutdown`].
//!
//! ## Locking
//!
//! Registry reads and writes, id allocation and the shutdown flag all sit
//! behind one [`parking_lot::Mutex`]. The lock is released before anything
//! that can wait: enqueueing into a full queue and waiting for workers to
//! exit both happen outside of it.
//!
//! ## Admission
//!
//! `add_job` checks the registry size and then enqueues, and those two steps
//! are not atomic. A job can therefore be queued just as the last worker is
//! removed. Such a job stays queued: the next worker added picks it up, and
//! if `shutdown` comes first it is reported as
//! [`PoolEvent::JobDiscarded`]. It is never lost silently.
//!
//! [`add_worker`]: WorkerPool::add_worker
//! [`remove_worker`]: WorkerPool::remove_worker
//! [`add_job`]: WorkerPool::add_job
//! [`shutdown`]: WorkerPool::shutdown

mod registry;

use crate::{
    error::{Error, Result},
    event::{EventReceiver, EventSink, PoolEvent, RejectReason},
    handler::{JobHandler, NoopHandler},
    job::Job,
    queue::JobQueue,
    signal::termination_signal,
    worker::{WorkerId, worker_loop},
};
use parking_lot::Mutex;
use registry::Registry;
use std::sync::Arc;
use tokio_util::task::TaskTracker;

/// Default capacity of a pool's job queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Construction-time settings for a [`WorkerPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    queue_capacity: usize,
}

impl PoolConfig {
    /// Builds a configuration with a job queue of `queue_capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `queue_capacity` is zero.
    pub fn new(queue_capacity: usize) -> Result<Self> {
        if queue_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue capacity must be greater than 0".into(),
            });
        }
        Ok(Self { queue_capacity })
    }

    /// Number of queue slots a pool built from this configuration gets.
    pub const fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Outcome of [`WorkerPool::add_job`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The job was placed on the queue.
    Queued,
    /// The job was dropped. A matching [`PoolEvent::JobRejected`] was
    /// emitted.
    Rejected(RejectReason),
}

/// A dynamically resizable pool of workers draining one bounded FIFO queue.
///
/// Workers are spawned on the ambient Tokio runtime, so a pool must be
/// created and driven from within one.
///
/// Dropping a pool without calling [`shutdown`](Self::shutdown) fires every
/// remaining termination signal, but does not wait for the workers to exit.
pub struct WorkerPool<H = NoopHandler> {
    registry: Mutex<Registry>,
    queue: Arc<JobQueue>,
    tracker: TaskTracker,
    handler: Arc<H>,
    events: EventSink,
}

impl WorkerPool {
    /// Creates an empty pool whose workers treat every job as unit work.
    ///
    /// See [`with_handler`](Self::with_handler).
    pub fn new(config: PoolConfig) -> Result<(Self, EventReceiver)> {
        Self::with_handler(config, NoopHandler)
    }
}

impl<H> WorkerPool<H>
where
    H: JobHandler,
{
    /// Creates an empty pool whose workers run jobs through `handler`.
    ///
    /// Returns the pool together with the receiving end of its notification
    /// stream. The receiver may be dropped if notifications are not needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the queue cannot be built from
    /// `config`.
    pub fn with_handler(config: PoolConfig, handler: H) -> Result<(Self, EventReceiver)> {
        let queue = JobQueue::new(config.queue_capacity())?;
        let (events, rx) = EventSink::channel();

        let pool = Self {
            registry: Mutex::new(Registry::new()),
            queue: Arc::new(queue),
            tracker: TaskTracker::new(),
            handler: Arc::new(handler),
            events,
        };
        Ok((pool, rx))
    }

    /// Registers and spawns a new worker, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShutDown`] once [`shutdown`](Self::shutdown) has
    /// been called. Nothing is spawned in that case.
    pub fn add_worker(&self) -> Result<WorkerId> {
        let (signal, listener) = termination_signal();

        let id = {
            let mut registry = self.registry.lock();
            if registry.is_closed() {
                return Err(Error::ShutDown);
            }
            let id = registry.register(signal);
            // Spawned under the lock so a concurrent shutdown always sees the
            // task on the tracker once it sees the registry entry.
            self.tracker.spawn(worker_loop(
                id,
                Arc::clone(&self.queue),
                listener,
                Arc::clone(&self.handler),
                self.events.clone(),
            ));
            id
        };

        self.events.emit(PoolEvent::WorkerAdded { worker: id });
        Ok(id)
    }

    /// Asks worker `id` to stop.
    ///
    /// Returns `false`, without any side effect, if `id` is not a live
    /// worker of this pool. Otherwise removes it from the registry, fires
    /// its termination signal and returns `true`. The worker finishes any
    /// job it is running and emits [`PoolEvent::WorkerStopped`] on its own;
    /// this call does not wait for that.
    pub fn remove_worker(&self, id: WorkerId) -> bool {
        let Some(signal) = self.registry.lock().deregister(id) else {
            return false;
        };

        signal.fire();
        self.events.emit(PoolEvent::WorkerSignaled { worker: id });
        true
    }

    /// Submits a job.
    ///
    /// If no worker is registered the job is dropped and a
    /// [`PoolEvent::JobRejected`] is emitted. Otherwise the job is queued,
    /// waiting for a free slot if the queue is full. The call returns once
    /// the job is queued, not once it has been processed.
    pub async fn add_job(&self, job: impl Into<Job>) -> Admission {
        let job = job.into();

        let admission = {
            let registry = self.registry.lock();
            if registry.is_closed() {
                Admission::Rejected(RejectReason::ShutDown)
            } else if registry.is_empty() {
                Admission::Rejected(RejectReason::NoWorkers)
            } else {
                Admission::Queued
            }
        };

        if let Admission::Rejected(reason) = admission {
            self.reject(job, reason);
            return admission;
        }

        match self.queue.enqueue(job).await {
            Ok(()) => Admission::Queued,
            // Shutdown closed the queue while we were waiting for a slot.
            Err(err) => {
                if let Error::QueueClosed(job) = err {
                    self.reject(job, RejectReason::ShutDown);
                }
                Admission::Rejected(RejectReason::ShutDown)
            }
        }
    }

    /// Stops every worker and closes the job queue.
    ///
    /// Fires the termination signal of every registered worker and clears
    /// the registry, then waits until every worker ever spawned by this pool
    /// has exited. Only then is the queue closed. Jobs still sitting in the
    /// queue at that point are reported as [`PoolEvent::JobDiscarded`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyShutDown`] if called more than once. The
    /// queue is left untouched in that case.
    pub async fn shutdown(&self) -> Result<()> {
        let signals = {
            let mut registry = self.registry.lock();
            if registry.is_closed() {
                return Err(Error::AlreadyShutDown);
            }
            registry.close()
        };

        #[cfg(feature = "tracing")]
        tracing::info!("Shutting down worker pool ({} workers)", signals.len());

        for (id, signal) in signals {
            signal.fire();
            self.events.emit(PoolEvent::WorkerSignaled { worker: id });
        }

        self.tracker.close();
        self.tracker.wait().await;

        #[cfg(feature = "tracing")]
        tracing::debug!("All workers exited, closing job queue");

        for job in self.queue.close().await? {
            self.events.emit(PoolEvent::JobDiscarded {
                payload: job.shared_payload(),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Worker pool shutdown complete");
        Ok(())
    }

    /// Number of registered workers.
    pub fn worker_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Ids of the registered workers, ascending.
    pub fn worker_ids(&self) -> Vec<WorkerId> {
        self.registry.lock().ids()
    }

    /// Number of jobs waiting in the queue.
    pub fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of jobs the queue holds before `add_job` waits.
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.registry.lock().is_closed()
    }

    fn reject(&self, job: Job, reason: RejectReason) {
        self.events.emit(PoolEvent::JobRejected {
            payload: job.shared_payload(),
            reason,
        });
    }
}
