//! Bounded FIFO job queue shared by every worker in a pool.
//!
//! The queue is a bounded [`mpsc`] channel. Producers clone the sender for the
//! duration of a single send, so a full queue applies backpressure to
//! `enqueue` callers without holding any lock. Consumers share the receiver
//! behind a fair async mutex: whichever worker asks first gets the next job,
//! and jobs leave the queue in the order they entered.
//!
//! Closing is explicit and happens once. `close` drops the pool's sender,
//! closes the receiving half and drains whatever was still buffered so the
//! caller can report it. From then on `dequeue` yields `None` right away.

use crate::{
    error::{Error, Result},
    job::Job,
};
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, mpsc};

/// A bounded, multi-consumer FIFO queue of [`Job`]s.
pub struct JobQueue {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    receiver: AsyncMutex<mpsc::Receiver<Job>>,
    capacity: usize,
}

impl JobQueue {
    /// Creates an open queue holding at most `capacity` jobs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue capacity must be greater than 0".into(),
            });
        }

        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            sender: Mutex::new(Some(tx)),
            receiver: AsyncMutex::new(rx),
            capacity,
        })
    }

    /// Appends `job` to the back of the queue, waiting for space if the queue
    /// is full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueClosed`] carrying the job back if the queue was
    /// closed before the job could be stored.
    pub async fn enqueue(&self, job: Job) -> Result<()> {
        // Clone out of the lock: the send below may wait for a free slot.
        let Some(tx) = self.sender.lock().clone() else {
            return Err(Error::QueueClosed(job));
        };

        tx.send(job)
            .await
            .map_err(|mpsc::error::SendError(job)| Error::QueueClosed(job))
    }

    /// Takes the job at the front of the queue.
    ///
    /// Waits until a job is available. Returns `None` once the queue has
    /// been closed.
    pub async fn dequeue(&self) -> Option<Job> {
        self.receiver.lock().await.recv().await
    }

    /// Closes the queue and returns the jobs that were never dequeued, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the queue was closed before.
    pub async fn close(&self) -> Result<Vec<Job>> {
        if self.sender.lock().take().is_none() {
            return Err(Error::AlreadyClosed);
        }

        let mut rx = self.receiver.lock().await;
        rx.close();

        // `recv` only yields `None` once every send that already holds a
        // slot has landed, so a racing producer cannot slip a job past us.
        let mut undelivered = Vec::with_capacity(rx.len());
        while let Some(job) = rx.recv().await {
            undelivered.push(job);
        }
        Ok(undelivered)
    }

    /// Maximum number of jobs the queue can hold.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of jobs currently buffered.
    pub fn len(&self) -> usize {
        match self.sender.lock().as_ref() {
            Some(tx) => self.capacity - tx.capacity(),
            None => 0,
        }
    }

    /// Whether no job is buffered. Always `true` once the queue is closed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }
}
