#![doc = include_str!("../README.md")]

mod error;
mod event;
mod handler;
mod job;
mod pool;
mod queue;
mod signal;
mod worker;

pub use error::{Error, Result};
pub use event::{EventReceiver, PoolEvent, RejectReason};
pub use handler::{JobHandler, NoopHandler};
pub use job::Job;
pub use pool::{Admission, DEFAULT_QUEUE_CAPACITY, PoolConfig, WorkerPool};
pub use queue::JobQueue;
pub use signal::{TerminationListener, TerminationSignal, termination_signal};
pub use worker::WorkerId;
