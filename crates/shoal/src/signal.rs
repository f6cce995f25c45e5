//! One-shot termination signal for a single worker.
//!
//! A signal is split into two halves. The [`TerminationSignal`] stays in the
//! pool's registry and is consumed when fired, so it can be triggered at
//! most once. The [`TerminationListener`] moves into the worker task and
//! resolves once the signal has fired, or once the owning half is dropped
//! without firing.

use tokio_util::sync::{CancellationToken, DropGuard};

/// Owning half of a worker's termination signal.
#[derive(Debug)]
pub struct TerminationSignal {
    guard: DropGuard,
}

/// Receiving half of a worker's termination signal.
#[derive(Debug)]
pub struct TerminationListener {
    token: CancellationToken,
}

/// Creates a connected signal/listener pair.
pub fn termination_signal() -> (TerminationSignal, TerminationListener) {
    let token = CancellationToken::new();
    let listener = TerminationListener {
        token: token.clone(),
    };
    (
        TerminationSignal {
            guard: token.drop_guard(),
        },
        listener,
    )
}

impl TerminationSignal {
    /// Fires the signal, waking the listening worker.
    pub fn fire(self) {
        // Dropping the guard cancels the token.
        drop(self.guard);
    }
}

impl TerminationListener {
    /// Resolves once the signal has fired.
    pub async fn fired(&self) {
        self.token.cancelled().await;
    }

    /// Whether the signal has fired, without waiting.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn listener_waits_until_fired() {
        let (signal, listener) = termination_signal();
        assert!(!listener.is_fired());
        assert!(
            timeout(Duration::from_millis(20), listener.fired())
                .await
                .is_err()
        );

        signal.fire();
        assert!(listener.is_fired());
        timeout(Duration::from_millis(20), listener.fired())
            .await
            .expect("fired signal should resolve immediately");
    }

    #[tokio::test]
    async fn dropping_the_signal_fires_it() {
        let (signal, listener) = termination_signal();
        drop(signal);
        assert!(listener.is_fired());
    }
}
