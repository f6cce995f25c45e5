use crate::{signal::TerminationSignal, worker::WorkerId};
use std::collections::HashMap;

/// Book-keeping for the workers a pool currently owns.
///
/// Always accessed under the pool's lock. Ids come from a monotonic counter
/// and are never handed out twice.
#[derive(Debug)]
pub(crate) struct Registry {
    next_id: WorkerId,
    workers: HashMap<WorkerId, TerminationSignal>,
    closed: bool,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: WorkerId::FIRST,
            workers: HashMap::new(),
            closed: false,
        }
    }

    /// Issues a fresh id and files `signal` under it.
    pub(crate) fn register(&mut self, signal: TerminationSignal) -> WorkerId {
        let id = self.next_id;
        self.next_id = id.next();
        self.workers.insert(id, signal);
        id
    }

    pub(crate) fn deregister(&mut self, id: WorkerId) -> Option<TerminationSignal> {
        self.workers.remove(&id)
    }

    /// Marks the registry closed and hands back every remaining signal.
    pub(crate) fn close(&mut self) -> Vec<(WorkerId, TerminationSignal)> {
        self.closed = true;
        let mut drained: Vec<_> = self.workers.drain().collect();
        drained.sort_unstable_by_key(|(id, _)| *id);
        drained
    }

    pub(crate) const fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub(crate) fn ids(&self) -> Vec<WorkerId> {
        let mut ids: Vec<_> = self.workers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::termination_signal;

    #[test]
    fn ids_are_never_reused() {
        let mut registry = Registry::new();
        let (a, _la) = termination_signal();
        let (b, _lb) = termination_signal();
        let (c, _lc) = termination_signal();

        let first = registry.register(a);
        let second = registry.register(b);
        assert!(registry.deregister(second).is_some());
        let third = registry.register(c);

        assert_eq!(first, WorkerId::from(1));
        assert_eq!(second, WorkerId::from(2));
        assert_eq!(third, WorkerId::from(3));
        assert_eq!(registry.ids(), vec![first, third]);
    }

    #[test]
    fn close_drains_in_id_order() {
        let mut registry = Registry::new();
        let mut listeners = Vec::new();
        for _ in 0..3 {
            let (signal, listener) = termination_signal();
            registry.register(signal);
            listeners.push(listener);
        }

        let drained: Vec<_> = registry.close().into_iter().map(|(id, _)| id.get()).collect();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(registry.is_closed());
        assert_eq!(registry.len(), 0);
    }
}
