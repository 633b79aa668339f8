//! Read-only Event Logs
//!
//! The view handed to the lattice builder and classifier once the completion
//! barrier has resolved. Nothing here synchronizes: the logs can no longer
//! change, so any number of classification runs may share them.

use super::event::{Event, ProcessId};

/// Immutable per-process event histories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenLogs<S> {
    logs: Vec<Vec<Event<S>>>,
}

impl<S> FrozenLogs<S> {
    /// Wrap already-ordered histories, one `Vec` per process id
    pub fn new(logs: Vec<Vec<Event<S>>>) -> Self {
        Self { logs }
    }

    /// Number of processes (including those that recorded nothing)
    #[inline]
    pub fn process_count(&self) -> usize {
        self.logs.len()
    }

    /// Number of events recorded by `process` (0 for unknown ids)
    #[inline]
    pub fn len(&self, process: ProcessId) -> usize {
        self.logs.get(process.as_usize()).map_or(0, Vec::len)
    }

    /// Whether `process` recorded no events
    #[inline]
    pub fn is_empty(&self, process: ProcessId) -> bool {
        self.len(process) == 0
    }

    /// Event `index` of `process`, if in bounds
    #[inline]
    pub fn event_at(&self, process: ProcessId, index: usize) -> Option<&Event<S>> {
        self.logs.get(process.as_usize())?.get(index)
    }

    /// Whole history of `process`
    pub fn log(&self, process: ProcessId) -> &[Event<S>] {
        self.logs
            .get(process.as_usize())
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of events across all processes
    pub fn total_events(&self) -> usize {
        self.logs.iter().map(Vec::len).sum()
    }
}
