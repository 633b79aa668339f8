//! Concurrent Event Log Store
//!
//! # Thread Safety
//! - `DashMap` shards the per-process logs, so producers appending to
//!   different logs rarely contend
//! - Validation of an append happens under the entry lock of its log, so
//!   the "own component strictly increases" check cannot race
//! - `freeze` raises the frozen flag before draining; an append either
//!   lands before the drain or is rejected with `LogFrozen`

use crate::domain::log::{Event, FrozenLogs, ProcessId};
use crate::error::{DetectionError, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Append-only per-process logs shared by all producers
#[derive(Debug)]
pub struct LogStore<S> {
    process_count: usize,
    logs: DashMap<ProcessId, Vec<Event<S>>>,
    frozen: AtomicBool,
}

impl<S> LogStore<S> {
    /// Create an empty store for `process_count` processes
    pub fn new(process_count: usize) -> Self {
        Self {
            process_count,
            logs: DashMap::with_capacity(process_count),
            frozen: AtomicBool::new(false),
        }
    }

    /// Number of processes the store accepts events from
    #[inline]
    pub fn process_count(&self) -> usize {
        self.process_count
    }

    /// Append `event` to the log of `process`
    ///
    /// # Errors
    /// - `UnknownProcess`: id outside `0..process_count`
    /// - `ProcessMismatch`: clock owned by another process or of the wrong width
    /// - `CausalRegression`: own component not above the previous event's
    /// - `LogFrozen`: the store was already frozen
    pub fn append(&self, process: ProcessId, event: Event<S>) -> Result<()> {
        if process.as_usize() >= self.process_count {
            return Err(DetectionError::UnknownProcess {
                process,
                process_count: self.process_count,
            });
        }

        let clock = &event.timestamp;
        if clock.owner() != process {
            return Err(DetectionError::ProcessMismatch {
                process,
                reason: format!("clock belongs to {}", clock.owner()),
            });
        }
        if clock.len() != self.process_count {
            return Err(DetectionError::ProcessMismatch {
                process,
                reason: format!(
                    "clock has {} components, expected {}",
                    clock.len(),
                    self.process_count
                ),
            });
        }

        let mut log = self.logs.entry(process).or_default();
        if self.frozen.load(Ordering::SeqCst) {
            return Err(DetectionError::LogFrozen(process));
        }

        if let Some(last) = log.last() {
            let previous = last.timestamp.own();
            if clock.own() <= previous {
                return Err(DetectionError::CausalRegression {
                    process,
                    previous,
                    received: clock.own(),
                });
            }
        }

        log.push(event);
        Ok(())
    }

    /// Number of events recorded so far by `process`
    pub fn len(&self, process: ProcessId) -> usize {
        self.logs.get(&process).map_or(0, |log| log.len())
    }

    /// Whether `process` has recorded nothing yet
    pub fn is_empty(&self, process: ProcessId) -> bool {
        self.len(process) == 0
    }

    /// Whether the store has been frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// Stop accepting events and move the logs into a read-only view
    ///
    /// Freezing twice yields empty logs the second time; callers freeze
    /// exactly once, after the completion barrier.
    pub fn freeze(&self) -> FrozenLogs<S> {
        self.frozen.store(true, Ordering::SeqCst);

        let logs = (0..self.process_count)
            .map(|p| {
                self.logs
                    .remove(&ProcessId(p))
                    .map(|(_, log)| log)
                    .unwrap_or_default()
            })
            .collect();

        FrozenLogs::new(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::VectorClock;
    use std::sync::Arc;
    use std::thread;

    fn event(owner: usize, clocks: &[u64], state: i64) -> Event<i64> {
        Event::new(state, VectorClock::from_parts(ProcessId(owner), clocks.to_vec()))
    }

    #[test]
    fn test_append_and_freeze() {
        let store = LogStore::new(2);
        store.append(ProcessId(0), event(0, &[1, 0], 0)).unwrap();
        store.append(ProcessId(0), event(0, &[2, 0], 4)).unwrap();
        store.append(ProcessId(1), event(1, &[0, 1], 0)).unwrap();
        assert_eq!(store.len(ProcessId(0)), 2);

        let frozen = store.freeze();
        assert_eq!(frozen.len(ProcessId(0)), 2);
        assert_eq!(frozen.len(ProcessId(1)), 1);
        assert_eq!(frozen.event_at(ProcessId(0), 1).map(|e| e.state), Some(4));
        assert!(store.is_frozen());
    }

    #[test]
    fn test_causal_regression_rejected() {
        let store = LogStore::new(2);
        store.append(ProcessId(0), event(0, &[2, 0], 0)).unwrap();

        let err = store.append(ProcessId(0), event(0, &[2, 1], 1)).unwrap_err();
        assert_eq!(
            err,
            DetectionError::CausalRegression {
                process: ProcessId(0),
                previous: 2,
                received: 2
            }
        );
        assert_eq!(store.len(ProcessId(0)), 1);
    }

    #[test]
    fn test_mismatched_clock_rejected() {
        let store = LogStore::new(2);
        assert!(matches!(
            store.append(ProcessId(0), event(1, &[0, 1], 0)),
            Err(DetectionError::ProcessMismatch { .. })
        ));
        assert!(matches!(
            store.append(ProcessId(0), event(0, &[1, 0, 0], 0)),
            Err(DetectionError::ProcessMismatch { .. })
        ));
        assert!(matches!(
            store.append(ProcessId(3), event(3, &[0, 0], 0)),
            Err(DetectionError::UnknownProcess { .. })
        ));
    }

    #[test]
    fn test_append_after_freeze_rejected() {
        let store = LogStore::new(1);
        store.append(ProcessId(0), event(0, &[1], 0)).unwrap();
        let _ = store.freeze();

        assert_eq!(
            store.append(ProcessId(0), event(0, &[2], 0)),
            Err(DetectionError::LogFrozen(ProcessId(0)))
        );
    }

    #[test]
    fn test_concurrent_appends() {
        const PROCESSES: usize = 4;
        const EVENTS: u64 = 200;

        let store = Arc::new(LogStore::new(PROCESSES));
        let handles: Vec<_> = (0..PROCESSES)
            .map(|p| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut clock = VectorClock::new(ProcessId(p), PROCESSES);
                    for step in 0..EVENTS {
                        clock.increment();
                        store
                            .append(ProcessId(p), Event::new(step as i64, clock.clone()))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let frozen = store.freeze();
        for p in 0..PROCESSES {
            let log = frozen.log(ProcessId(p));
            assert_eq!(log.len(), EVENTS as usize);
            assert!(log.windows(2).all(|w| w[0].timestamp.own() < w[1].timestamp.own()));
        }
    }
}
