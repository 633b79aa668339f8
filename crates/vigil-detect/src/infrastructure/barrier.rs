//! Producer Completion Barrier
//!
//! Counts producers still running and wakes every waiter once the count
//! reaches zero. Waiters block on a `parking_lot` condition variable; there
//! is no polling interval.

use crate::domain::log::ProcessId;
use crate::error::{DetectionError, Result};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct BarrierState {
    running: usize,
    finished: Vec<bool>,
}

/// Blocking "all producers finished" barrier
#[derive(Debug)]
pub struct CompletionBarrier {
    state: Mutex<BarrierState>,
    resolved: Condvar,
}

impl CompletionBarrier {
    /// Create a barrier waiting on `process_count` producers
    pub fn new(process_count: usize) -> Self {
        Self {
            state: Mutex::new(BarrierState {
                running: process_count,
                finished: vec![false; process_count],
            }),
            resolved: Condvar::new(),
        }
    }

    /// Mark `process` as finished and return how many are still running
    ///
    /// # Errors
    /// - `UnknownProcess`: id outside the configured range
    /// - `ProducerAlreadyFinished`: second signal from the same producer
    pub fn finish(&self, process: ProcessId) -> Result<usize> {
        let mut state = self.state.lock();
        let process_count = state.finished.len();

        let slot = state
            .finished
            .get_mut(process.as_usize())
            .ok_or(DetectionError::UnknownProcess {
                process,
                process_count,
            })?;
        if *slot {
            return Err(DetectionError::ProducerAlreadyFinished(process));
        }
        *slot = true;
        state.running -= 1;

        if state.running == 0 {
            self.resolved.notify_all();
        }
        Ok(state.running)
    }

    /// Whether `process` has already signalled (false for unknown ids)
    pub fn has_finished(&self, process: ProcessId) -> bool {
        self.state
            .lock()
            .finished
            .get(process.as_usize())
            .copied()
            .unwrap_or(false)
    }

    /// Producers that have not signalled yet
    pub fn running(&self) -> usize {
        self.state.lock().running
    }

    /// Whether every producer has finished
    pub fn is_resolved(&self) -> bool {
        self.running() == 0
    }

    /// Block until every producer has finished
    pub fn wait(&self) {
        let mut state = self.state.lock();
        while state.running > 0 {
            self.resolved.wait(&mut state);
        }
    }

    /// Block for at most `timeout`; returns whether the barrier resolved
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while state.running > 0 {
            if self.resolved.wait_until(&mut state, deadline).timed_out() {
                return state.running == 0;
            }
        }
        true
    }
}
