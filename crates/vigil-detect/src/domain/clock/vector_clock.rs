//! Vector Clock Implementation
//!
//! # Theory
//!
//! Given events e1 and e2:
//! - e1 happens-before e2 (e1 → e2) if VC(e1) < VC(e2)
//! - e1 and e2 are concurrent if neither happens-before the other
//!
//! Two events from different processes can sit together in a global state
//! only if neither has seen more of the other's process than the other
//! event itself reflects; see [`VectorClock::consistent`].

use crate::domain::log::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vector clock owned by one process
///
/// # Representation
///
/// - `clocks[owner]` = the owner's own logical time
/// - `clocks[q]` = the owner's view of process `q`'s logical time
///
/// # Example
///
/// ```text
/// p0: [5, 2, 3]  (p0 has executed 5 events, last saw p1 at 2, p2 at 3)
/// p1: [4, 7, 3]  (p1 has executed 7 events, last saw p0 at 4, p2 at 3)
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VectorClock {
    owner: ProcessId,
    clocks: Vec<u64>,
}

impl VectorClock {
    /// Create an all-zero clock for `owner` in a system of `process_count` processes
    pub fn new(owner: ProcessId, process_count: usize) -> Self {
        Self {
            owner,
            clocks: vec![0; process_count],
        }
    }

    /// Create a clock from explicit component values
    pub fn from_parts(owner: ProcessId, clocks: Vec<u64>) -> Self {
        Self { owner, clocks }
    }

    /// Process this clock belongs to
    #[inline]
    pub fn owner(&self) -> ProcessId {
        self.owner
    }

    /// Number of components
    #[inline]
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Whether the clock has no components
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// Component for `process` (0 when out of range)
    #[inline]
    pub fn get(&self, process: ProcessId) -> u64 {
        self.clocks.get(process.as_usize()).copied().unwrap_or(0)
    }

    /// The owner's own component
    #[inline]
    pub fn own(&self) -> u64 {
        self.get(self.owner)
    }

    /// Raw component values
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.clocks
    }

    /// Advance the owner's component by one (local event)
    ///
    /// ```rust,ignore
    /// let mut vc = VectorClock::new(ProcessId(0), 3);
    /// vc.increment();  // [1, 0, 0]
    /// vc.increment();  // [2, 0, 0]
    /// ```
    #[inline]
    pub fn increment(&mut self) {
        if let Some(slot) = self.clocks.get_mut(self.owner.as_usize()) {
            *slot = slot.saturating_add(1);
        }
    }

    /// Receive-event update: increment own component, then element-wise max
    ///
    /// Must run before the receiving event is snapshotted.
    ///
    /// ```text
    /// self (p1): [0, 1, 0]
    /// other:     [2, 0, 1]
    /// result:    [2, 2, 1]   (own 1 -> 2, then max of each position)
    /// ```
    pub fn merge(&mut self, other: &VectorClock) {
        self.increment();
        for (mine, theirs) in self.clocks.iter_mut().zip(other.clocks.iter()) {
            *mine = (*mine).max(*theirs);
        }
    }

    /// Pairwise causal-cut consistency test
    ///
    /// `self` is an event of its owner `p`, `other` an event of
    /// `other_process` `q`. They may coexist in one global state iff
    /// `self[p] >= other[p]` and `other[q] >= self[q]`: neither event
    /// reflects knowledge of the other process beyond what that process's
    /// event already reflects.
    ///
    /// Symmetric: `a.consistent(q, b) == b.consistent(p, a)`.
    #[inline]
    pub fn consistent(&self, other_process: ProcessId, other: &VectorClock) -> bool {
        self.own() >= other.get(self.owner) && other.get(other_process) >= self.get(other_process)
    }

    /// Check if this clock happens-before another
    ///
    /// VC1 < VC2 iff every component is `<=` and at least one is `<`.
    pub fn happens_before(&self, other: &VectorClock) -> bool {
        let width = self.clocks.len().max(other.clocks.len());
        let mut some_strictly_less = false;

        for idx in 0..width {
            let mine = self.clocks.get(idx).copied().unwrap_or(0);
            let theirs = other.clocks.get(idx).copied().unwrap_or(0);
            if mine > theirs {
                return false;
            }
            if mine < theirs {
                some_strictly_less = true;
            }
        }

        some_strictly_less
    }

    /// Check if two clocks are concurrent (neither happens-before the other)
    #[inline]
    pub fn concurrent(&self, other: &VectorClock) -> bool {
        !self.happens_before(other) && !other.happens_before(self)
    }
}

impl fmt::Debug for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self, self.owner)
    }
}

impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VC[")?;
        for (i, val) in self.clocks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", val)?;
        }
        write!(f, "]")
    }
}
