//! Recorded Event Definitions

use crate::domain::clock::VectorClock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a producing process
///
/// Process ids are dense: a system of `n` processes uses ids `0..n`, which
/// double as vector clock indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new process identifier
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl From<usize> for ProcessId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// A local-state snapshot tagged with the clock active when it was taken
///
/// Immutable once appended to a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<S> {
    /// Application-defined local state
    pub state: S,
    /// Causal timestamp at snapshot time
    pub timestamp: VectorClock,
}

impl<S> Event<S> {
    /// Create a new event
    pub fn new(state: S, timestamp: VectorClock) -> Self {
        Self { state, timestamp }
    }

    /// Process that recorded this event
    #[inline]
    pub fn process(&self) -> ProcessId {
        self.timestamp.owner()
    }
}
