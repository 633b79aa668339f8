//! Cut and Process Pair Value Types

use crate::domain::log::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two tracked processes of a lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The first tracked process (`i`)
    I,
    /// The second tracked process (`j`)
    J,
}

impl Direction {
    /// Both directions, in expansion order
    pub const ALL: [Direction; 2] = [Direction::I, Direction::J];

    #[inline(always)]
    const fn slot(self) -> usize {
        match self {
            Direction::I => 0,
            Direction::J => 1,
        }
    }
}

/// A global state over two tracked processes
///
/// Component `k` is the index of the event of that process included in
/// the state: `(0, 0)` contains the first event of each process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cut([usize; 2]);

impl Cut {
    /// Create a cut from the two event indices
    #[inline(always)]
    pub const fn new(i: usize, j: usize) -> Self {
        Self([i, j])
    }

    /// The initial cut `(0, 0)`
    #[inline(always)]
    pub const fn initial() -> Self {
        Self([0, 0])
    }

    /// Event index of the first tracked process
    #[inline(always)]
    pub const fn i(self) -> usize {
        self.0[0]
    }

    /// Event index of the second tracked process
    #[inline(always)]
    pub const fn j(self) -> usize {
        self.0[1]
    }

    /// Event index along `direction`
    #[inline(always)]
    pub const fn index(self, direction: Direction) -> usize {
        self.0[direction.slot()]
    }

    /// Total events consumed beyond the initial cut
    #[inline(always)]
    pub const fn level(self) -> usize {
        self.0[0] + self.0[1]
    }

    /// The cut one event further along `direction`
    #[inline]
    pub fn advance(self, direction: Direction) -> Self {
        let mut components = self.0;
        components[direction.slot()] += 1;
        Self(components)
    }

    /// Component vector
    #[inline(always)]
    pub const fn components(self) -> [usize; 2] {
        self.0
    }
}

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}

impl fmt::Debug for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}{}", self.0[0], self.0[1])
    }
}

/// The two processes whose local states a predicate reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessPair {
    /// First tracked process
    pub i: ProcessId,
    /// Second tracked process
    pub j: ProcessId,
}

impl ProcessPair {
    /// Create a pair (validated by the lattice builder)
    pub const fn new(i: ProcessId, j: ProcessId) -> Self {
        Self { i, j }
    }

    /// Process tracked along `direction`
    #[inline]
    pub const fn process(self, direction: Direction) -> ProcessId {
        match direction {
            Direction::I => self.i,
            Direction::J => self.j,
        }
    }
}

impl fmt::Display for ProcessPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_equality() {
        let mut seen = HashSet::new();
        assert!(seen.insert(Cut::new(1, 2)));
        assert!(!seen.insert(Cut::new(1, 0).advance(Direction::J).advance(Direction::J)));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_advance_and_level() {
        let cut = Cut::initial();
        assert_eq!(cut.level(), 0);

        let next = cut.advance(Direction::I);
        assert_eq!(next, Cut::new(1, 0));
        assert_eq!(next.level(), 1);
        assert_eq!(next.index(Direction::I), 1);
        assert_eq!(next.index(Direction::J), 0);

        // advancing never mutates the original value
        assert_eq!(cut, Cut::new(0, 0));
    }

    #[test]
    fn test_pair_directions() {
        let pair = ProcessPair::new(ProcessId(0), ProcessId(2));
        assert_eq!(pair.process(Direction::I), ProcessId(0));
        assert_eq!(pair.process(Direction::J), ProcessId(2));
        assert_eq!(pair.to_string(), "(p0, p2)");
    }

    #[test]
    fn test_cut_formatting() {
        assert_eq!(Cut::new(3, 1).to_string(), "(3, 1)");
        assert_eq!(format!("{:?}", Cut::new(3, 1)), "S31");
    }
}
