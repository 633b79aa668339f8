//! Materialized Lattice
//!
//! Result of one breadth-first build. Owned by the caller and discarded
//! after the classification run it bounds; nothing is shared across runs.

use super::cut::{Cut, ProcessPair};
use std::collections::HashMap;

/// Reachable consistent cuts organized by BFS level
#[derive(Debug, Clone)]
pub struct Lattice {
    pair: ProcessPair,
    /// `levels[k]` = cuts first discovered at depth `k`
    levels: Vec<Vec<Cut>>,
    level_of: HashMap<Cut, usize>,
    final_cut: Cut,
    /// Non-final cuts with no consistent successor
    stranded: Vec<Cut>,
    edge_count: usize,
}

impl Lattice {
    pub(crate) fn new(
        pair: ProcessPair,
        levels: Vec<Vec<Cut>>,
        level_of: HashMap<Cut, usize>,
        final_cut: Cut,
        stranded: Vec<Cut>,
        edge_count: usize,
    ) -> Self {
        Self {
            pair,
            levels,
            level_of,
            final_cut,
            stranded,
            edge_count,
        }
    }

    /// Tracked process pair
    #[inline]
    pub fn pair(&self) -> ProcessPair {
        self.pair
    }

    /// Number of distinct BFS levels
    ///
    /// Used by the classifier as its termination bound: the terminal level
    /// is `height() - 1`.
    #[inline]
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Index of the deepest level (`None` for an empty lattice)
    #[inline]
    pub fn terminal_level(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }

    /// Cuts per level
    pub fn levels(&self) -> &[Vec<Cut>] {
        &self.levels
    }

    /// Cuts first discovered at `level`
    pub fn level(&self, level: usize) -> &[Cut] {
        self.levels.get(level).map_or(&[], Vec::as_slice)
    }

    /// BFS level at which `cut` was discovered
    #[inline]
    pub fn level_of(&self, cut: Cut) -> Option<usize> {
        self.level_of.get(&cut).copied()
    }

    /// Whether `cut` is reachable
    #[inline]
    pub fn contains(&self, cut: Cut) -> bool {
        self.level_of.contains_key(&cut)
    }

    /// Number of distinct reachable cuts
    #[inline]
    pub fn len(&self) -> usize {
        self.level_of.len()
    }

    /// Whether no cut is reachable
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.level_of.is_empty()
    }

    /// Number of successor edges traversed during the build
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Cut containing the last event of both tracked processes
    #[inline]
    pub fn final_cut(&self) -> Cut {
        self.final_cut
    }

    /// Whether the final cut was reached
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.contains(self.final_cut)
    }

    /// Non-final cuts that have no consistent successor
    ///
    /// Always empty for logs produced by a real execution.
    pub fn stranded(&self) -> &[Cut] {
        &self.stranded
    }

    /// All reachable cuts in level order
    pub fn cuts(&self) -> impl Iterator<Item = Cut> + '_ {
        self.levels.iter().flatten().copied()
    }
}
