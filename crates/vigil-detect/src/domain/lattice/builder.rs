//! Lattice Builder
//!
//! Computes consistent successors of a cut and expands the full reachable
//! lattice breadth-first. The classifier reuses [`LatticeBuilder::successors`]
//! so both passes apply the exact same consistency rule.

use super::cut::{Cut, Direction, ProcessPair};
use super::graph::Lattice;
use crate::domain::log::{Event, FrozenLogs};
use crate::error::{DetectionError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Successor and reachability engine for one tracked process pair
#[derive(Debug)]
pub struct LatticeBuilder<'a, S> {
    logs: &'a FrozenLogs<S>,
    pair: ProcessPair,
}

impl<'a, S> LatticeBuilder<'a, S> {
    /// Create a builder over `logs` for `pair`
    ///
    /// # Errors
    /// - `InvalidProcessPair`: the two ids coincide or are out of range
    /// - `EmptyLog`: a tracked process recorded no events
    /// - `InconsistentInitialCut`: the first events of the pair cannot
    ///   coexist, e.g. a log that starts with a receive
    pub fn new(logs: &'a FrozenLogs<S>, pair: ProcessPair) -> Result<Self> {
        let process_count = logs.process_count();
        if pair.i == pair.j
            || pair.i.as_usize() >= process_count
            || pair.j.as_usize() >= process_count
        {
            return Err(DetectionError::InvalidProcessPair {
                i: pair.i,
                j: pair.j,
                process_count,
            });
        }

        let (first_i, first_j) = match (logs.event_at(pair.i, 0), logs.event_at(pair.j, 0)) {
            (Some(ei), Some(ej)) => (ei, ej),
            (None, _) => return Err(DetectionError::EmptyLog(pair.i)),
            (_, None) => return Err(DetectionError::EmptyLog(pair.j)),
        };

        if !first_i.timestamp.consistent(pair.j, &first_j.timestamp) {
            return Err(DetectionError::InconsistentInitialCut {
                i: pair.i,
                j: pair.j,
            });
        }

        Ok(Self { logs, pair })
    }

    /// Tracked process pair
    #[inline]
    pub fn pair(&self) -> ProcessPair {
        self.pair
    }

    /// The all-zero cut
    #[inline]
    pub fn initial_cut(&self) -> Cut {
        Cut::initial()
    }

    /// The cut holding the last event of both tracked processes
    pub fn final_cut(&self) -> Cut {
        Cut::new(
            self.logs.len(self.pair.i).saturating_sub(1),
            self.logs.len(self.pair.j).saturating_sub(1),
        )
    }

    /// Events referenced by `cut`
    ///
    /// # Errors
    /// `CutOutOfBounds` if either component points past its log.
    pub fn events_at(&self, cut: Cut) -> Result<(&'a Event<S>, &'a Event<S>)> {
        Ok((self.event(cut, Direction::I)?, self.event(cut, Direction::J)?))
    }

    /// Local states referenced by `cut`, in `(i, j)` order
    pub fn states_at(&self, cut: Cut) -> Result<(&'a S, &'a S)> {
        let (ei, ej) = self.events_at(cut)?;
        Ok((&ei.state, &ej.state))
    }

    fn event(&self, cut: Cut, direction: Direction) -> Result<&'a Event<S>> {
        let process = self.pair.process(direction);
        self.logs
            .event_at(process, cut.index(direction))
            .ok_or_else(|| DetectionError::CutOutOfBounds {
                cut,
                process,
                len: self.logs.len(process),
            })
    }

    /// Immediate consistent successors of `cut`
    ///
    /// At most two: advance process `i`, advance process `j`. A direction
    /// is kept only if the advanced index stays inside its log and the
    /// newly included event is consistent with the other process's event.
    pub fn successors(&self, cut: Cut) -> Result<Vec<Cut>> {
        // reject a corrupt input cut before looking past it
        self.events_at(cut)?;

        let mut next = Vec::with_capacity(2);
        for direction in Direction::ALL {
            let candidate = cut.advance(direction);
            let process = self.pair.process(direction);
            if candidate.index(direction) >= self.logs.len(process) {
                continue;
            }

            let (ei, ej) = self.events_at(candidate)?;
            if ei.timestamp.consistent(self.pair.j, &ej.timestamp) {
                next.push(candidate);
            }
        }
        Ok(next)
    }

    /// Breadth-first expansion of every cut reachable from `initial`
    ///
    /// Each cut is recorded once, at the level it is first discovered. The
    /// number of levels is the lattice height used to bound classification.
    pub fn reachable_from(&self, initial: Cut) -> Result<Lattice> {
        self.events_at(initial)?;

        let final_cut = self.final_cut();
        let mut level_of = HashMap::new();
        let mut levels = Vec::new();
        let mut stranded = Vec::new();
        let mut edge_count = 0;

        level_of.insert(initial, 0);
        let mut frontier = vec![initial];

        while !frontier.is_empty() {
            let depth = levels.len();
            let mut next = Vec::new();

            for &cut in &frontier {
                let successors = self.successors(cut)?;
                if successors.is_empty() && cut != final_cut {
                    stranded.push(cut);
                }
                edge_count += successors.len();

                for succ in successors {
                    if let Entry::Vacant(slot) = level_of.entry(succ) {
                        slot.insert(depth + 1);
                        next.push(succ);
                    }
                }
            }

            levels.push(frontier);
            frontier = next;
        }

        debug!(
            pair = %self.pair,
            cuts = level_of.len(),
            height = levels.len(),
            edges = edge_count,
            "lattice built"
        );

        Ok(Lattice::new(
            self.pair, levels, level_of, final_cut, stranded, edge_count,
        ))
    }
}
