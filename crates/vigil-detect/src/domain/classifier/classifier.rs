//! Possibly / Definitely Classification

use crate::domain::lattice::{Cut, Lattice, LatticeBuilder};
use crate::domain::predicate::Predicate;
use crate::error::{DetectionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace, warn};

/// Verdict for one predicate over one process pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    /// Holds in at least one consistent cut
    pub possibly: bool,
    /// Holds in some consistent cut of every run
    pub definitely: bool,
}

impl Classification {
    /// Create a verdict
    pub const fn new(possibly: bool, definitely: bool) -> Self {
        Self {
            possibly,
            definitely,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "possibly={} definitely={}",
            self.possibly, self.definitely
        )
    }
}

/// Counters collected during one classification run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Cuts the predicate was evaluated on
    pub evaluated: usize,
    /// Cuts where the predicate held (not expanded further)
    pub absorbed: usize,
    /// Predicate-false cuts whose successors were generated
    pub expanded: usize,
    /// Levels visited
    pub levels: usize,
}

/// Verdict plus the trail of the run
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    /// The verdict
    pub classification: Classification,
    /// Run counters
    pub stats: ClassificationStats,
    /// Cuts evaluated at each level
    pub explored: Vec<Vec<Cut>>,
    /// Cuts where the predicate held
    pub absorbed: Vec<Cut>,
}

impl ClassificationReport {
    /// Whether `cut` was evaluated during the run
    pub fn was_explored(&self, cut: Cut) -> bool {
        self.explored.get(cut.level()).is_some_and(|level| level.contains(&cut))
    }
}

/// Level-by-level walk of the predicate-false sub-lattice
pub struct PredicateClassifier<'b, 'a, S> {
    builder: &'b LatticeBuilder<'a, S>,
}

impl<'b, 'a, S> PredicateClassifier<'b, 'a, S> {
    /// Create a classifier that expands cuts through `builder`
    pub fn new(builder: &'b LatticeBuilder<'a, S>) -> Self {
        Self { builder }
    }

    /// Classify `predicate`, bounded by the height of `lattice`
    ///
    /// # Errors
    /// - `FinalCutUnreachable`: the lattice never reaches the final cut,
    ///   so its height is not a sound bound
    /// - `StrandedCut`: a false cut below the terminal level has no
    ///   successors, so the two passes disagree
    /// - `CutOutOfBounds`: propagated from the builder
    pub fn classify(
        &self,
        predicate: &dyn Predicate<S>,
        lattice: &Lattice,
    ) -> Result<ClassificationReport> {
        let terminal = match lattice.terminal_level() {
            Some(level) if lattice.is_complete() => level,
            _ => {
                warn!(
                    pair = %lattice.pair(),
                    final_cut = %lattice.final_cut(),
                    height = lattice.height(),
                    "final cut unreachable; refusing to classify"
                );
                return Err(DetectionError::FinalCutUnreachable {
                    expected: lattice.final_cut(),
                    deepest: lattice.height().saturating_sub(1),
                });
            }
        };

        let mut classification = Classification::default();
        let mut stats = ClassificationStats::default();
        let mut explored = Vec::new();
        let mut absorbed = Vec::new();

        let initial = self.builder.initial_cut();
        let mut seen = HashSet::from([initial]);
        let mut frontier = vec![initial];
        let mut level = 0;
        let mut false_run_completes = false;

        while !frontier.is_empty() {
            let mut next = Vec::new();

            for &cut in &frontier {
                let (state_i, state_j) = self.builder.states_at(cut)?;
                stats.evaluated += 1;

                if predicate.evaluate(state_i, state_j) {
                    trace!(%cut, level, "predicate holds; cut absorbed");
                    classification.possibly = true;
                    stats.absorbed += 1;
                    absorbed.push(cut);
                    continue;
                }

                if level == terminal {
                    false_run_completes = true;
                    continue;
                }

                let successors = self.builder.successors(cut)?;
                if successors.is_empty() {
                    warn!(%cut, level, height = lattice.height(), "stranded predicate-false cut");
                    return Err(DetectionError::StrandedCut {
                        cut,
                        level,
                        height: lattice.height(),
                    });
                }

                stats.expanded += 1;
                for succ in successors {
                    if seen.insert(succ) {
                        next.push(succ);
                    }
                }
            }

            explored.push(frontier);
            frontier = next;
            level += 1;
        }

        stats.levels = explored.len();
        classification.definitely = !false_run_completes;

        debug!(
            predicate = predicate.name(),
            pair = %lattice.pair(),
            evaluated = stats.evaluated,
            absorbed = stats.absorbed,
            %classification,
            "classification finished"
        );

        Ok(ClassificationReport {
            classification,
            stats,
            explored,
            absorbed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::VectorClock;
    use crate::domain::lattice::ProcessPair;
    use crate::domain::log::{Event, FrozenLogs, ProcessId};
    use crate::domain::predicate::FnPredicate;

    fn event(owner: usize, clocks: &[u64], state: i64) -> Event<i64> {
        Event::new(state, VectorClock::from_parts(ProcessId(owner), clocks.to_vec()))
    }

    /// Lattice: (0,0) → (1,0) → {(2,0), (1,1)} → (2,1)
    /// states:   p0 = 0, 4, 8   p1 = 0, 5
    fn sample_logs() -> FrozenLogs<i64> {
        FrozenLogs::new(vec![
            vec![
                event(0, &[1, 0], 0),
                event(0, &[2, 0], 4),
                event(0, &[3, 0], 8),
            ],
            vec![event(1, &[0, 1], 0), event(1, &[2, 2], 5)],
        ])
    }

    fn run(predicate: impl Fn(&i64, &i64) -> bool + Send + Sync) -> ClassificationReport {
        let logs = sample_logs();
        let builder = LatticeBuilder::new(&logs, ProcessPair::new(ProcessId(0), ProcessId(1))).unwrap();
        let lattice = builder.reachable_from(builder.initial_cut()).unwrap();
        let predicate = FnPredicate::new("test", predicate);
        PredicateClassifier::new(&builder)
            .classify(&predicate, &lattice)
            .unwrap()
    }

    #[test]
    fn test_possibly_but_not_definitely() {
        // only (1,1) = 4 + 5 satisfies; the run through (2,0) avoids it
        let report = run(|a, b| a + b == 9);
        assert_eq!(report.classification, Classification::new(true, false));
        assert_eq!(report.absorbed, vec![Cut::new(1, 1)]);
    }

    #[test]
    fn test_possibly_and_definitely() {
        // every run passes through (1,0) with p0 = 4
        let report = run(|a, _| *a == 4);
        assert_eq!(report.classification, Classification::new(true, true));
        assert_eq!(report.absorbed, vec![Cut::new(1, 0)]);
        assert_eq!(report.stats.levels, 2);
    }

    #[test]
    fn test_never_holds() {
        let report = run(|a, b| *a > 1000 || *b > 1000);
        assert_eq!(report.classification, Classification::new(false, false));
        assert_eq!(report.stats.evaluated, 5);
        assert!(report.absorbed.is_empty());
    }

    #[test]
    fn test_initial_cut_absorbs_everything() {
        let report = run(|_, _| true);
        assert_eq!(report.classification, Classification::new(true, true));
        assert_eq!(report.stats.evaluated, 1);
        assert!(!report.was_explored(Cut::new(1, 0)));
    }

    #[test]
    fn test_holds_only_at_final_cut() {
        let report = run(|a, b| *a == 8 && *b == 5);
        assert_eq!(report.classification, Classification::new(true, true));
    }

    #[test]
    fn test_single_cut_lattice() {
        let logs = FrozenLogs::new(vec![vec![event(0, &[0, 0], 1)], vec![event(1, &[0, 0], 1)]]);
        let builder = LatticeBuilder::new(&logs, ProcessPair::new(ProcessId(0), ProcessId(1))).unwrap();
        let lattice = builder.reachable_from(builder.initial_cut()).unwrap();
        let classifier = PredicateClassifier::new(&builder);

        let equal = FnPredicate::new("eq", |a: &i64, b: &i64| a == b);
        let differ = FnPredicate::new("ne", |a: &i64, b: &i64| a != b);

        assert_eq!(
            classifier.classify(&equal, &lattice).unwrap().classification,
            Classification::new(true, true)
        );
        assert_eq!(
            classifier.classify(&differ, &lattice).unwrap().classification,
            Classification::new(false, false)
        );
    }

    #[test]
    fn test_unreachable_final_cut_is_flagged() {
        // p1's only later event claims to have seen a p0 event that never exists
        let logs = FrozenLogs::new(vec![
            vec![event(0, &[1, 0], 0), event(0, &[2, 0], 0)],
            vec![event(1, &[0, 1], 0), event(1, &[5, 2], 0)],
        ]);
        let builder = LatticeBuilder::new(&logs, ProcessPair::new(ProcessId(0), ProcessId(1))).unwrap();
        let lattice = builder.reachable_from(builder.initial_cut()).unwrap();
        assert!(!lattice.is_complete());

        let never = FnPredicate::new("never", |_: &i64, _: &i64| false);
        let err = PredicateClassifier::new(&builder)
            .classify(&never, &lattice)
            .unwrap_err();
        assert!(matches!(err, DetectionError::FinalCutUnreachable { .. }));
        assert!(err.is_internal());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let first = run(|a, b| a + b == 9);
        let second = run(|a, b| a + b == 9);
        assert_eq!(first.classification, second.classification);
        assert_eq!(first.explored, second.explored);
        assert_eq!(first.stats, second.stats);
    }
}
