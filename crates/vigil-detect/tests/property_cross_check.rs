//! Property tests: lattice and verdicts against brute-force enumeration
//!
//! Random two-process executions are generated from local steps and
//! message exchanges. The reference answers enumerate every index pair,
//! test consistency on the raw clock vectors, and compute reachability and
//! all-false paths by dynamic programming over levels.

mod common;

use common::{arb_step, execute, execute_with};
use proptest::prelude::*;
use std::collections::HashSet;
use vigil_detect::{
    Classification, Cut, DetectionError, FnPredicate, FrozenLogs, LatticeBuilder, PredicateClassifier, ProcessId,
    ProcessPair,
};

fn consistent(logs: &FrozenLogs<i64>, x: usize, y: usize) -> bool {
    let a = logs.log(ProcessId(0))[x].timestamp.as_slice();
    let b = logs.log(ProcessId(1))[y].timestamp.as_slice();
    a[0] >= b[0] && b[1] >= a[1]
}

/// Consistent cuts reachable from (0, 0) through single-step advances
fn reference_reachable(logs: &FrozenLogs<i64>) -> HashSet<Cut> {
    let (n, m) = (logs.len(ProcessId(0)), logs.len(ProcessId(1)));
    let mut reachable = HashSet::new();

    for level in 0..(n + m - 1) {
        for x in 0..n {
            let Some(y) = level.checked_sub(x).filter(|&y| y < m) else { continue };
            if !consistent(logs, x, y) {
                continue;
            }
            let from_below = (x > 0 && reachable.contains(&Cut::new(x - 1, y)))
                || (y > 0 && reachable.contains(&Cut::new(x, y - 1)));
            if level == 0 || from_below {
                reachable.insert(Cut::new(x, y));
            }
        }
    }
    reachable
}

/// Possibly: some reachable cut satisfies `p`.
/// Definitely: no path of predicate-false cuts reaches the final cut.
fn reference_verdict(logs: &FrozenLogs<i64>, p: impl Fn(i64, i64) -> bool) -> Classification {
    let reachable = reference_reachable(logs);
    let state = |cut: Cut| {
        (
            logs.log(ProcessId(0))[cut.i()].state,
            logs.log(ProcessId(1))[cut.j()].state,
        )
    };
    let holds = |cut: Cut| {
        let (a, b) = state(cut);
        p(a, b)
    };

    let possibly = reachable.iter().any(|&cut| holds(cut));

    let mut by_level: Vec<Cut> = reachable.iter().copied().collect();
    by_level.sort_by_key(|c| c.level());

    let mut false_reach = HashSet::new();
    for cut in by_level {
        if holds(cut) {
            continue;
        }
        let from_below = (cut.i() > 0 && false_reach.contains(&Cut::new(cut.i() - 1, cut.j())))
            || (cut.j() > 0 && false_reach.contains(&Cut::new(cut.i(), cut.j() - 1)));
        if cut == Cut::initial() || from_below {
            false_reach.insert(cut);
        }
    }

    let final_cut = Cut::new(logs.len(ProcessId(0)) - 1, logs.len(ProcessId(1)) - 1);
    Classification::new(possibly, !false_reach.contains(&final_cut))
}

fn pair() -> ProcessPair {
    ProcessPair::new(ProcessId(0), ProcessId(1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The built lattice holds exactly the reachable consistent cuts
    #[test]
    fn lattice_matches_enumeration(steps in prop::collection::vec(arb_step(), 0..14)) {
        let logs = execute(&steps);
        let builder = LatticeBuilder::new(&logs, pair()).unwrap();
        let lattice = builder.reachable_from(Cut::initial()).unwrap();

        let built: HashSet<Cut> = lattice.cuts().collect();
        prop_assert_eq!(&built, &reference_reachable(&logs));
        prop_assert!(lattice.is_complete());
        prop_assert!(lattice.stranded().is_empty());
        prop_assert_eq!(lattice.height(), logs.total_events() - 1);
    }

    /// Every cut is consistent and sits at the level equal to its index sum
    #[test]
    fn cuts_are_consistent_and_levelled(steps in prop::collection::vec(arb_step(), 0..14)) {
        let logs = execute(&steps);
        let builder = LatticeBuilder::new(&logs, pair()).unwrap();
        let lattice = builder.reachable_from(Cut::initial()).unwrap();

        for cut in lattice.cuts() {
            prop_assert!(consistent(&logs, cut.i(), cut.j()));
            prop_assert_eq!(lattice.level_of(cut), Some(cut.level()));
        }
    }

    /// Classifier verdicts agree with the path-based definitions
    #[test]
    fn verdicts_match_enumeration(
        steps in prop::collection::vec(arb_step(), 0..14),
        target in -6i64..7,
    ) {
        let logs = execute(&steps);
        let builder = LatticeBuilder::new(&logs, pair()).unwrap();
        let lattice = builder.reachable_from(Cut::initial()).unwrap();
        let classifier = PredicateClassifier::new(&builder);

        let sum = FnPredicate::new("a + b == target", move |a: &i64, b: &i64| a + b == target);
        let got = classifier.classify(&sum, &lattice).unwrap().classification;
        prop_assert_eq!(got, reference_verdict(&logs, |a, b| a + b == target));

        let gap = FnPredicate::new("a - b >= target", move |a: &i64, b: &i64| a - b >= target);
        let got = classifier.classify(&gap, &lattice).unwrap().classification;
        prop_assert_eq!(got, reference_verdict(&logs, |a, b| a - b >= target));
        prop_assert!(!got.definitely || got.possibly);
    }

    /// Without a leading snapshot, a log may be empty or open with a
    /// receive. Those are rejected up front; everything else classifies
    /// exactly like the reference.
    #[test]
    fn unseeded_logs_classify_or_fail_cleanly(
        steps in prop::collection::vec(arb_step(), 0..14),
        target in -6i64..7,
    ) {
        let logs = execute_with(&steps, false);

        for process in [ProcessId(0), ProcessId(1)] {
            if logs.is_empty(process) {
                let err = LatticeBuilder::new(&logs, pair()).unwrap_err();
                prop_assert!(matches!(err, DetectionError::EmptyLog(_)));
                return Ok(());
            }
        }

        if !consistent(&logs, 0, 0) {
            let err = LatticeBuilder::new(&logs, pair()).unwrap_err();
            prop_assert_eq!(
                &err,
                &DetectionError::InconsistentInitialCut { i: ProcessId(0), j: ProcessId(1) }
            );
            prop_assert!(!err.is_internal());
            return Ok(());
        }

        let builder = LatticeBuilder::new(&logs, pair()).unwrap();
        let lattice = builder.reachable_from(Cut::initial()).unwrap();
        let built: HashSet<Cut> = lattice.cuts().collect();
        prop_assert_eq!(&built, &reference_reachable(&logs));
        prop_assert!(lattice.is_complete());

        let sum = FnPredicate::new("a + b == target", move |a: &i64, b: &i64| a + b == target);
        let got = PredicateClassifier::new(&builder).classify(&sum, &lattice).unwrap().classification;
        prop_assert_eq!(got, reference_verdict(&logs, |a, b| a + b == target));
    }
}
