//! Detection Coordinator
//!
//! Collects events from concurrent producers, waits for every producer to
//! finish, then builds one lattice per tracked pair and classifies each
//! configured predicate on it.
//!
//! # Lifecycle
//!
//! ```text
//! recording ──(last producer_finished)──▶ resolved ──(first run / query)──▶ frozen
//! ```
//!
//! Classification never starts before the barrier resolves; queries made
//! earlier fail with `BarrierPending` and `results()` stays `None`.

use crate::config::{Combination, MonitorConfig};
use crate::domain::classifier::{Classification, ClassificationReport, ClassificationStats, PredicateClassifier};
use crate::domain::clock::VectorClock;
use crate::domain::lattice::{LatticeBuilder, ProcessPair};
use crate::domain::log::{Event, FrozenLogs, ProcessId};
use crate::domain::predicate::PredicateLibrary;
use crate::error::{DetectionError, Result};
use crate::infrastructure::{CompletionBarrier, LogStore};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Verdict of one configured combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationOutcome {
    /// The combination that was classified
    pub combination: Combination,
    /// Verdict, or the error that aborted this run
    pub result: Result<Classification>,
    /// Run counters (zero when the run failed)
    pub stats: ClassificationStats,
}

impl CombinationOutcome {
    fn from_report(combination: Combination, report: Result<ClassificationReport>) -> Self {
        match report {
            Ok(report) => Self {
                combination,
                result: Ok(report.classification),
                stats: report.stats,
            },
            Err(err) => Self {
                combination,
                result: Err(err),
                stats: ClassificationStats::default(),
            },
        }
    }
}

/// Results of every configured combination
///
/// The per-predicate flags are sticky: a predicate is marked possibly or
/// definitely true if any of its combinations says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionReport {
    outcomes: Vec<CombinationOutcome>,
    possibly_true: Vec<bool>,
    definitely_true: Vec<bool>,
}

impl DetectionReport {
    fn new(predicate_count: usize, outcomes: Vec<CombinationOutcome>) -> Self {
        let mut possibly_true = vec![false; predicate_count];
        let mut definitely_true = vec![false; predicate_count];

        for outcome in &outcomes {
            if let Ok(classification) = outcome.result {
                let index = outcome.combination.predicate;
                possibly_true[index] |= classification.possibly;
                definitely_true[index] |= classification.definitely;
            }
        }

        Self {
            outcomes,
            possibly_true,
            definitely_true,
        }
    }

    /// Outcomes in configuration order
    pub fn outcomes(&self) -> &[CombinationOutcome] {
        &self.outcomes
    }

    /// Possibly flags indexed by predicate
    pub fn possibly_true(&self) -> &[bool] {
        &self.possibly_true
    }

    /// Definitely flags indexed by predicate
    pub fn definitely_true(&self) -> &[bool] {
        &self.definitely_true
    }

    /// Whether `predicate` possibly holds (false for unknown indices)
    pub fn possibly(&self, predicate: usize) -> bool {
        self.possibly_true.get(predicate).copied().unwrap_or(false)
    }

    /// Whether `predicate` definitely holds (false for unknown indices)
    pub fn definitely(&self, predicate: usize) -> bool {
        self.definitely_true.get(predicate).copied().unwrap_or(false)
    }

    /// Outcomes whose run was aborted
    pub fn failures(&self) -> impl Iterator<Item = &CombinationOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Whether every combination produced a verdict
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Coordinator for event collection and predicate detection
pub struct Monitor<S> {
    config: MonitorConfig,
    library: PredicateLibrary<S>,
    store: LogStore<S>,
    barrier: CompletionBarrier,
    frozen: OnceCell<FrozenLogs<S>>,
    report: OnceCell<Arc<DetectionReport>>,
}

impl<S> Monitor<S>
where
    S: Send + Sync,
{
    /// Create a monitor for `config`, resolving predicates in `library`
    ///
    /// # Errors
    /// - `InvalidConfig` / `InvalidProcessPair`: malformed configuration
    /// - `UnknownPredicate`: a combination names a missing predicate
    pub fn new(config: MonitorConfig, library: PredicateLibrary<S>) -> Result<Self> {
        config.validate()?;
        config.validate_predicates(library.len())?;

        info!(
            processes = config.process_count,
            combinations = config.combinations.len(),
            predicates = library.len(),
            parallel = config.parallel,
            "monitor created"
        );

        Ok(Self {
            store: LogStore::new(config.process_count),
            barrier: CompletionBarrier::new(config.process_count),
            config,
            library,
            frozen: OnceCell::new(),
            report: OnceCell::new(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Predicate library
    pub fn library(&self) -> &PredicateLibrary<S> {
        &self.library
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Producer side
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Append an event to the log of `process`
    ///
    /// # Errors
    /// - `ProducerAlreadyFinished`: the producer already signalled completion
    /// - any validation error from the log store
    pub fn record_event(&self, process: ProcessId, state: S, timestamp: VectorClock) -> Result<()> {
        if self.barrier.has_finished(process) {
            return Err(DetectionError::ProducerAlreadyFinished(process));
        }
        self.store.append(process, Event::new(state, timestamp))
    }

    /// Signal that `process` will record no further events
    pub fn producer_finished(&self, process: ProcessId) -> Result<()> {
        let running = self.barrier.finish(process)?;
        debug!(%process, events = self.store.len(process), running, "producer finished");

        if running == 0 {
            info!("all producers finished; barrier resolved");
        }
        Ok(())
    }

    /// Block until every producer has finished
    pub fn wait_for_producers(&self) {
        self.barrier.wait();
    }

    /// Block for at most `timeout`; returns whether the barrier resolved
    pub fn wait_for_producers_timeout(&self, timeout: Duration) -> bool {
        self.barrier.wait_timeout(timeout)
    }

    /// Whether every producer has finished
    pub fn is_resolved(&self) -> bool {
        self.barrier.is_resolved()
    }

    /// Producers that have not finished yet
    pub fn running_producers(&self) -> usize {
        self.barrier.running()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Detection side
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Frozen logs, available once the barrier has resolved
    ///
    /// # Errors
    /// - `BarrierPending`: producers are still running
    pub fn frozen_logs(&self) -> Result<&FrozenLogs<S>> {
        let running = self.barrier.running();
        if running > 0 {
            return Err(DetectionError::BarrierPending { running });
        }

        Ok(self.frozen.get_or_init(|| {
            let logs = self.store.freeze();
            info!(events = logs.total_events(), "event logs frozen");
            logs
        }))
    }

    /// Classify one predicate over one pair, outside the configured set
    ///
    /// # Errors
    /// - `BarrierPending`: producers are still running
    /// - `UnknownPredicate`, `InvalidProcessPair`, `EmptyLog`
    /// - `InconsistentInitialCut`: a tracked log opens with a receive
    /// - internal errors from lattice construction or classification
    pub fn run_classification(
        &self,
        predicate: usize,
        process_i: usize,
        process_j: usize,
    ) -> Result<Classification> {
        let pair = ProcessPair::new(ProcessId(process_i), ProcessId(process_j));
        self.classify_detailed(predicate, pair)
            .map(|report| report.classification)
    }

    /// Like [`run_classification`](Self::run_classification) but returns
    /// the full report
    pub fn classify_detailed(&self, predicate: usize, pair: ProcessPair) -> Result<ClassificationReport> {
        let logs = self.frozen_logs()?;
        let predicate_ref = self.library.get(predicate).ok_or(DetectionError::UnknownPredicate {
            index: predicate,
            available: self.library.len(),
        })?;

        let builder = LatticeBuilder::new(logs, pair)?;
        let lattice = builder.reachable_from(builder.initial_cut())?;
        PredicateClassifier::new(&builder).classify(predicate_ref, &lattice)
    }

    /// Wait for the barrier, then classify every configured combination
    ///
    /// The report is computed once; later calls return the same `Arc`.
    /// Per-combination failures are recorded in the report, not returned.
    pub fn run(&self) -> Result<Arc<DetectionReport>> {
        self.wait_for_producers();

        self.report
            .get_or_try_init(|| {
                let logs = self.frozen_logs()?;
                let outcomes = if self.config.parallel {
                    self.run_parallel(logs)
                } else {
                    self.run_sequential(logs)
                };

                let report = DetectionReport::new(self.library.len(), outcomes);
                info!(
                    combinations = report.outcomes().len(),
                    failures = report.failures().count(),
                    "detection finished"
                );
                Ok(Arc::new(report))
            })
            .map(Arc::clone)
    }

    /// Report of a finished `run`, if any
    pub fn results(&self) -> Option<Arc<DetectionReport>> {
        self.report.get().cloned()
    }

    fn run_sequential(&self, logs: &FrozenLogs<S>) -> Vec<CombinationOutcome> {
        let mut outcomes = Vec::with_capacity(self.config.combinations.len());
        for (pair, combinations) in self.group_by_pair() {
            outcomes.extend(self.run_pair(logs, pair, &combinations));
        }
        Self::restore_order(outcomes, &self.config.combinations)
    }

    fn run_parallel(&self, logs: &FrozenLogs<S>) -> Vec<CombinationOutcome> {
        let groups = self.group_by_pair();

        let outcomes: Vec<CombinationOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = groups
                .iter()
                .map(|(pair, combinations)| scope.spawn(move || self.run_pair(logs, *pair, combinations)))
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
                .collect()
        });

        Self::restore_order(outcomes, &self.config.combinations)
    }

    /// Build one lattice for `pair` and classify each of its combinations
    fn run_pair(&self, logs: &FrozenLogs<S>, pair: ProcessPair, combinations: &[Combination]) -> Vec<CombinationOutcome> {
        let lattice = LatticeBuilder::new(logs, pair).and_then(|builder| {
            let lattice = builder.reachable_from(builder.initial_cut())?;
            Ok((builder, lattice))
        });

        let (builder, lattice) = match lattice {
            Ok(built) => built,
            Err(err) => {
                warn!(%pair, error = %err, category = err.category(), "lattice construction failed");
                return combinations
                    .iter()
                    .map(|&combination| CombinationOutcome::from_report(combination, Err(err.clone())))
                    .collect();
            }
        };

        let classifier = PredicateClassifier::new(&builder);
        combinations
            .iter()
            .map(|&combination| {
                let report = self
                    .library
                    .get(combination.predicate)
                    .ok_or(DetectionError::UnknownPredicate {
                        index: combination.predicate,
                        available: self.library.len(),
                    })
                    .and_then(|predicate| classifier.classify(predicate, &lattice));

                match &report {
                    Ok(report) => info!(
                        %combination,
                        possibly = report.classification.possibly,
                        definitely = report.classification.definitely,
                        "combination classified"
                    ),
                    Err(err) => warn!(%combination, error = %err, "classification aborted"),
                }

                CombinationOutcome::from_report(combination, report)
            })
            .collect()
    }

    /// Distinct pairs in first-appearance order with their combinations
    fn group_by_pair(&self) -> Vec<(ProcessPair, Vec<Combination>)> {
        let mut groups: Vec<(ProcessPair, Vec<Combination>)> = Vec::new();
        for &combination in &self.config.combinations {
            let pair = combination.pair();
            match groups.iter_mut().find(|(p, _)| *p == pair) {
                Some((_, members)) => members.push(combination),
                None => groups.push((pair, vec![combination])),
            }
        }
        groups
    }

    /// Reorder outcomes to match the configured combination order
    fn restore_order(mut outcomes: Vec<CombinationOutcome>, order: &[Combination]) -> Vec<CombinationOutcome> {
        let mut ordered = Vec::with_capacity(outcomes.len());
        for combination in order {
            if let Some(pos) = outcomes.iter().position(|o| o.combination == *combination) {
                ordered.push(outcomes.swap_remove(pos));
            }
        }
        ordered
    }
}

impl<S> std::fmt::Debug for Monitor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("config", &self.config)
            .field("library", &self.library)
            .field("running", &self.barrier.running())
            .field("reported", &self.report.get().is_some())
            .finish()
    }
}
