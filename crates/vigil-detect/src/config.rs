//! Monitor Configuration
//!
//! [`MonitorConfig`] names the processes and the (predicate, pair)
//! combinations to classify. [`Scenario`] bundles a configuration with
//! pre-recorded logs so an execution can be replayed from a JSON file.

use crate::adapters::monitor::Monitor;
use crate::domain::clock::VectorClock;
use crate::domain::lattice::ProcessPair;
use crate::domain::log::ProcessId;
use crate::domain::predicate::PredicateLibrary;
use crate::error::{DetectionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One predicate to classify over one pair of processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    /// Index into the predicate library
    pub predicate: usize,
    /// First tracked process
    pub process_i: ProcessId,
    /// Second tracked process
    pub process_j: ProcessId,
}

impl Combination {
    /// Create a combination
    pub fn new(predicate: usize, process_i: usize, process_j: usize) -> Self {
        Self {
            predicate,
            process_i: ProcessId(process_i),
            process_j: ProcessId(process_j),
        }
    }

    /// The tracked pair
    pub fn pair(&self) -> ProcessPair {
        ProcessPair::new(self.process_i, self.process_j)
    }

    fn validate(&self, process_count: usize) -> Result<()> {
        let (i, j) = (self.process_i, self.process_j);
        if i == j || i.as_usize() >= process_count || j.as_usize() >= process_count {
            return Err(DetectionError::InvalidProcessPair { i, j, process_count });
        }
        Ok(())
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "predicate {} on {}", self.predicate, self.pair())
    }
}

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Number of producer processes
    pub process_count: usize,
    /// Combinations classified by `Monitor::run`, in report order
    pub combinations: Vec<Combination>,
    /// Classify distinct process pairs on scoped threads
    #[serde(default)]
    pub parallel: bool,
}

impl MonitorConfig {
    /// Start a builder
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::new()
    }

    /// Check the process count and every combination's pair
    ///
    /// Predicate indices are checked against the library by the monitor.
    pub fn validate(&self) -> Result<()> {
        if self.process_count < 2 {
            return Err(DetectionError::InvalidConfig(format!(
                "need at least 2 processes, got {}",
                self.process_count
            )));
        }
        self.combinations
            .iter()
            .try_for_each(|combination| combination.validate(self.process_count))
    }

    /// Check predicate indices against a library of `available` predicates
    pub fn validate_predicates(&self, available: usize) -> Result<()> {
        match self.combinations.iter().find(|c| c.predicate >= available) {
            Some(c) => Err(DetectionError::UnknownPredicate {
                index: c.predicate,
                available,
            }),
            None => Ok(()),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            process_count: 2,
            combinations: Vec::new(),
            parallel: false,
        }
    }
}

/// Builder for [`MonitorConfig`]
///
/// # Example
///
/// ```rust
/// use vigil_detect::config::MonitorConfig;
///
/// let config = MonitorConfig::builder()
///     .process_count(3)
///     .combination(0, 0, 1)
///     .combination(3, 0, 2)
///     .parallel(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.combinations.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
}

impl MonitorConfigBuilder {
    /// Defaults: 2 processes, no combinations, sequential runs
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of processes
    pub fn process_count(mut self, process_count: usize) -> Self {
        self.config.process_count = process_count;
        self
    }

    /// Add a combination
    pub fn combination(mut self, predicate: usize, process_i: usize, process_j: usize) -> Self {
        self.config
            .combinations
            .push(Combination::new(predicate, process_i, process_j));
        self
    }

    /// Enable or disable parallel classification
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<MonitorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario files
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One recorded event: local state plus the raw clock vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent<S> {
    /// Local state after the event
    pub state: S,
    /// Vector clock components, indexed by process
    pub clock: Vec<u64>,
}

/// A finished execution plus the checks to run on it
///
/// ```json
/// {
///   "process_count": 2,
///   "logs": [
///     [{ "state": 0, "clock": [1, 0] }, { "state": 4, "clock": [2, 0] }],
///     [{ "state": 4, "clock": [0, 1] }]
///   ],
///   "checks": [{ "predicate": 0, "process_i": 0, "process_j": 1 }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario<S> {
    /// Number of processes
    pub process_count: usize,
    /// Per-process logs in recording order
    pub logs: Vec<Vec<RecordedEvent<S>>>,
    /// Combinations to classify
    pub checks: Vec<Combination>,
    /// Classify pairs in parallel
    #[serde(default)]
    pub parallel: bool,
}

impl<S> Scenario<S> {
    /// Monitor configuration described by the scenario
    pub fn config(&self) -> Result<MonitorConfig> {
        if self.logs.len() != self.process_count {
            return Err(DetectionError::InvalidConfig(format!(
                "scenario declares {} processes but carries {} logs",
                self.process_count,
                self.logs.len()
            )));
        }

        let config = MonitorConfig {
            process_count: self.process_count,
            combinations: self.checks.clone(),
            parallel: self.parallel,
        };
        config.validate()?;
        Ok(config)
    }
}

impl<S> Scenario<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Build a monitor, record every event and finish every producer
    ///
    /// The returned monitor is resolved; call `run` on it.
    pub fn replay(&self, library: PredicateLibrary<S>) -> Result<Monitor<S>> {
        let monitor = Monitor::new(self.config()?, library)?;

        for (p, log) in self.logs.iter().enumerate() {
            let process = ProcessId(p);
            for event in log {
                let clock = VectorClock::from_parts(process, event.clock.clone());
                monitor.record_event(process, event.state.clone(), clock)?;
            }
            monitor.producer_finished(process)?;
        }

        Ok(monitor)
    }
}
