//! # Detection Error Types
//!
//! Every failure the detector can report, grouped by who caused it:
//! producers, configuration, the completion barrier, or the lattice engine
//! itself. Internal invariant violations abort the affected classification
//! run instead of producing a misleading verdict.

use crate::domain::lattice::Cut;
use crate::domain::log::ProcessId;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Errors raised while recording, configuring or classifying
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectionError {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Producer Errors
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Process id outside the configured process range
    #[error("Unknown process {process} (monitor tracks {process_count} processes)")]
    UnknownProcess {
        process: ProcessId,
        process_count: usize,
    },

    /// Timestamp does not belong to the recording process or has the wrong width
    #[error("Timestamp mismatch for {process}: {reason}")]
    ProcessMismatch { process: ProcessId, reason: String },

    /// A process's own clock component failed to strictly increase
    #[error("Causal regression on {process}: own component {received} after {previous}")]
    CausalRegression {
        process: ProcessId,
        previous: u64,
        received: u64,
    },

    /// `producer_finished` called twice for the same process
    #[error("Producer {0} already signalled completion")]
    ProducerAlreadyFinished(ProcessId),

    /// Event appended after the logs were frozen
    #[error("Event log of {0} is frozen; no further events accepted")]
    LogFrozen(ProcessId),

    /// Mailbox between two simulated processes closed before delivery
    #[error("Mailbox {from} -> {to} disconnected")]
    Disconnected { from: ProcessId, to: ProcessId },

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Configuration Errors
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// A tracked process has no recorded events, so no initial cut exists
    #[error("Event log of {0} is empty; cannot form the initial cut")]
    EmptyLog(ProcessId),

    /// Tracked pair is degenerate or out of range
    #[error("Invalid process pair ({i}, {j}) for {process_count} processes")]
    InvalidProcessPair {
        i: ProcessId,
        j: ProcessId,
        process_count: usize,
    },

    /// The first events of a tracked pair are causally inconsistent
    ///
    /// Happens when a producer's first recorded event is a receive; producers
    /// must record a snapshot before their first receive.
    #[error("First events of {i} and {j} are inconsistent; producers must snapshot before their first receive")]
    InconsistentInitialCut { i: ProcessId, j: ProcessId },

    /// Predicate index not present in the library
    #[error("Unknown predicate index {index} (library holds {available})")]
    UnknownPredicate { index: usize, available: usize },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Barrier Errors
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Classification requested while producers are still running
    #[error("Completion barrier pending: {running} producer(s) still running")]
    BarrierPending { running: usize },

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Internal Invariant Violations
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// A cut points past the end of a log
    #[error("Cut {cut} points past the log of {process} (length {len})")]
    CutOutOfBounds {
        cut: Cut,
        process: ProcessId,
        len: usize,
    },

    /// A predicate-false cut below the terminal level has no successors
    #[error("Stranded cut {cut} at level {level}; lattice height {height} disagrees with the false sub-lattice")]
    StrandedCut { cut: Cut, level: usize, height: usize },

    /// The reachable lattice never includes the final cut
    #[error("Final cut {expected} unreachable; deepest reachable level is {deepest}")]
    FinalCutUnreachable { expected: Cut, deepest: usize },
}

impl DetectionError {
    /// Whether the error is an internal invariant violation
    ///
    /// Internal errors mean the logs or the engine are corrupt; the caller
    /// must not fall back to a default verdict.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::CutOutOfBounds { .. } | Self::StrandedCut { .. } | Self::FinalCutUnreachable { .. }
        )
    }

    /// Coarse category label for log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownProcess { .. }
            | Self::ProcessMismatch { .. }
            | Self::CausalRegression { .. }
            | Self::ProducerAlreadyFinished(_)
            | Self::LogFrozen(_)
            | Self::Disconnected { .. } => "PRODUCER_ERROR",

            Self::EmptyLog(_)
            | Self::InvalidProcessPair { .. }
            | Self::InconsistentInitialCut { .. }
            | Self::UnknownPredicate { .. }
            | Self::InvalidConfig(_) => "CONFIG_ERROR",

            Self::BarrierPending { .. } => "BARRIER_PENDING",

            Self::CutOutOfBounds { .. } | Self::StrandedCut { .. } | Self::FinalCutUnreachable { .. } => {
                "INTERNAL_ERROR"
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
