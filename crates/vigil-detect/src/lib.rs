//! Vigil Global Predicate Detector
//!
//! # Overview
//!
//! `vigil-detect` decides, after the fact, whether a condition over the
//! local states of two processes *possibly* held (in some consistent global
//! state) or *definitely* held (in every run) during a message-passing
//! execution. Producers record vector-clocked events concurrently; once all
//! of them have finished, the detector builds the lattice of consistent
//! cuts for each tracked pair and classifies every configured predicate.
//!
//! # Trinity Architecture
//!
//! - **Domain**: vector clocks, frozen logs, the cut lattice and the
//!   possibly/definitely classifier. Pure and single-threaded.
//! - **Infrastructure**: concurrent log store and the completion barrier
//! - **Adapters**: the [`Monitor`] coordinator and a simulated
//!   message-passing harness
//!
//! # Guarantees
//!
//! ## Causality
//! - A process's own clock component strictly increases along its log
//! - Consistency between two events is symmetric
//!
//! ## Lattice
//! - Every edge goes from level `k` to level `k + 1`
//! - A cut is recorded at exactly one level
//! - Classification only starts after every producer finished
//!
//! ## Verdict
//! - `definitely` implies `possibly`
//! - Both passes agree on the lattice height, or the run fails
//!
//! # Usage
//!
//! ```rust
//! use vigil_detect::{standard_library, MonitorConfig, Monitor, ProcessId, VectorClock};
//!
//! let config = MonitorConfig::builder()
//!     .combination(0, 0, 1) // x_i == x_j on (p0, p1)
//!     .build()
//!     .unwrap();
//! let monitor = Monitor::new(config, standard_library()).unwrap();
//!
//! // p0 sets x = 4; p1 sets x = 4 concurrently
//! let p0 = ProcessId(0);
//! let p1 = ProcessId(1);
//! monitor.record_event(p0, 0, VectorClock::from_parts(p0, vec![1, 0])).unwrap();
//! monitor.record_event(p0, 4, VectorClock::from_parts(p0, vec![2, 0])).unwrap();
//! monitor.record_event(p1, 2, VectorClock::from_parts(p1, vec![0, 1])).unwrap();
//! monitor.record_event(p1, 4, VectorClock::from_parts(p1, vec![0, 2])).unwrap();
//! monitor.producer_finished(p0).unwrap();
//! monitor.producer_finished(p1).unwrap();
//!
//! let report = monitor.run().unwrap();
//! assert!(report.possibly(0));
//! assert!(report.definitely(0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Trinity Architecture Layers
pub mod domain;
pub mod infrastructure;
pub mod adapters;

pub mod config;
pub mod error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Domain types
pub use domain::{
    Classification,
    ClassificationReport,
    Cut,
    Event,
    FrozenLogs,
    Lattice,
    LatticeBuilder,
    PredicateClassifier,
    ProcessId,
    ProcessPair,
    VectorClock,
};

// Predicates
pub use domain::predicate::{standard_library, FnPredicate, Predicate, PredicateLibrary};

// Coordinator
pub use adapters::{CombinationOutcome, DetectionReport, Monitor, Network, SimProcess};
pub use config::{Combination, MonitorConfig, Scenario};
pub use error::{DetectionError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
