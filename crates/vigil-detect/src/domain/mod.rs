//! Domain Layer - Lattice Engine
//!
//! # Architecture Overview
//!
//! Pure, single-threaded logic. Nothing in this layer locks or blocks; it
//! runs over logs that are already frozen.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Clock Module                  Log Module                   │
//! │  └─ VectorClock                ├─ ProcessId, Event<S>       │
//! │                                └─ FrozenLogs<S>             │
//! │                                                             │
//! │  Lattice Module                Classifier Module            │
//! │  ├─ Cut, ProcessPair           ├─ PredicateClassifier       │
//! │  ├─ LatticeBuilder             └─ Classification            │
//! │  └─ Lattice                                                 │
//! │                                                             │
//! │  Predicate Module                                           │
//! │  └─ Predicate<S>, PredicateLibrary<S>                       │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use vigil_detect::domain::*;
//!
//! let logs = FrozenLogs::new(vec![
//!     vec![
//!         Event::new(0_i64, VectorClock::from_parts(ProcessId(0), vec![1, 0])),
//!         Event::new(4, VectorClock::from_parts(ProcessId(0), vec![2, 0])),
//!     ],
//!     vec![Event::new(4, VectorClock::from_parts(ProcessId(1), vec![0, 1]))],
//! ]);
//!
//! let pair = ProcessPair::new(ProcessId(0), ProcessId(1));
//! let builder = LatticeBuilder::new(&logs, pair).unwrap();
//! let lattice = builder.reachable_from(builder.initial_cut()).unwrap();
//!
//! let report = PredicateClassifier::new(&builder)
//!     .classify(&predicate::Equal, &lattice)
//!     .unwrap();
//! assert_eq!(report.classification, Classification::new(true, true));
//! ```

pub mod classifier;
pub mod clock;
pub mod lattice;
pub mod log;
pub mod predicate;

pub use classifier::{Classification, ClassificationReport, ClassificationStats, PredicateClassifier};
pub use clock::VectorClock;
pub use lattice::{Cut, Direction, Lattice, LatticeBuilder, ProcessPair};
pub use log::{Event, FrozenLogs, ProcessId};
pub use predicate::{FnPredicate, Predicate, PredicateLibrary};
