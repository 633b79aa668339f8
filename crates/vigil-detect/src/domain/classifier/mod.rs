//! # Predicate Classifier Module
//!
//! Second pass over the lattice: walks only predicate-false cuts, level by
//! level, and decides whether a predicate is *possibly* and/or *definitely*
//! true.
//!
//! ```text
//!  frontier(k) ──evaluate──┬── true  → possibly = true, cut absorbed
//!                          └── false → successors → frontier(k + 1)
//!
//!  false cut alive at the terminal level  ⇒  some run avoids the predicate
//!  frontier dies out before that          ⇒  definitely true
//! ```
//!
//! The termination bound comes from the full lattice built in the first
//! pass; both passes share [`LatticeBuilder::successors`] so they agree on
//! which cuts exist.
//!
//! [`LatticeBuilder::successors`]: crate::domain::lattice::LatticeBuilder::successors

mod classifier;

pub use classifier::{Classification, ClassificationReport, ClassificationStats, PredicateClassifier};
