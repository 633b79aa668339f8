//! # Lattice Domain Module
//!
//! The directed graph of causally-consistent global states ("cuts") between
//! two tracked processes, built breadth-first from the all-zero cut.
//!
//! ```text
//!   level 0        (0,0)
//!                 ↙     ↘
//!   level 1   (1,0)     (0,1)
//!                 ↘     ↙   ↘
//!   level 2        (1,1)     (0,2)      every edge advances exactly one
//!                    ⋮                   tracked process by one event
//!   level L   (len_i - 1, len_j - 1)    the final cut
//! ```
//!
//! Cuts are plain values: two cuts with the same components are the same
//! cut, which lets them serve directly as frontier and visited-set keys.

pub mod builder;
pub mod cut;
pub mod graph;

pub use builder::LatticeBuilder;
pub use cut::{Cut, Direction, ProcessPair};
pub use graph::Lattice;
