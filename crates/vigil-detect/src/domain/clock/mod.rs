//! # Causal Timestamp Module
//!
//! Vector clocks carried by every recorded event. A process mutates its
//! *working* clock (`increment` on local events, `merge` on receive) and
//! snapshots a copy into each event it records; the snapshot is never
//! mutated again.
//!
//! ```text
//! p0: [1,0] ──► [2,0] ──send──► [3,0]
//!                        \
//! p1: [0,1] ─────────────► [2,2]   (merge: own+1, then max)
//! ```
//!
//! # Invariants
//! - Component `p` of `p`'s own clocks never decreases across its events
//! - `merge` never decreases any component

mod vector_clock;

#[cfg(kani)]
mod proofs;

pub use vector_clock::VectorClock;
