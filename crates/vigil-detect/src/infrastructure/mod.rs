//! Infrastructure Layer - Concurrency Primitives
//!
//! The only part of the crate that synchronizes. Producers touch it
//! concurrently while they run; once the barrier resolves, everything
//! downstream works on frozen data.
//!
//! # Responsibilities
//! - Concurrent, validated appends to per-process logs (`DashMap`)
//! - The blocking "all producers finished" barrier (`parking_lot` condvar)

pub mod barrier;
pub mod store;

pub use barrier::CompletionBarrier;
pub use store::LogStore;
