//! # Event Log Domain Module
//!
//! Per-process, append-only histories of recorded events. Producers append
//! through the infrastructure `LogStore`; once every producer has finished
//! the store is frozen into [`FrozenLogs`], the read-only view the lattice
//! engine works on.

pub mod event;
pub mod frozen;

pub use event::{Event, ProcessId};
pub use frozen::FrozenLogs;
