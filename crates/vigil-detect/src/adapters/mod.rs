//! Adapters Layer - Ports & Adapters Pattern
//!
//! Connects producers to the domain engine.
//!
//! # Hexagonal Architecture
//! - Inbound: producers record events and signal completion ([`Monitor`])
//! - Outbound: verdicts leave as a [`DetectionReport`]
//! - [`process`] drives the monitor from simulated message-passing threads

pub mod monitor;
pub mod process;

pub use monitor::{CombinationOutcome, DetectionReport, Monitor};
pub use process::{Endpoint, Message, Network, SimProcess};
