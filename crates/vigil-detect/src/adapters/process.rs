//! Simulated Message-Passing Producers
//!
//! A small harness for driving a [`Monitor`] from real threads: every
//! ordered pair of processes gets its own `mpsc` mailbox, and each
//! [`SimProcess`] keeps the vector clock up to date and records a snapshot
//! after every local or receive event.

use super::monitor::Monitor;
use crate::domain::clock::VectorClock;
use crate::domain::log::ProcessId;
use crate::error::{DetectionError, Result};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tracing::trace;

/// A message carrying the sender's state and clock
#[derive(Debug, Clone)]
pub struct Message<S> {
    /// Sending process
    pub from: ProcessId,
    /// Sender's local state at send time
    pub state: S,
    /// Sender's clock at send time
    pub clock: VectorClock,
}

/// Mailboxes owned by one process
#[derive(Debug)]
pub struct Endpoint<S> {
    id: ProcessId,
    outbound: Vec<Sender<Message<S>>>,
    inbound: Vec<Receiver<Message<S>>>,
}

impl<S> Endpoint<S> {
    /// Owning process
    pub fn id(&self) -> ProcessId {
        self.id
    }
}

/// Fully connected set of point-to-point mailboxes
#[derive(Debug)]
pub struct Network<S> {
    endpoints: Vec<Option<Endpoint<S>>>,
}

impl<S> Network<S> {
    /// Connect `process_count` processes pairwise
    pub fn new(process_count: usize) -> Self {
        // senders[from][to] / receivers[to][from]
        let mut senders: Vec<Vec<Sender<Message<S>>>> = (0..process_count).map(|_| Vec::new()).collect();
        let mut receivers: Vec<Vec<Receiver<Message<S>>>> = (0..process_count).map(|_| Vec::new()).collect();

        for outbound in senders.iter_mut() {
            for inbound in receivers.iter_mut() {
                let (tx, rx) = channel();
                outbound.push(tx);
                inbound.push(rx);
            }
        }

        let endpoints = senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(p, (outbound, inbound))| {
                Some(Endpoint {
                    id: ProcessId(p),
                    outbound,
                    inbound,
                })
            })
            .collect();

        Self { endpoints }
    }

    /// Take the endpoint of `process`; `None` if unknown or already taken
    pub fn take(&mut self, process: ProcessId) -> Option<Endpoint<S>> {
        self.endpoints.get_mut(process.as_usize()).and_then(Option::take)
    }

    /// Split into all endpoints, in process order
    pub fn into_endpoints(self) -> Vec<Endpoint<S>> {
        self.endpoints.into_iter().flatten().collect()
    }
}

/// A producer process with a local state and a vector clock
#[derive(Debug)]
pub struct SimProcess<S> {
    clock: VectorClock,
    state: S,
    endpoint: Endpoint<S>,
    monitor: Arc<Monitor<S>>,
}

impl<S> SimProcess<S>
where
    S: Clone + Send + Sync,
{
    /// Create a process with an all-zero clock
    ///
    /// Nothing is recorded yet. Call [`snapshot`](Self::snapshot) before the
    /// first [`receive`](Self::receive); a log that opens with a receive is
    /// rejected at classification time with `InconsistentInitialCut`.
    pub fn new(monitor: Arc<Monitor<S>>, endpoint: Endpoint<S>, initial: S) -> Self {
        let process_count = monitor.config().process_count;
        Self {
            clock: VectorClock::new(endpoint.id, process_count),
            state: initial,
            endpoint,
            monitor,
        }
    }

    /// Process id
    pub fn id(&self) -> ProcessId {
        self.endpoint.id
    }

    /// Current local state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Current clock
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// Record the current state and clock with the monitor
    pub fn snapshot(&self) -> Result<()> {
        trace!(process = %self.id(), clock = %self.clock, "snapshot");
        self.monitor
            .record_event(self.id(), self.state.clone(), self.clock.clone())
    }

    /// Local event: update the state, tick the clock, snapshot
    pub fn local(&mut self, update: impl FnOnce(&mut S)) -> Result<()> {
        update(&mut self.state);
        self.clock.increment();
        self.snapshot()
    }

    /// Ship the current state and clock to `to`
    ///
    /// Sending is not an event of its own; the receiver merges the clock
    /// of the sender's latest snapshot.
    pub fn send(&self, to: ProcessId) -> Result<()> {
        let mailbox = self
            .endpoint
            .outbound
            .get(to.as_usize())
            .ok_or(DetectionError::UnknownProcess {
                process: to,
                process_count: self.endpoint.outbound.len(),
            })?;

        let message = Message {
            from: self.id(),
            state: self.state.clone(),
            clock: self.clock.clone(),
        };
        mailbox.send(message).map_err(|_| DetectionError::Disconnected {
            from: self.id(),
            to,
        })
    }

    /// Receive event: block for a message from `from`, merge its clock,
    /// combine the states, snapshot
    ///
    /// Must not be the first recorded event of this process.
    pub fn receive(&mut self, from: ProcessId, combine: impl FnOnce(&mut S, S)) -> Result<()> {
        let mailbox = self
            .endpoint
            .inbound
            .get(from.as_usize())
            .ok_or(DetectionError::UnknownProcess {
                process: from,
                process_count: self.endpoint.inbound.len(),
            })?;

        let message = mailbox.recv().map_err(|_| DetectionError::Disconnected {
            from,
            to: self.id(),
        })?;

        self.clock.merge(&message.clock);
        combine(&mut self.state, message.state);
        self.snapshot()
    }

    /// Signal completion to the monitor and return the final state
    pub fn finish(self) -> Result<S> {
        self.monitor.producer_finished(self.id())?;
        Ok(self.state)
    }
}
