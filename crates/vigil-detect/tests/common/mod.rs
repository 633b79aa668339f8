//! Shared fixtures for the integration tests

#![allow(dead_code)]

use proptest::prelude::*;
use vigil_detect::{Event, FrozenLogs, ProcessId, VectorClock};

/// Event owned by `owner` with the given raw clock
pub fn event(owner: usize, clocks: &[u64], state: i64) -> Event<i64> {
    Event::new(state, VectorClock::from_parts(ProcessId(owner), clocks.to_vec()))
}

/// Frozen logs from `(state, clock)` rows per process
pub fn logs(rows: &[&[(i64, &[u64])]]) -> FrozenLogs<i64> {
    FrozenLogs::new(
        rows.iter()
            .enumerate()
            .map(|(p, row)| row.iter().map(|(state, clock)| event(p, clock, *state)).collect())
            .collect(),
    )
}

/// p0: 0 @[1,0], 4 @[2,0], 8 @[3,0]; p1: 0 @[0,1], 5 @[2,2]
///
/// Lattice: (0,0) → (1,0) → {(2,0), (1,1)} → (2,1)
pub fn diamond_logs() -> FrozenLogs<i64> {
    logs(&[
        &[(0, &[1, 0]), (4, &[2, 0]), (8, &[3, 0])],
        &[(0, &[0, 1]), (5, &[2, 2])],
    ])
}

/// Two processes that never communicate, states counting up from zero
pub fn independent_logs(len_i: usize, len_j: usize) -> FrozenLogs<i64> {
    let p0 = (0..len_i).map(|k| event(0, &[k as u64, 0], k as i64)).collect();
    let p1 = (0..len_j).map(|k| event(1, &[0, k as u64], k as i64)).collect();
    FrozenLogs::new(vec![p0, p1])
}

/// One step of a random two-process execution
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// `process` adds `delta` to its variable
    Local { process: usize, delta: i64 },
    /// `from` sends its variable; the other process receives and adds it
    Message { from: usize },
}

pub fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..2usize, -4i64..5).prop_map(|(process, delta)| Step::Local { process, delta }),
        1 => (0..2usize).prop_map(|from| Step::Message { from }),
    ]
}

/// Run `steps` and return the logs, each starting with an all-zero snapshot
pub fn execute(steps: &[Step]) -> FrozenLogs<i64> {
    execute_with(steps, true)
}

/// Run `steps`; without `seeded` a log only holds the events the steps
/// produce, so it may be empty or start with a receive
pub fn execute_with(steps: &[Step], seeded: bool) -> FrozenLogs<i64> {
    let mut clocks = [VectorClock::new(ProcessId(0), 2), VectorClock::new(ProcessId(1), 2)];
    let mut states = [0_i64, 0];
    let mut logs: Vec<Vec<Event<i64>>> = (0..2)
        .map(|p| {
            if seeded {
                vec![Event::new(0, clocks[p].clone())]
            } else {
                Vec::new()
            }
        })
        .collect();

    for step in steps {
        let process = match *step {
            Step::Local { process, delta } => {
                states[process] += delta;
                clocks[process].increment();
                process
            }
            Step::Message { from } => {
                let to = 1 - from;
                let sent = clocks[from].clone();
                clocks[to].merge(&sent);
                states[to] += states[from];
                to
            }
        };
        logs[process].push(Event::new(states[process], clocks[process].clone()));
    }

    FrozenLogs::new(logs)
}
