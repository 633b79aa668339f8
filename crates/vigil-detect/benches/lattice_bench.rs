//! Lattice Benchmark Suite
//!
//! # Scenarios
//!
//! 1. **Independent processes**: full grid, worst case for lattice size
//! 2. **Message ping-pong**: chain-like lattice, best case
//! 3. **Classification**: early absorption vs. full false sub-lattice walk

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vigil_detect::{
    Cut, Event, FnPredicate, FrozenLogs, LatticeBuilder, PredicateClassifier, ProcessId, ProcessPair, VectorClock,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn pair() -> ProcessPair {
    ProcessPair::new(ProcessId(0), ProcessId(1))
}

/// Two processes with `n` local events each and no messages
fn independent(n: usize) -> FrozenLogs<i64> {
    let log = |p: usize| {
        let mut clock = VectorClock::new(ProcessId(p), 2);
        let mut events = vec![Event::new(0, clock.clone())];
        for k in 1..n {
            clock.increment();
            events.push(Event::new(k as i64, clock.clone()));
        }
        events
    };
    FrozenLogs::new(vec![log(0), log(1)])
}

/// Two processes exchanging a message after every local step
fn ping_pong(rounds: usize) -> FrozenLogs<i64> {
    let mut clocks = [VectorClock::new(ProcessId(0), 2), VectorClock::new(ProcessId(1), 2)];
    let mut logs: Vec<Vec<Event<i64>>> = (0..2).map(|p| vec![Event::new(0, clocks[p].clone())]).collect();

    for round in 0..rounds {
        let (from, to) = (round % 2, 1 - round % 2);
        clocks[from].increment();
        logs[from].push(Event::new(round as i64, clocks[from].clone()));

        let sent = clocks[from].clone();
        clocks[to].merge(&sent);
        logs[to].push(Event::new(round as i64, clocks[to].clone()));
    }
    FrozenLogs::new(logs)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_build_independent(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_independent");
    for n in [8, 32, 128] {
        let logs = independent(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &logs, |b, logs| {
            b.iter(|| {
                let builder = LatticeBuilder::new(logs, pair()).unwrap();
                black_box(builder.reachable_from(Cut::initial()).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_build_ping_pong(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_ping_pong");
    for rounds in [16, 256, 1024] {
        let logs = ping_pong(rounds);
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &logs, |b, logs| {
            b.iter(|| {
                let builder = LatticeBuilder::new(logs, pair()).unwrap();
                black_box(builder.reachable_from(Cut::initial()).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let logs = independent(64);
    let builder = LatticeBuilder::new(&logs, pair()).unwrap();
    let lattice = builder.reachable_from(Cut::initial()).unwrap();
    let classifier = PredicateClassifier::new(&builder);

    let early = FnPredicate::new("a + b == 2", |a: &i64, b: &i64| a + b == 2);
    let never = FnPredicate::new("never", |_: &i64, _: &i64| false);

    let mut group = c.benchmark_group("classify_64x64");
    group.bench_function("early_absorption", |b| {
        b.iter(|| black_box(classifier.classify(&early, &lattice).unwrap()))
    });
    group.bench_function("full_walk", |b| {
        b.iter(|| black_box(classifier.classify(&never, &lattice).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_build_independent, bench_build_ping_pong, bench_classify);
criterion_main!(benches);
