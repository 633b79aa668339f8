//! Three-process message-passing demo
//!
//! ```text
//! p0: x=5 ──send──▶ p1        p0: x+=9 ──send──▶ p2
//! p2: x=4, x*=2, recv(p0): x=m-x, x-=2, x+=11 ──send──▶ p0
//! p0: recv(p2): x-=m, x+=1
//! p1: x=3, recv(p0): x+=m, x*=2, x-=9
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vigil_detect::{standard_library, Monitor, MonitorConfig, Network, ProcessId, SimProcess};

const P0: ProcessId = ProcessId(0);
const P1: ProcessId = ProcessId(1);
const P2: ProcessId = ProcessId(2);

/// Predicates 0-2 on (p0, p1), predicate 3 on (p0, p2)
pub fn config(parallel: bool) -> vigil_detect::Result<MonitorConfig> {
    MonitorConfig::builder()
        .process_count(3)
        .combination(0, 0, 1)
        .combination(1, 0, 1)
        .combination(2, 0, 1)
        .combination(3, 0, 2)
        .parallel(parallel)
        .build()
}

/// Spawn the three producers and return the monitor once they are running
///
/// `delay` is slept between steps; it changes thread interleaving but not
/// the causal structure, so verdicts do not depend on it.
pub fn spawn(
    parallel: bool,
    delay: Duration,
) -> anyhow::Result<(Arc<Monitor<i64>>, Vec<thread::JoinHandle<vigil_detect::Result<i64>>>)> {
    let monitor = Arc::new(Monitor::new(config(parallel)?, standard_library())?);
    let mut network = Network::new(3);

    let mut endpoint = |p| network.take(p).ok_or_else(|| anyhow::anyhow!("endpoint {p} unavailable"));
    let (e0, e1, e2) = (endpoint(P0)?, endpoint(P1)?, endpoint(P2)?);

    let pause = move || {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    };

    let p0 = {
        let monitor = Arc::clone(&monitor);
        thread::spawn(move || {
            let mut p = SimProcess::new(monitor, e0, 0);
            p.snapshot()?;
            p.local(|x| *x = 5)?;
            p.send(P1)?;
            pause();
            p.local(|x| *x += 9)?;
            p.send(P2)?;
            pause();
            p.receive(P2, |x, m| *x -= m)?;
            p.local(|x| *x += 1)?;
            p.finish()
        })
    };

    let p1 = {
        let monitor = Arc::clone(&monitor);
        thread::spawn(move || {
            let mut p = SimProcess::new(monitor, e1, 0);
            p.snapshot()?;
            p.local(|x| *x = 3)?;
            pause();
            p.receive(P0, |x, m| *x += m)?;
            p.local(|x| *x *= 2)?;
            pause();
            p.local(|x| *x -= 9)?;
            p.finish()
        })
    };

    let p2 = {
        let monitor = Arc::clone(&monitor);
        thread::spawn(move || {
            let mut p = SimProcess::new(monitor, e2, 0);
            p.snapshot()?;
            p.local(|x| *x = 4)?;
            p.local(|x| *x *= 2)?;
            pause();
            p.receive(P0, |x, m| *x = m - *x)?;
            p.local(|x| *x -= 2)?;
            p.local(|x| *x += 11)?;
            p.send(P0)?;
            p.finish()
        })
    };

    Ok((monitor, vec![p0, p1, p2]))
}
