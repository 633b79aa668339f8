//! Kani Proofs for VectorClock
//!
//! Bounded to two processes with symbolic component values.

#[cfg(kani)]
mod kani_proofs {
    use super::super::VectorClock;
    use crate::domain::log::ProcessId;

    fn any_clock(owner: usize) -> VectorClock {
        let a: u64 = kani::any();
        let b: u64 = kani::any();
        kani::assume(a < 16 && b < 16);
        VectorClock::from_parts(ProcessId(owner), vec![a, b])
    }

    /// Consistency does not depend on which event is "this"
    #[kani::proof]
    #[kani::unwind(4)]
    fn proof_consistency_symmetric() {
        let a = any_clock(0);
        let b = any_clock(1);
        assert_eq!(
            a.consistent(ProcessId(1), &b),
            b.consistent(ProcessId(0), &a)
        );
    }

    /// Merge never decreases a component and always advances the owner
    #[kani::proof]
    #[kani::unwind(4)]
    fn proof_merge_monotonic() {
        let mut receiver = any_clock(1);
        let sender = any_clock(0);
        let before = receiver.clone();

        receiver.merge(&sender);

        assert!(receiver.get(ProcessId(0)) >= before.get(ProcessId(0)));
        assert!(receiver.own() > before.own());
    }
}
