//! Engine-level invariant tests under randomized workloads.
//!
//! Covers:
//! 1. Priority ordering over occupied cells after arbitrary insert sequences
//! 2. Recency tie-break within one priority value
//! 3. Write minimization on relocation-free workloads
//! 4. Failed batches leaving table and bank untouched
//! 5. Convergence of the bank mirror with the logical table

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::engine::TcamEngine;
    use crate::layout::ShiftPolicy;
    use tcam_types::{Entry, EntryId, Priority};

    const CAPACITY: usize = 32;

    fn entry(id: u32, prio: u32) -> Entry {
        Entry::new(EntryId::new(id).expect("nonzero id"), Priority::new(prio))
    }

    /// Occupied cells must carry ascending priority values by index.
    fn assert_ordered(engine: &TcamEngine) {
        let dump = engine.dump();
        for pair in dump.windows(2) {
            assert!(
                pair[0].index < pair[1].index,
                "dump indices not ascending: {} then {}",
                pair[0].index,
                pair[1].index
            );
            assert!(
                pair[0].priority <= pair[1].priority,
                "priority order violated at index {}: {} then {}",
                pair[1].index,
                pair[0].priority,
                pair[1].priority
            );
        }
    }

    /// Every bank cell must equal the logical table: occupied slots match
    /// id and priority, everything else is the zeroed sentinel.
    fn assert_mirror_converged(engine: &TcamEngine) {
        let mut logical = vec![None; engine.capacity()];
        for slot in engine.dump() {
            logical[slot.index] = Some((slot.id, slot.priority));
        }
        for (position, expected) in logical.iter().enumerate() {
            let cell = engine.bank().cell(position).expect("position within bank");
            match expected {
                Some((id, prio)) => {
                    assert_eq!(cell.id, *id, "bank cell {position} id diverged");
                    assert_eq!(cell.prio, *prio, "bank cell {position} priority diverged");
                }
                None => assert!(cell.is_empty(), "bank cell {position} should be empty"),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_sequential_inserts_stay_ordered(
            prios in prop::collection::vec(0_u32..50, 1..24),
        ) {
            let mut engine = TcamEngine::new(CAPACITY).unwrap();
            for (index, prio) in prios.iter().enumerate() {
                let id = u32::try_from(index).unwrap() + 1;
                engine.insert(&[entry(id, *prio)]).unwrap();
            }
            prop_assert_eq!(engine.occupied(), prios.len());
            assert_ordered(&engine);
            assert_mirror_converged(&engine);
        }

        #[test]
        fn prop_one_batch_matches_order_invariant(
            prios in prop::collection::vec(0_u32..50, 1..24),
        ) {
            let batch: Vec<Entry> = prios
                .iter()
                .enumerate()
                .map(|(index, prio)| entry(u32::try_from(index).unwrap() + 1, *prio))
                .collect();
            let mut engine = TcamEngine::new(CAPACITY).unwrap();
            engine.insert(&batch).unwrap();
            prop_assert_eq!(engine.occupied(), batch.len());
            assert_ordered(&engine);
            assert_mirror_converged(&engine);
        }

        #[test]
        fn prop_equal_priority_orders_newest_first(
            count in 2_usize..12,
            prio in 0_u32..1000,
        ) {
            let mut engine = TcamEngine::new(CAPACITY).unwrap();
            for raw in 1..=count {
                engine.insert(&[entry(u32::try_from(raw).unwrap(), prio)]).unwrap();
            }
            let ids: Vec<u32> = engine.dump().into_iter().map(|slot| slot.id).collect();
            let newest_first: Vec<u32> =
                (1..=u32::try_from(count).unwrap()).rev().collect();
            prop_assert_eq!(ids, newest_first);
            assert_mirror_converged(&engine);
        }

        #[test]
        fn prop_ascending_appends_cost_one_write_each(
            count in 1_usize..24,
        ) {
            let mut engine = TcamEngine::new(CAPACITY).unwrap();
            for raw in 1..=count {
                let raw = u32::try_from(raw).unwrap();
                let outcome = engine.insert(&[entry(raw, raw * 10)]).unwrap();
                prop_assert_eq!(outcome.device_writes, 1);
                prop_assert_eq!(outcome.shift_policy, ShiftPolicy::None);
            }
            prop_assert_eq!(engine.access_count(), count as u64);
            assert_ordered(&engine);
        }

        #[test]
        fn prop_removes_cost_one_write_and_preserve_order(
            workload in prop::collection::vec((0_u32..50, any::<bool>()), 1..24),
        ) {
            let mut engine = TcamEngine::new(CAPACITY).unwrap();
            let batch: Vec<Entry> = workload
                .iter()
                .enumerate()
                .map(|(index, (prio, _))| entry(u32::try_from(index).unwrap() + 1, *prio))
                .collect();
            engine.insert(&batch).unwrap();

            let mut remaining = workload.len();
            for (index, (_, remove)) in workload.iter().enumerate() {
                if !remove {
                    continue;
                }
                let id = EntryId::new(u32::try_from(index).unwrap() + 1).unwrap();
                let before = engine.access_count();
                engine.remove(id).unwrap();
                prop_assert_eq!(engine.access_count() - before, 1);
                remaining -= 1;
            }
            prop_assert_eq!(engine.occupied(), remaining);
            assert_ordered(&engine);
            assert_mirror_converged(&engine);
        }

        #[test]
        fn prop_overfull_batch_leaves_state_untouched(
            prios in prop::collection::vec(0_u32..50, 6..12),
        ) {
            // Capacity 8 with 5 cells filled: any batch larger than 3 must
            // bounce without a trace.
            let mut engine = TcamEngine::new(8).unwrap();
            engine
                .insert(&[
                    entry(101, 10),
                    entry(102, 20),
                    entry(103, 30),
                    entry(104, 40),
                    entry(105, 50),
                ])
                .unwrap();
            let dump_before = engine.dump();
            let writes_before = engine.access_count();

            let batch: Vec<Entry> = prios
                .iter()
                .enumerate()
                .map(|(index, prio)| entry(u32::try_from(index).unwrap() + 1, *prio))
                .collect();
            let err = engine.insert(&batch).unwrap_err();
            prop_assert!(
                matches!(err, tcam_error::TcamError::CapacityExceeded { .. }),
                "unexpected error: {:?}",
                err
            );
            prop_assert_eq!(engine.occupied(), 5);
            prop_assert_eq!(engine.dump(), dump_before);
            prop_assert_eq!(engine.access_count(), writes_before);
        }

        #[test]
        fn prop_interleaved_inserts_and_removes_converge(
            ops in prop::collection::vec((0_u32..40, any::<bool>()), 1..40),
        ) {
            let mut engine = TcamEngine::new(16).unwrap();
            let mut next_id = 1_u32;
            let mut live: Vec<u32> = Vec::new();

            for (prio, is_insert) in ops {
                if is_insert && engine.occupied() < engine.capacity() {
                    engine.insert(&[entry(next_id, prio)]).unwrap();
                    live.push(next_id);
                    next_id += 1;
                } else if let Some(victim) = live.pop() {
                    engine.remove(EntryId::new(victim).unwrap()).unwrap();
                }
                assert_ordered(&engine);
                assert_mirror_converged(&engine);
            }
            prop_assert_eq!(engine.occupied(), live.len());
        }
    }
}
