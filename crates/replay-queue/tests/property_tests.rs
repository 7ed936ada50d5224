//! Property-based tests for the bounded queue's FIFO, capacity, and spill-safety
//! guarantees (`SPEC_FULL.md` §8, invariants 3 and 6), in the style of the teacher's
//! `ringmpsc/tests/property_tests.rs`.

use proptest::prelude::*;
use replay_queue::{read_spill_file, PutOutcome, Queue, QueueConfig};
use std::time::Duration;

proptest! {
    /// Invariant 3 (no duplicate/skip within the accepted stream): a run of `put`s that all
    /// fit within capacity come back out of `get` in exactly the order they went in.
    #[test]
    fn prop_fifo_order_preserved_for_accepted_items(values in prop::collection::vec(any::<u64>(), 0..64)) {
        let dir = tempfile::tempdir().unwrap();
        let queue = Queue::<u64>::new(QueueConfig::new(values.len().max(1), dir.path())).unwrap();

        for &v in &values {
            let outcome = queue.put(v, Duration::from_millis(50));
            prop_assert_eq!(outcome, PutOutcome::Accepted);
        }

        for &expected in &values {
            let got = queue.get(Duration::from_millis(50));
            prop_assert_eq!(got, Some(expected));
        }
        prop_assert_eq!(queue.get(Duration::from_millis(10)), None);
    }

    /// The in-memory queue never reports a depth above the configured capacity, regardless
    /// of how many items are offered to it.
    #[test]
    fn prop_qsize_never_exceeds_capacity(
        capacity in 1usize..16,
        offered in 0usize..64,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let queue = Queue::<u64>::new(QueueConfig::new(capacity, dir.path())).unwrap();

        for i in 0..offered {
            queue.put(i as u64, Duration::from_millis(1));
            prop_assert!(queue.qsize() <= capacity,
                "qsize {} exceeded capacity {}", queue.qsize(), capacity);
        }
    }

    /// Invariant 6 (spill safety): whenever `put` reports `Spilled`, a spill file exists
    /// under the spill directory whose content decodes back to exactly the spilled value.
    #[test]
    fn prop_spilled_items_are_recoverable_from_disk(values in prop::collection::vec(any::<u64>(), 1..32)) {
        let dir = tempfile::tempdir().unwrap();
        let spill_dir = dir.path().join("spill");
        // Capacity 1 and a zero wait so every `put` beyond the first is forced to spill.
        let queue = Queue::<u64>::new(QueueConfig::new(1, &spill_dir)).unwrap();

        let mut spilled = Vec::new();
        for &v in &values {
            if queue.put(v, Duration::from_millis(0)) == PutOutcome::Spilled {
                spilled.push(v);
            }
        }

        let mut entries: Vec<_> = std::fs::read_dir(&spill_dir).unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        prop_assert_eq!(entries.len(), spilled.len());

        let mut decoded: Vec<u64> = entries.iter()
            .map(|path| read_spill_file::<u64>(path).unwrap())
            .collect();
        decoded.sort_unstable();
        let mut expected = spilled.clone();
        expected.sort_unstable();
        prop_assert_eq!(decoded, expected);
    }
}
