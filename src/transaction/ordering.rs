//! The ordering engine for the transaction list.
//!
//! Display order is a total order over numeric keys, descending. New
//! transactions take the current timestamp as their key so the latest entry
//! sorts first; a manual drag rewrites every key from a single base
//! timestamp so the whole batch stays internally consistent.

use time::OffsetDateTime;

use crate::database_id::TransactionId;

/// The spacing between consecutive order keys in a reorder batch.
///
/// Large enough that timestamp-level jitter from subsequent single inserts
/// cannot collide with keys handed out within the same batch.
pub const ORDER_KEY_GAP: i64 = 1000;

/// The current time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    let now = OffsetDateTime::now_utc();
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}

/// The order key for a newly created transaction.
///
/// Uses the current timestamp, which sorts after every key handed out
/// earlier, so the new entry appears at the top of a descending sort.
pub fn initial_order_key() -> i64 {
    now_ms()
}

/// Compute fresh order keys for a manually reordered sequence.
///
/// `sequence` lists transaction IDs in the desired display order, index 0 on
/// top. The base timestamp is captured once for the whole batch; key `i` is
/// `base - i * ORDER_KEY_GAP`, so the keys strictly decrease and a
/// descending sort reproduces `sequence` exactly.
pub fn recompute_order(sequence: &[TransactionId]) -> Vec<(TransactionId, i64)> {
    let base_timestamp = now_ms();

    sequence
        .iter()
        .enumerate()
        .map(|(index, &id)| (id, base_timestamp - index as i64 * ORDER_KEY_GAP))
        .collect()
}

/// Whether a submitted sequence leaves the current order unchanged.
///
/// A no-op move (drop position equals pickup position) must short-circuit
/// before the store is invoked, so callers check this first.
pub fn is_noop_reorder(current: &[TransactionId], submitted: &[TransactionId]) -> bool {
    current == submitted
}

#[cfg(test)]
mod ordering_tests {
    use crate::transaction::ordering::{
        ORDER_KEY_GAP, initial_order_key, is_noop_reorder, now_ms, recompute_order,
    };

    #[test]
    fn recomputed_keys_strictly_decrease_by_the_gap() {
        let sequence = [7, 3, 5, 1];

        let keyed = recompute_order(&sequence);

        assert_eq!(keyed.len(), sequence.len());
        for pair in keyed.windows(2) {
            assert_eq!(
                pair[0].1 - pair[1].1,
                ORDER_KEY_GAP,
                "want consecutive keys to differ by the gap, got {pair:?}"
            );
        }
    }

    #[test]
    fn descending_sort_of_recomputed_keys_reproduces_the_sequence() {
        let sequence = [4, 9, 2, 8, 6];

        let mut keyed = recompute_order(&sequence);
        keyed.sort_by(|a, b| b.1.cmp(&a.1));

        let sorted_ids: Vec<i64> = keyed.iter().map(|(id, _)| *id).collect();
        assert_eq!(sorted_ids, sequence);
    }

    #[test]
    fn batch_shares_a_single_base_timestamp() {
        let keyed = recompute_order(&[1, 2, 3]);

        let base = keyed[0].1;
        for (index, (_, key)) in keyed.iter().enumerate() {
            assert_eq!(*key, base - index as i64 * ORDER_KEY_GAP);
        }
    }

    #[test]
    fn empty_and_single_item_sequences_are_trivial() {
        assert!(recompute_order(&[]).is_empty());

        let keyed = recompute_order(&[42]);
        assert_eq!(keyed.len(), 1);
        assert_eq!(keyed[0].0, 42);
    }

    #[test]
    fn initial_key_is_the_current_timestamp() {
        let before = now_ms();
        let key = initial_order_key();
        let after = now_ms();

        assert!(
            before <= key && key <= after,
            "want key in [{before}, {after}], got {key}"
        );
    }

    #[test]
    fn noop_reorder_is_detected() {
        assert!(is_noop_reorder(&[1, 2, 3], &[1, 2, 3]));
        assert!(!is_noop_reorder(&[1, 2, 3], &[2, 1, 3]));
        assert!(!is_noop_reorder(&[1, 2, 3], &[1, 2]));
        assert!(is_noop_reorder(&[], &[]));
    }
}
