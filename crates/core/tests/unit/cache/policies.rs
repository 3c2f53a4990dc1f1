//! Cache Replacement Policy Tests.
//!
//! Verifies order tracking and victim selection for LRU, MRU, and FIFO in
//! isolation, plus the shared order table and explanation text.

use pretty_assertions::assert_eq;
use rstest::rstest;

use cachestep_core::cache::policies::{
    self, FifoPolicy, LruPolicy, MruPolicy, OrderTable, ReplacementPolicy,
};
use cachestep_core::config::ReplacementPolicy as PolicyType;

fn touch_all(policy: &mut dyn ReplacementPolicy, set: usize, blocks: &[u64]) {
    for &block in blocks {
        policy.record_access(block, set);
    }
}

// ══════════════════════════════════════════════════════════
// 1. Order table
// ══════════════════════════════════════════════════════════

#[test]
fn order_table_move_and_push() {
    let mut table = OrderTable::new(2);
    table.move_to_tail(0, 1);
    table.move_to_tail(0, 2);
    table.move_to_tail(0, 1);
    assert_eq!(table.get(0), &[2, 1]);

    table.push_if_absent(1, 5);
    table.push_if_absent(1, 6);
    table.push_if_absent(1, 5);
    assert_eq!(table.get(1), &[5, 6]);
    assert_eq!(table.head(1), Some(5));
    assert_eq!(table.tail(1), Some(6));
}

#[test]
fn order_table_out_of_range_is_inert() {
    let mut table = OrderTable::new(1);
    table.move_to_tail(3, 1);
    table.push_if_absent(3, 1);
    assert!(table.get(3).is_empty());
    assert!(!table.remove(3, 1));
    assert_eq!(table.head(3), None);
}

#[test]
fn order_table_restore_checks_set_count() {
    let mut table = OrderTable::new(2);
    table.move_to_tail(0, 4);
    assert!(!table.restore(&vec![vec![1]]));
    assert_eq!(table.get(0), &[4]);
    let state: Vec<Vec<u64>> = vec![vec![], vec![3, 1]];
    assert!(table.restore(&state));
    assert_eq!(table.snapshot(), state);
}

// ══════════════════════════════════════════════════════════
// 2. LRU
// ══════════════════════════════════════════════════════════

#[test]
fn lru_victim_is_least_recent() {
    let mut policy = LruPolicy::new(1);
    touch_all(&mut policy, 0, &[0, 1, 2, 3]);
    assert_eq!(policy.choose_victim(0), Some(0));

    policy.record_access(0, 0);
    assert_eq!(policy.order().get(0), &[1, 2, 3, 0]);
    assert_eq!(policy.choose_victim(0), Some(1));
}

#[test]
fn lru_sets_are_independent() {
    let mut policy = LruPolicy::new(2);
    touch_all(&mut policy, 0, &[0, 2]);
    touch_all(&mut policy, 1, &[3, 1]);
    assert_eq!(policy.choose_victim(0), Some(0));
    assert_eq!(policy.choose_victim(1), Some(3));
}

#[test]
fn empty_set_has_no_victim() {
    assert_eq!(LruPolicy::new(1).choose_victim(0), None);
    assert_eq!(MruPolicy::new(1).choose_victim(0), None);
    assert_eq!(FifoPolicy::new(1).choose_victim(0), None);
}

// ══════════════════════════════════════════════════════════
// 3. MRU
// ══════════════════════════════════════════════════════════

/// MRU evicts the block touched most recently, which on a miss is the block
/// loaded by the previous access.
#[test]
fn mru_victim_is_most_recent() {
    let mut policy = MruPolicy::new(1);
    touch_all(&mut policy, 0, &[0, 1, 2, 3]);
    assert_eq!(policy.choose_victim(0), Some(3));

    policy.record_access(1, 0);
    assert_eq!(policy.choose_victim(0), Some(1));
}

// ══════════════════════════════════════════════════════════
// 4. FIFO
// ══════════════════════════════════════════════════════════

#[test]
fn fifo_hit_does_not_reorder() {
    let mut policy = FifoPolicy::new(1);
    touch_all(&mut policy, 0, &[0, 1, 2, 3]);
    let before = policy.snapshot();
    policy.record_access(0, 0);
    policy.record_access(2, 0);
    assert_eq!(policy.snapshot(), before);
    assert_eq!(policy.choose_victim(0), Some(0));
}

#[test]
fn forget_drops_block_from_order() {
    let mut policy = FifoPolicy::new(1);
    touch_all(&mut policy, 0, &[7, 8, 9]);
    policy.forget(7, 0);
    policy.forget(42, 0);
    assert_eq!(policy.order().get(0), &[8, 9]);
}

// ══════════════════════════════════════════════════════════
// 5. Selection and explanations
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(PolicyType::Lru)]
#[case(PolicyType::Mru)]
#[case(PolicyType::Fifo)]
fn build_selects_requested_policy(#[case] kind: PolicyType) {
    let policy = policies::build(kind, 4);
    assert_eq!(policy.kind(), kind);
    assert_eq!(policy.order().num_sets(), 4);
}

#[test]
fn explain_hit_and_fill() {
    let mut policy = LruPolicy::new(1);
    touch_all(&mut policy, 0, &[0, 1]);
    assert_eq!(
        policy.explain(1, 0, false, None),
        "Access block 1 → Set 0. MISS! Loaded block 1 into available cache slot. Current LRU order: [0, 1]"
    );
    policy.record_access(0, 0);
    assert_eq!(
        policy.explain(0, 0, true, None),
        "Access block 0 → Set 0. HIT! Block 0 found in cache. Updated LRU order. Current LRU order: [1, 0]"
    );
}

#[test]
fn explain_fifo_uses_its_own_wording() {
    let mut policy = FifoPolicy::new(1);
    touch_all(&mut policy, 0, &[1, 2]);
    assert_eq!(
        policy.explain(2, 0, true, None),
        "Access block 2 → Set 0. HIT! Block 2 found in cache. FIFO order unchanged. Current FIFO order: [1, 2]"
    );
    policy.forget(1, 0);
    policy.record_access(3, 0);
    assert_eq!(
        policy.explain(3, 0, false, Some(1)),
        "Access block 3 → Set 0. MISS! Cache full. Removed oldest block 1, loaded block 3. Current FIFO order: [2, 3]"
    );
}

#[test]
fn explain_mru_eviction() {
    let mut policy = MruPolicy::new(1);
    touch_all(&mut policy, 0, &[0, 1, 2, 5]);
    assert_eq!(
        policy.explain(5, 0, false, Some(3)),
        "Access block 5 → Set 0. MISS! Cache full. Removed MRU block 3, loaded block 5. Current MRU order: [0, 1, 2, 5]"
    );
}
