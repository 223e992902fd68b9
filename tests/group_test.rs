//! Tests for ModificationGroup: derived aggregates, membership, hierarchy
//! edges and level bookkeeping

use std::sync::Arc;

use modtree::util::testing;
use modtree::{
    DiscountedCost, Modification, ModificationGroup, ModificationKind, DETACHED_LEVEL,
};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn costed(name: &str, priority: i32, cost: i64, kind: ModificationKind) -> Arc<Modification> {
    Modification::new(name, priority, cost, kind)
}

// ============================================================
// Aggregate Tests
// ============================================================

#[test]
fn given_members_when_constructed_then_cost_and_priority_are_sums() {
    let a = costed("A", 10, 100, ModificationKind::Add); // 100
    let b = costed("B", 20, 50, ModificationKind::Modify); // 150
    let c = costed("C", 5, 30, ModificationKind::Remove); // -30
    let group = ModificationGroup::new("Sums", [a, b, c]);

    assert_eq!(group.cost(), 220);
    assert_eq!(group.priority_value(), 35);
    assert_eq!(group.member_count(), 3);
}

#[test]
fn given_membership_mutation_when_adding_and_removing_then_aggregates_resum() {
    let a = costed("A", 10, 100, ModificationKind::Add);
    let b = costed("B", 20, 50, ModificationKind::Modify);
    let group = ModificationGroup::new("Resum", [a.clone()]);

    assert_eq!(group.cost(), 100);
    group.add_modifications([b.clone()]);
    assert_eq!(group.cost(), 250);
    assert_eq!(group.priority_value(), 30);

    assert!(group.remove_modification(&a));
    assert_eq!(group.cost(), 150);
    assert_eq!(group.priority_value(), 20);
}

#[test]
fn given_discounted_group_when_aggregating_then_policy_applies() {
    let a = costed("A", 1, 100, ModificationKind::Add); // 100
    let b = costed("B", 1, 50, ModificationKind::Add); // 50
    let group = ModificationGroup::with_policy("Rebated", [a, b], Arc::new(DiscountedCost));

    assert_eq!(group.cost(), 135, "10% rebate over the member sum");
}

// ============================================================
// Membership Tests
// ============================================================

#[test]
fn given_modification_when_added_then_owner_is_reparented() {
    let a = costed("A", 1, 1, ModificationKind::Add);
    let first = ModificationGroup::new("First", [a.clone()]);
    assert_eq!(a.owner().map(|g| g.id()), Some(first.id()));

    let second = ModificationGroup::new("Second", []);
    second.add_modifications([a.clone()]);
    assert_eq!(a.owner().map(|g| g.id()), Some(second.id()));
}

#[test]
fn given_modification_when_removed_then_owner_is_cleared() {
    let a = costed("A", 1, 1, ModificationKind::Add);
    let group = ModificationGroup::new("Owner", [a.clone()]);

    assert!(group.remove_modification(&a));
    assert!(a.owner().is_none());
    assert!(!group.remove_modification(&a), "second removal is a no-op");
}

#[test]
fn given_duplicate_member_when_added_then_set_semantics_hold() {
    let a = costed("A", 1, 10, ModificationKind::Add);
    let group = ModificationGroup::new("Set", [a.clone(), a.clone()]);

    assert_eq!(group.member_count(), 1);
    assert_eq!(group.cost(), 10);
}

#[test]
fn given_members_when_listed_then_ordered_by_id() {
    let a = costed("Z", 1, 1, ModificationKind::Add);
    let b = costed("A", 1, 1, ModificationKind::Add);
    let group = ModificationGroup::new("Ordered", [b.clone(), a.clone()]);

    let ids: Vec<u64> = group.members().iter().map(|m| m.id()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

// ============================================================
// Hierarchy Edge Tests
// ============================================================

#[test]
fn given_child_when_attached_then_levelled_one_below_parent() {
    let parent = ModificationGroup::new("Parent", []);
    let child = ModificationGroup::new("Child", []);

    assert_eq!(parent.level(), DETACHED_LEVEL);
    assert!(parent.add_child(&child));
    assert_eq!(child.level(), parent.level() + 1);
    assert!(parent.contains_child(&child));
}

#[test]
fn given_existing_child_when_attached_again_then_edge_is_deduped() {
    let parent = ModificationGroup::new("Parent", []);
    let child = ModificationGroup::new("Child", []);

    assert!(parent.add_child(&child));
    assert!(!parent.add_child(&child));
    assert_eq!(parent.children().len(), 1);
}

#[test]
fn given_cycle_closing_edge_when_attached_then_refused() {
    let a = ModificationGroup::new("A", []);
    let b = ModificationGroup::new("B", []);
    let c = ModificationGroup::new("C", []);

    assert!(a.add_child(&b));
    assert!(b.add_child(&c));
    assert!(!c.add_child(&a), "would close a hierarchy cycle");
    assert!(!a.add_child(&a), "self edge refused");
}

#[test]
fn given_child_when_detached_then_its_subtree_is_untouched() {
    let parent = ModificationGroup::new("Parent", []);
    let child = ModificationGroup::new("Child", []);
    let grandchild = ModificationGroup::new("Grandchild", []);

    parent.add_child(&child);
    child.add_child(&grandchild);

    assert!(parent.remove_child(&child));
    assert!(!parent.contains_child(&child));
    assert!(child.contains_child(&grandchild));
    assert!(!parent.remove_child(&child), "second detach is a no-op");
}

// ============================================================
// Level Bookkeeping Tests
// ============================================================

#[test]
fn given_equal_level_when_set_then_signals_unchanged() {
    let group = ModificationGroup::new("Still", []);
    assert!(!group.set_level(DETACHED_LEVEL));
    assert!(group.set_level(0));
    assert!(!group.set_level(0));
}

#[test]
fn given_new_level_when_set_then_descendants_shift_by_same_delta() {
    let root = ModificationGroup::new("Root", []);
    let child_a = ModificationGroup::new("ChildA", []);
    let child_b = ModificationGroup::new("ChildB", []);
    let grandchild = ModificationGroup::new("Grandchild", []);

    root.add_child(&child_a);
    root.add_child(&child_b);
    child_a.add_child(&grandchild);

    assert_eq!(root.level(), -1);
    assert_eq!(child_a.level(), 0);
    assert_eq!(grandchild.level(), 1);

    root.set_level(5);

    assert_eq!(root.level(), 5);
    assert_eq!(child_a.level(), 6);
    assert_eq!(child_b.level(), 6);
    assert_eq!(grandchild.level(), 7, "each descendant shifts exactly once");
}
