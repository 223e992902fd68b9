//! Tests for ModificationTree: dual-edge insertion, removal with
//! successor promotion, search, traversal and counters

use std::sync::Arc;

use modtree::util::testing;
use modtree::{
    DomainError, Modification, ModificationGroup, ModificationKind, ModificationTree, OrderBy,
    Traversal,
};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn leaf(name: &str, priority: i32, cost: i64) -> Arc<Modification> {
    Modification::new(name, priority, cost, ModificationKind::Add)
}

fn group(name: &str, priority: i32, cost: i64) -> Arc<ModificationGroup> {
    ModificationGroup::new(name, [leaf(&format!("{name} leaf"), priority, cost)])
}

/// Seven organizational groups inserted into a byName tree.
///
/// Resulting shape (names compare lexicographically):
///
/// Global modifications
/// ├── Europe (L)
/// │   └── District I. (L)
/// │       └── Budapest (L)
/// └── Hungary (R)
///     └── Office (R)
///         └── Test (R)
fn sample_tree() -> (ModificationTree, Vec<Arc<ModificationGroup>>) {
    let groups = vec![
        group("Global modifications", 10, 100),
        group("Europe", 20, 200),
        group("District I.", 30, 300),
        group("Hungary", 40, 400),
        group("Budapest", 50, 500),
        group("Office", 60, 600),
        group("Test", 70, 700),
    ];
    let tree = ModificationTree::new(OrderBy::Name);
    for g in &groups {
        tree.insert(g).expect("unique groups insert cleanly");
    }
    (tree, groups)
}

// ============================================================
// Insertion Tests
// ============================================================

#[test]
fn given_empty_tree_when_inserting_then_group_becomes_root_at_level_zero() {
    let tree = ModificationTree::new(OrderBy::Priority);
    let root = group("Root", 1, 1);

    tree.insert(&root).unwrap();

    assert_eq!(tree.element_count(), 1);
    assert_eq!(tree.level_count(), 0, "root-only tree has 0 levels");
    assert_eq!(root.level(), 0);
    assert_eq!(tree.find_group(&root).unwrap().group.id(), root.id());
}

#[test]
fn given_unique_inserts_when_searching_then_each_found_at_recorded_level() {
    let groups = vec![
        group("Global modifications", 10, 100),
        group("Europe", 20, 200),
        group("District I.", 30, 300),
        group("Hungary", 40, 400),
        group("Budapest", 50, 500),
        group("Office", 60, 600),
        group("Test", 70, 700),
    ];
    let tree = ModificationTree::new(OrderBy::Name);

    for g in &groups {
        tree.insert(g).unwrap();
        let recorded = g.level();
        assert_eq!(tree.find_group(g).unwrap().group.id(), g.id());
        assert_eq!(tree.level_of(g), recorded);
    }
}

#[test]
fn given_sample_tree_when_inserted_then_levels_and_hierarchy_edges_match() {
    let (tree, groups) = sample_tree();
    let [global, europe, district, hungary, budapest, office, test] =
        <[_; 7]>::try_from(groups).unwrap();

    assert_eq!(tree.element_count(), 7);
    assert_eq!(tree.level_count(), 4);

    assert_eq!(tree.level_of(&global), 0);
    assert_eq!(tree.level_of(&europe), 1);
    assert_eq!(tree.level_of(&hungary), 1);
    assert_eq!(tree.level_of(&district), 2);
    assert_eq!(tree.level_of(&office), 2);
    assert_eq!(tree.level_of(&budapest), 3);
    assert_eq!(tree.level_of(&test), 3);

    assert!(global.contains_child(&europe));
    assert!(global.contains_child(&hungary));
    assert!(europe.contains_child(&district));
    assert!(district.contains_child(&budapest));
    assert!(hungary.contains_child(&office));
    assert!(office.contains_child(&test));
}

#[test]
fn given_present_group_when_reinserting_then_fails_duplicate_with_no_mutation() {
    let (tree, groups) = sample_tree();

    let err = tree.insert(&groups[2]).unwrap_err();
    assert!(matches!(err, DomainError::DuplicateGroup(_)), "{err}");
    assert_eq!(tree.element_count(), 7);
    assert_eq!(tree.level_count(), 4);
}

#[test]
fn given_equal_key_when_inserting_then_fails_duplicate() {
    let (tree, _groups) = sample_tree();
    let shadow = group("Europe", 99, 999);

    let err = tree.insert(&shadow).unwrap_err();
    assert!(matches!(err, DomainError::DuplicateGroup(_)), "{err}");
    assert_eq!(tree.element_count(), 7);
}

#[test]
fn given_insertion_order_when_searching_then_node_sequence_records_it() {
    let (tree, groups) = sample_tree();

    assert_eq!(tree.find_group(&groups[0]).unwrap().seq, 1);
    assert_eq!(tree.find_group(&groups[6]).unwrap().seq, 7);
}

// ============================================================
// Path Tests
// ============================================================

#[test]
fn given_sample_tree_when_asking_path_then_ancestor_names_joined() {
    let (tree, groups) = sample_tree();

    assert_eq!(
        tree.path_of(&groups[2]),
        "Global modifications / Europe / District I."
    );
    assert_eq!(
        tree.path_of(&groups[4]),
        "Global modifications / Europe / District I. / Budapest"
    );
    assert_eq!(tree.path_of(&groups[0]), "Global modifications");
}

#[test]
fn given_absent_group_when_asking_path_then_empty_string() {
    let (tree, _groups) = sample_tree();
    let stranger = group("Atlantis", 1, 1);

    assert_eq!(tree.path_of(&stranger), "");
}

#[test]
fn given_chain_of_regions_when_inserted_then_path_reads_root_to_target() {
    // Descending aggregate priorities force a pure left chain.
    let global = group("Global", 100, 1);
    let europe = group("Europe", 50, 1);
    let hungary = group("Hungary", 30, 1);
    let budapest = group("Budapest", 10, 1);

    let tree = ModificationTree::new(OrderBy::Priority);
    for g in [&global, &europe, &hungary, &budapest] {
        tree.insert(g).unwrap();
    }

    assert_eq!(tree.path_of(&budapest), "Global / Europe / Hungary / Budapest");
    assert_eq!(tree.level_of(&budapest), 3);
    assert_eq!(tree.level_count(), 4);
}

// ============================================================
// Removal Tests
// ============================================================

#[test]
fn given_leaf_group_when_removed_then_both_edge_sets_rebound() {
    let (tree, groups) = sample_tree();
    let office = &groups[5];
    let test = &groups[6];

    assert!(tree.remove_group(test));

    assert!(!tree.contains(test));
    assert!(!office.contains_child(test));
    assert_eq!(test.level(), -1);
    assert_eq!(tree.element_count(), 6);
    assert_eq!(tree.level_count(), 4, "Budapest still sits at depth 3");
}

#[test]
fn given_interior_group_when_removed_then_subtree_promoted_and_siblings_untouched() {
    let (tree, groups) = sample_tree();
    let global = &groups[0];
    let europe = &groups[1];
    let district = &groups[2];
    let hungary = &groups[3];
    let office = &groups[5];

    assert!(tree.remove_group(europe));

    assert!(!tree.contains(europe));
    assert!(!global.contains_child(europe));
    assert_eq!(europe.level(), -1);
    assert!(europe.children().is_empty(), "removed node is fully unlinked");

    // unrelated positions unaffected
    assert!(tree.contains(district));
    assert!(global.contains_child(hungary));
    assert!(hungary.contains_child(office));
    assert_eq!(tree.level_of(hungary), 1);

    assert_eq!(tree.element_count(), 6);
    assert_eq!(tree.level_count(), 4);
}

#[test]
fn given_two_children_when_removing_then_in_order_successor_is_promoted() {
    let (tree, groups) = sample_tree();
    let global = &groups[0];
    let hungary = &groups[3];

    // root holds Europe on the left, Hungary on the right; the in-order
    // successor of the root is Hungary
    assert!(tree.remove_group(global));

    assert!(tree.find_group(global).is_err());
    let promoted = tree.find_group(hungary).unwrap();
    assert_eq!(promoted.seq, 1, "successor group moved into the root node");
    assert_eq!(tree.element_count(), 6);

    let names: Vec<String> = tree
        .traverse(Traversal::InOrder)
        .iter()
        .map(|g| g.name().to_string())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted, "in-order stays sorted after promotion");
}

#[test]
fn given_absent_group_when_removed_then_false_without_error() {
    let (tree, _groups) = sample_tree();
    let stranger = group("Atlantis", 1, 1);

    assert!(!tree.remove_group(&stranger));
    assert_eq!(tree.element_count(), 7);

    let empty = ModificationTree::new(OrderBy::Name);
    assert!(!empty.remove_group(&stranger));
}

#[test]
fn given_only_root_when_removed_then_tree_is_empty_again() {
    let tree = ModificationTree::new(OrderBy::Name);
    let root = group("Solo", 1, 1);
    tree.insert(&root).unwrap();

    assert!(tree.remove_group(&root));
    assert_eq!(tree.element_count(), 0);
    assert_eq!(tree.level_count(), -1, "empty tree reports -1 levels");
    assert_eq!(tree.level_of(&root), -1);
}

#[test]
fn given_removed_group_when_reinserted_then_attaches_at_fresh_position() {
    let (tree, groups) = sample_tree();
    let europe = &groups[1];

    assert!(tree.remove_group(europe));
    tree.insert(europe).unwrap();

    assert_eq!(tree.element_count(), 7);
    assert!(tree.contains(europe));
    assert!(tree.level_of(europe) > 0);
}

// ============================================================
// Search Tests
// ============================================================

#[test]
fn given_never_inserted_group_when_asking_level_then_minus_one() {
    let (tree, _groups) = sample_tree();
    let stranger = group("Atlantis", 1, 1);

    assert_eq!(tree.level_of(&stranger), -1);
}

#[test]
fn given_empty_tree_when_searching_then_empty_tree_error() {
    let tree = ModificationTree::new(OrderBy::Name);
    let stranger = group("Atlantis", 1, 1);

    assert!(matches!(
        tree.find_group(&stranger),
        Err(DomainError::EmptyTree)
    ));
    assert_eq!(tree.level_of(&stranger), -1);
}

#[test]
fn given_member_leaf_when_searching_owner_then_owning_node_found() {
    let (tree, groups) = sample_tree();
    let europe = &groups[1];
    let probe = leaf("Probe", 1, 1);
    europe.add_modifications([probe.clone()]);

    let owner = tree.find_leaf_owner(&probe).unwrap();
    assert_eq!(owner.group.id(), europe.id());
}

#[test]
fn given_unowned_leaf_when_searching_owner_then_not_found() {
    let (tree, _groups) = sample_tree();
    let stray = leaf("Stray", 1, 1);

    assert!(matches!(
        tree.find_leaf_owner(&stray),
        Err(DomainError::ModificationNotFound(_))
    ));
}

// ============================================================
// Traversal Tests
// ============================================================

#[test]
fn given_distinct_names_when_traversing_then_strictly_ascending_and_descending() {
    let (tree, _groups) = sample_tree();

    let in_order: Vec<String> = tree
        .traverse(Traversal::InOrder)
        .iter()
        .map(|g| g.name().to_string())
        .collect();
    assert_eq!(in_order.len(), 7);
    assert!(
        in_order.windows(2).all(|w| w[0] < w[1]),
        "strictly ascending: {in_order:?}"
    );

    let reverse: Vec<String> = tree
        .traverse(Traversal::ReverseOrder)
        .iter()
        .map(|g| g.name().to_string())
        .collect();
    assert!(
        reverse.windows(2).all(|w| w[0] > w[1]),
        "strictly descending: {reverse:?}"
    );
}

#[test]
fn given_empty_tree_when_traversing_then_empty_sequence() {
    let tree = ModificationTree::new(OrderBy::AggregateCost);
    assert!(tree.traverse(Traversal::InOrder).is_empty());
}
