//! modtree: a thread-safe, comparator-ordered binary tree of modification
//! cost groups.
//!
//! Leaf cost records ([`Modification`]) are grouped into composite nodes
//! ([`ModificationGroup`]) that form a multi-level hierarchy. Groups are
//! simultaneously ordered in a binary-search structure, keyed by name,
//! aggregate priority or aggregate cost (fixed at construction), and
//! linked parent-to-child, mirroring organizational nesting such as
//! `Global / Europe / Hungary / Budapest`. Insertion establishes both a
//! BST position and a hierarchy edge in one atomic step; removal rebinds
//! both edge sets; breadth-first frontier expansion drives level lookups,
//! path reconstruction and subtree aggregation.
//!
//! The shape of the tree depends purely on insertion order and key
//! values: there is no self-balancing, and a sorted insert sequence
//! degenerates to O(n) depth.

pub mod application;
pub mod cli;
pub mod config;
pub mod display;
pub mod domain;
pub mod exitcode;
pub mod sort;
pub mod tree;
pub mod util;

pub use application::TreeOperations;
pub use domain::{
    CostPolicy, DiscountedCost, DomainError, DomainResult, Modification, ModificationGroup,
    ModificationKind, StandardCost, DETACHED_LEVEL,
};
pub use tree::bfs::collect_subtree_leaves;
pub use tree::{ModificationTree, NodeSnapshot, OrderBy, Traversal};
