//! Comparator-ordered binary tree of modification groups.
//!
//! Nodes live in a generational arena addressed by stable indices, so the
//! two edge sets (BST ordering edges in the arena, hierarchy edges in the
//! groups' child lists) can be rebound independently without dangling
//! references. One coarse `RwLock` serializes structural mutation while
//! readers share a consistent snapshot; counters are atomics readable
//! without the lock.

pub mod bfs;

use std::cmp::Ordering as KeyOrdering;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use generational_arena::{Arena, Index};
use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, instrument};

use crate::domain::{DomainError, DomainResult, Modification, ModificationGroup};

/// The ordering rule of a tree, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    /// Lexicographic group name.
    Name,
    /// Aggregate priority over the group's direct members.
    Priority,
    /// Aggregate cost over the group's direct members.
    AggregateCost,
}

impl OrderBy {
    pub fn compare(self, a: &ModificationGroup, b: &ModificationGroup) -> KeyOrdering {
        match self {
            OrderBy::Name => a.name().cmp(b.name()),
            OrderBy::Priority => a.priority_value().cmp(&b.priority_value()),
            OrderBy::AggregateCost => a.cost().cmp(&b.cost()),
        }
    }
}

impl FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(OrderBy::Name),
            "priority" => Ok(OrderBy::Priority),
            "cost" => Ok(OrderBy::AggregateCost),
            other => Err(format!(
                "unknown ordering: {other} (expected name, priority or cost)"
            )),
        }
    }
}

/// Traversal direction over the ordering edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// left, node, right: ascending by the tree's comparator.
    InOrder,
    /// right, node, left: descending by the tree's comparator.
    ReverseOrder,
}

/// BST node: exactly one group plus ordering edges and a creation-order
/// sequence number.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) group: Arc<ModificationGroup>,
    pub(crate) seq: u64,
    pub(crate) left: Option<Index>,
    pub(crate) right: Option<Index>,
}

/// Read-only view of a node handed out by the search operations.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    pub seq: u64,
    pub group: Arc<ModificationGroup>,
}

/// Arena storage plus root reference, guarded by the tree lock.
#[derive(Debug)]
pub(crate) struct TreeCore {
    pub(crate) arena: Arena<Node>,
    pub(crate) root: Option<Index>,
}

impl TreeCore {
    fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    fn snapshot(&self, idx: Index) -> NodeSnapshot {
        let node = &self.arena[idx];
        NodeSnapshot {
            seq: node.seq,
            group: Arc::clone(&node.group),
        }
    }

    /// Comparator-directed descent checking for an equal key anywhere on
    /// the path the group would take.
    fn contains_equal_key(&self, root: Index, group: &ModificationGroup, order: OrderBy) -> bool {
        let mut current = Some(root);
        while let Some(idx) = current {
            let node = &self.arena[idx];
            match order.compare(&node.group, group) {
                KeyOrdering::Equal => return true,
                KeyOrdering::Greater => current = node.left,
                KeyOrdering::Less => current = node.right,
            }
        }
        false
    }

    /// The node the group attaches under: follow right on strictly-less
    /// parents, left otherwise.
    fn insertion_parent(&self, root: Index, group: &ModificationGroup, order: OrderBy) -> Index {
        let mut current = root;
        loop {
            let node = &self.arena[current];
            let next = if order.compare(&node.group, group) == KeyOrdering::Less {
                node.right
            } else {
                node.left
            };
            match next {
                Some(idx) => current = idx,
                None => return current,
            }
        }
    }

    /// BST parent of the node holding the group, found by comparator
    /// descent with an id check on each child. `None` for the root or an
    /// absent group.
    fn bst_parent(&self, current: Index, group: &ModificationGroup, order: OrderBy) -> Option<Index> {
        let node = &self.arena[current];
        if node.group.id() == group.id() {
            return None;
        }
        let child = if order.compare(&node.group, group) == KeyOrdering::Greater {
            node.left
        } else {
            node.right
        };
        let child_idx = child?;
        if self.arena[child_idx].group.id() == group.id() {
            return Some(current);
        }
        self.bst_parent(child_idx, group, order)
    }

    /// Standard BST removal. 0/1 children: the node is destroyed and the
    /// remaining subtree takes its place. 2 children: the in-order
    /// successor's group is promoted into the node and the successor's
    /// original node is removed from the right subtree.
    fn remove_subtree(
        &mut self,
        node: Option<Index>,
        group: &ModificationGroup,
        order: OrderBy,
    ) -> Option<Index> {
        let idx = node?;
        let cmp = order.compare(&self.arena[idx].group, group);
        match cmp {
            KeyOrdering::Less => {
                let right = self.arena[idx].right;
                let new_right = self.remove_subtree(right, group, order);
                self.arena[idx].right = new_right;
                Some(idx)
            }
            KeyOrdering::Greater => {
                let left = self.arena[idx].left;
                let new_left = self.remove_subtree(left, group, order);
                self.arena[idx].left = new_left;
                Some(idx)
            }
            KeyOrdering::Equal => {
                let (left, right) = {
                    let n = &self.arena[idx];
                    (n.left, n.right)
                };
                match (left, right) {
                    (None, replacement) => {
                        self.arena.remove(idx);
                        replacement
                    }
                    (replacement, None) => {
                        self.arena.remove(idx);
                        replacement
                    }
                    (Some(_), Some(right_idx)) => {
                        let mut successor = right_idx;
                        while let Some(l) = self.arena[successor].left {
                            successor = l;
                        }
                        let successor_group = Arc::clone(&self.arena[successor].group);
                        self.arena[idx].group = Arc::clone(&successor_group);
                        let new_right = self.remove_subtree(Some(right_idx), &successor_group, order);
                        self.arena[idx].right = new_right;
                        Some(idx)
                    }
                }
            }
        }
    }

    fn collect_ordered(
        &self,
        node: Option<Index>,
        traversal: Traversal,
        out: &mut Vec<Arc<ModificationGroup>>,
    ) {
        let Some(idx) = node else { return };
        let (first, second) = {
            let n = &self.arena[idx];
            match traversal {
                Traversal::InOrder => (n.left, n.right),
                Traversal::ReverseOrder => (n.right, n.left),
            }
        };
        self.collect_ordered(first, traversal, out);
        out.push(Arc::clone(&self.arena[idx].group));
        self.collect_ordered(second, traversal, out);
    }
}

/// A thread-safe binary tree storing [`ModificationGroup`]s.
///
/// Every successful insertion establishes a BST position and the matching
/// hierarchy edge in one atomic step under the tree-wide write lock;
/// removal rebinds both edge sets. Search and contains use group-id
/// equality over a breadth-first walk, never a second comparator
/// evaluation, so an unstable aggregate key cannot make presence checks
/// disagree with themselves.
#[derive(Debug)]
pub struct ModificationTree {
    order: OrderBy,
    inner: RwLock<TreeCore>,
    element_count: AtomicUsize,
    level_count: AtomicI32,
    node_seq: AtomicU64,
}

impl ModificationTree {
    /// An empty tree whose comparator kind is fixed for its lifetime.
    pub fn new(order: OrderBy) -> Self {
        Self {
            order,
            inner: RwLock::new(TreeCore::new()),
            element_count: AtomicUsize::new(0),
            level_count: AtomicI32::new(-1),
            node_seq: AtomicU64::new(0),
        }
    }

    pub fn order(&self) -> OrderBy {
        self.order
    }

    /// Number of groups currently in the tree. Lock-free read.
    pub fn element_count(&self) -> usize {
        self.element_count.load(Ordering::Relaxed)
    }

    /// Level count: -1 for an empty tree, 0 for a root-only tree,
    /// otherwise the number of breadth-first levels. Lock-free read;
    /// fully recomputed after every structural mutation.
    pub fn level_count(&self) -> i32 {
        self.level_count.load(Ordering::Relaxed)
    }

    pub(crate) fn read_core(&self) -> RwLockReadGuard<'_, TreeCore> {
        self.inner.read()
    }

    fn next_seq(&self) -> u64 {
        self.node_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Insert a group, establishing the BST position and the hierarchy
    /// edge in one step.
    ///
    /// Fails with [`DomainError::DuplicateGroup`], mutating nothing,
    /// when the comparator-directed walk reaches an equal node.
    #[instrument(level = "debug", skip(self, group), fields(group = %group.name()))]
    pub fn insert(&self, group: &Arc<ModificationGroup>) -> DomainResult<()> {
        let mut core = self.inner.write();

        let Some(root) = core.root else {
            let node = Node {
                group: Arc::clone(group),
                seq: self.next_seq(),
                left: None,
                right: None,
            };
            core.root = Some(core.arena.insert(node));
            group.set_level(0);
            self.element_count.fetch_add(1, Ordering::Relaxed);
            self.level_count.store(core.count_levels(), Ordering::Relaxed);
            debug!("inserted as root");
            return Ok(());
        };

        if core.contains_equal_key(root, group, self.order) {
            return Err(DomainError::DuplicateGroup(group.name().to_string()));
        }

        let parent_idx = core.insertion_parent(root, group, self.order);
        let node = Node {
            group: Arc::clone(group),
            seq: self.next_seq(),
            left: None,
            right: None,
        };
        let node_idx = core.arena.insert(node);
        let parent_group = {
            let parent = &mut core.arena[parent_idx];
            if self.order.compare(&parent.group, group) == KeyOrdering::Less {
                parent.right = Some(node_idx);
            } else {
                parent.left = Some(node_idx);
            }
            Arc::clone(&parent.group)
        };
        // Mirrors the BST edge as a hierarchy edge and levels the child.
        parent_group.add_child(group);

        self.element_count.fetch_add(1, Ordering::Relaxed);
        self.level_count.store(core.count_levels(), Ordering::Relaxed);
        debug!(parent = %parent_group.name(), level = group.level(), "inserted");
        Ok(())
    }

    /// Remove a group, rebinding hierarchy and BST edges.
    ///
    /// Returns `false` (an expected outcome, not an error) when the
    /// group is not present.
    #[instrument(level = "debug", skip(self, group), fields(group = %group.name()))]
    pub fn remove_group(&self, group: &Arc<ModificationGroup>) -> bool {
        let mut core = self.inner.write();
        let Some(root) = core.root else {
            return false;
        };
        if core.find_by_id(group.id()).is_none() {
            return false;
        }

        // Hierarchy edge first, then the BST node.
        if let Some(parent_idx) = core.bst_parent(root, group, self.order) {
            let parent_group = Arc::clone(&core.arena[parent_idx].group);
            parent_group.remove_child(group);
        }
        core.root = core.remove_subtree(Some(root), group, self.order);
        group.clear_children();
        group.reset_level();

        self.element_count.fetch_sub(1, Ordering::Relaxed);
        self.level_count.store(core.count_levels(), Ordering::Relaxed);
        true
    }

    /// Whether the group is present, by id equality.
    #[instrument(level = "trace", skip(self, group), fields(group = %group.name()))]
    pub fn contains(&self, group: &ModificationGroup) -> bool {
        self.inner.read().find_by_id(group.id()).is_some()
    }

    /// Find the node holding the group, by id equality over a
    /// breadth-first walk.
    #[instrument(level = "trace", skip(self, group), fields(group = %group.name()))]
    pub fn find_group(&self, group: &ModificationGroup) -> DomainResult<NodeSnapshot> {
        let core = self.inner.read();
        if core.root.is_none() {
            return Err(DomainError::EmptyTree);
        }
        core.find_by_id(group.id())
            .map(|idx| core.snapshot(idx))
            .ok_or_else(|| DomainError::GroupNotFound(group.name().to_string()))
    }

    /// Find the node whose group currently owns the modification.
    #[instrument(level = "trace", skip(self, modification), fields(id = modification.id()))]
    pub fn find_leaf_owner(&self, modification: &Arc<Modification>) -> DomainResult<NodeSnapshot> {
        let core = self.inner.read();
        if core.root.is_none() {
            return Err(DomainError::EmptyTree);
        }
        core.find_owner(modification)
            .map(|idx| core.snapshot(idx))
            .ok_or(DomainError::ModificationNotFound(modification.id()))
    }

    /// Comparator-ordered sequence of all groups, for an external display
    /// collaborator.
    #[instrument(level = "trace", skip(self))]
    pub fn traverse(&self, traversal: Traversal) -> Vec<Arc<ModificationGroup>> {
        let core = self.inner.read();
        let mut out = Vec::with_capacity(self.element_count());
        core.collect_ordered(core.root, traversal, &mut out);
        out
    }
}
