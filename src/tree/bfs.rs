//! Breadth-first primitives: frontier expansion over the ordering edges
//! plus subtree collection over the hierarchy mirror.
//!
//! Frontier expansions use two alternating queues (current level / next
//! level) so the depth counter only advances on level boundaries.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use generational_arena::Index;
use tracing::instrument;

use crate::domain::{Modification, ModificationGroup};
use crate::tree::{ModificationTree, TreeCore};

impl TreeCore {
    /// Breadth-first search by group id.
    pub(crate) fn find_by_id(&self, id: u64) -> Option<Index> {
        let mut queue: VecDeque<Index> = self.root.into_iter().collect();
        while let Some(idx) = queue.pop_front() {
            let node = &self.arena[idx];
            if node.group.id() == id {
                return Some(idx);
            }
            queue.extend(node.left);
            queue.extend(node.right);
        }
        None
    }

    /// Breadth-first search for the node whose group owns the leaf.
    pub(crate) fn find_owner(&self, modification: &Arc<Modification>) -> Option<Index> {
        let mut queue: VecDeque<Index> = self.root.into_iter().collect();
        while let Some(idx) = queue.pop_front() {
            let node = &self.arena[idx];
            if node.group.contains_member(modification) {
                return Some(idx);
            }
            queue.extend(node.left);
            queue.extend(node.right);
        }
        None
    }

    /// Frontier expansion until the group id is found; -1 when absent.
    pub(crate) fn level_by_frontier(&self, id: u64) -> i32 {
        let Some(root) = self.root else {
            return -1;
        };
        let mut current = VecDeque::from([root]);
        let mut next = VecDeque::new();
        let mut level = 0;
        while let Some(idx) = current.pop_front() {
            let node = &self.arena[idx];
            if node.group.id() == id {
                return level;
            }
            next.extend(node.left);
            next.extend(node.right);
            if current.is_empty() {
                std::mem::swap(&mut current, &mut next);
                level += 1;
            }
        }
        -1
    }

    /// Groups at exactly the target depth; empty when the depth does not
    /// exist.
    pub(crate) fn groups_on_level(&self, target: i32) -> Vec<Arc<ModificationGroup>> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if target < 0 {
            return Vec::new();
        }
        let mut current = VecDeque::from([root]);
        let mut next = VecDeque::new();
        let mut level = 0;
        let mut out = Vec::new();
        while !current.is_empty() && level <= target {
            while let Some(idx) = current.pop_front() {
                let node = &self.arena[idx];
                if level == target {
                    out.push(Arc::clone(&node.group));
                } else {
                    next.extend(node.left);
                    next.extend(node.right);
                }
            }
            std::mem::swap(&mut current, &mut next);
            level += 1;
        }
        out
    }

    /// Groups at every depth from 0 through the target inclusive.
    pub(crate) fn groups_through_level(&self, target: i32) -> Vec<Arc<ModificationGroup>> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if target < 0 {
            return Vec::new();
        }
        let mut current = VecDeque::from([root]);
        let mut next = VecDeque::new();
        let mut level = 0;
        let mut out = Vec::new();
        while !current.is_empty() && level <= target {
            while let Some(idx) = current.pop_front() {
                let node = &self.arena[idx];
                out.push(Arc::clone(&node.group));
                if level < target {
                    next.extend(node.left);
                    next.extend(node.right);
                }
            }
            std::mem::swap(&mut current, &mut next);
            level += 1;
        }
        out
    }

    /// Level count: -1 empty, 0 root-only, else the number of frontier
    /// levels.
    pub(crate) fn count_levels(&self) -> i32 {
        let Some(root) = self.root else {
            return -1;
        };
        {
            let node = &self.arena[root];
            if node.left.is_none() && node.right.is_none() {
                return 0;
            }
        }
        let mut current = VecDeque::from([root]);
        let mut next = VecDeque::new();
        let mut levels = 0;
        while !current.is_empty() {
            while let Some(idx) = current.pop_front() {
                let node = &self.arena[idx];
                next.extend(node.left);
                next.extend(node.right);
            }
            std::mem::swap(&mut current, &mut next);
            levels += 1;
        }
        levels
    }

    /// Depth-first path accumulation: ancestor names are pushed on the
    /// successful return path, target-to-root.
    pub(crate) fn build_path(
        &self,
        node: Option<Index>,
        target_id: u64,
        path: &mut Vec<String>,
    ) -> bool {
        let Some(idx) = node else {
            return false;
        };
        let n = &self.arena[idx];
        if n.group.id() == target_id {
            path.push(n.group.name().to_string());
            return true;
        }
        if self.build_path(n.left, target_id, path) || self.build_path(n.right, target_id, path) {
            path.push(n.group.name().to_string());
            return true;
        }
        false
    }
}

impl ModificationTree {
    /// Depth level of a group: the cached level when it is non-negative
    /// and the group is re-verified present, otherwise a fresh frontier
    /// expansion. -1 when absent or the tree is empty.
    #[instrument(level = "trace", skip(self, group), fields(group = %group.name()))]
    pub fn level_of(&self, group: &ModificationGroup) -> i32 {
        let core = self.read_core();
        let cached = group.level();
        if cached >= 0 && core.find_by_id(group.id()).is_some() {
            return cached;
        }
        core.level_by_frontier(group.id())
    }

    /// Groups at exactly the given depth. Lenient: empty for a depth the
    /// tree does not reach; range validation belongs to the operations
    /// facade.
    #[instrument(level = "trace", skip(self))]
    pub fn groups_at_level(&self, level: i32) -> Vec<Arc<ModificationGroup>> {
        self.read_core().groups_on_level(level)
    }

    /// Groups at every depth from 0 through the given one.
    #[instrument(level = "trace", skip(self))]
    pub fn groups_up_to_level(&self, level: i32) -> Vec<Arc<ModificationGroup>> {
        self.read_core().groups_through_level(level)
    }

    /// Ancestor names joined root-to-target with `" / "`; an empty string
    /// (never an error) when the group is absent.
    #[instrument(level = "trace", skip(self, group), fields(group = %group.name()))]
    pub fn path_of(&self, group: &ModificationGroup) -> String {
        let core = self.read_core();
        let mut path = Vec::new();
        if core.build_path(core.root, group.id(), &mut path) {
            path.reverse();
            path.join(" / ")
        } else {
            String::new()
        }
    }
}

/// Every modification under the group and its hierarchy descendants.
///
/// Walks the hierarchy mirror, not the BST: each group's member set is
/// taken under its membership guard and each child list under its
/// child-list guard. Never takes the tree lock, so aggregation does not
/// block unrelated structural reads.
pub fn collect_subtree_leaves(group: &ModificationGroup) -> BTreeSet<Arc<Modification>> {
    let mut acc = BTreeSet::new();
    collect_into(group, &mut acc);
    acc
}

fn collect_into(group: &ModificationGroup, acc: &mut BTreeSet<Arc<Modification>>) {
    acc.extend(group.members());
    for child in group.children() {
        collect_into(&child, acc);
    }
}
