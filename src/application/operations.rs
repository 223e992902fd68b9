//! Operations facade: the validated query surface over a shared tree.
//!
//! The tree itself is lenient about level arguments; this layer owns
//! range validation, presence checks and aggregate queries, so callers
//! get the documented error taxonomy instead of silently empty results.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::instrument;

use crate::domain::{DomainError, DomainResult, Modification, ModificationGroup};
use crate::sort;
use crate::tree::bfs::collect_subtree_leaves;
use crate::tree::{ModificationTree, NodeSnapshot, Traversal};

/// Control surface for a [`ModificationTree`].
#[derive(Debug, Clone)]
pub struct TreeOperations {
    tree: Arc<ModificationTree>,
}

impl TreeOperations {
    pub fn new(tree: Arc<ModificationTree>) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &ModificationTree {
        &self.tree
    }

    pub fn insert(&self, group: &Arc<ModificationGroup>) -> DomainResult<()> {
        self.tree.insert(group)
    }

    pub fn remove_group(&self, group: &Arc<ModificationGroup>) -> bool {
        self.tree.remove_group(group)
    }

    pub fn find_group(&self, group: &ModificationGroup) -> DomainResult<NodeSnapshot> {
        self.tree.find_group(group)
    }

    pub fn find_leaf_owner(&self, modification: &Arc<Modification>) -> DomainResult<NodeSnapshot> {
        self.tree.find_leaf_owner(modification)
    }

    pub fn level_of(&self, group: &ModificationGroup) -> i32 {
        self.tree.level_of(group)
    }

    pub fn path_of(&self, group: &ModificationGroup) -> String {
        self.tree.path_of(group)
    }

    pub fn traverse(&self, traversal: Traversal) -> Vec<Arc<ModificationGroup>> {
        self.tree.traverse(traversal)
    }

    fn validate_level(&self, level: i32) -> DomainResult<()> {
        let levels = self.tree.level_count();
        if level < 0 || level >= levels {
            return Err(DomainError::LevelOutOfRange { level, levels });
        }
        Ok(())
    }

    /// Groups at exactly the given depth; the depth must exist.
    pub fn groups_at_level(&self, level: i32) -> DomainResult<Vec<Arc<ModificationGroup>>> {
        self.validate_level(level)?;
        Ok(self.tree.groups_at_level(level))
    }

    /// Groups at every depth from 0 through the given one.
    pub fn groups_up_to_level(&self, level: i32) -> DomainResult<Vec<Arc<ModificationGroup>>> {
        self.validate_level(level)?;
        Ok(self.tree.groups_up_to_level(level))
    }

    /// Every modification under the group and its hierarchy descendants.
    #[instrument(level = "debug", skip(self, group), fields(group = %group.name()))]
    pub fn leaves_under(
        &self,
        group: &Arc<ModificationGroup>,
    ) -> DomainResult<BTreeSet<Arc<Modification>>> {
        if !self.tree.contains(group) {
            return Err(DomainError::GroupNotFound(group.name().to_string()));
        }
        Ok(collect_subtree_leaves(group))
    }

    /// Aggregate cost of the whole subtree, computed through the group's
    /// own cost policy.
    pub fn subtree_cost(&self, group: &Arc<ModificationGroup>) -> DomainResult<i64> {
        let leaves = self.leaves_under(group)?;
        let totals: Vec<i64> = leaves.iter().map(|m| m.total_cost()).collect();
        Ok(group.policy().aggregate(&totals))
    }

    /// Aggregate priority of the whole subtree.
    pub fn subtree_priority(&self, group: &Arc<ModificationGroup>) -> DomainResult<i64> {
        let leaves = self.leaves_under(group)?;
        Ok(leaves.iter().map(|m| i64::from(m.priority_value())).sum())
    }

    /// Sum of the group aggregates at one level.
    pub fn cost_at_level(&self, level: i32) -> DomainResult<i64> {
        Ok(self
            .groups_at_level(level)?
            .iter()
            .map(|g| g.cost())
            .sum())
    }

    /// Sum of the group priorities at one level.
    pub fn priority_at_level(&self, level: i32) -> DomainResult<i64> {
        Ok(self
            .groups_at_level(level)?
            .iter()
            .map(|g| g.priority_value())
            .sum())
    }

    /// The member modification with the id among the groups at the level.
    #[instrument(level = "debug", skip(self))]
    pub fn find_leaf_by_id(&self, id: u64, level: i32) -> DomainResult<Arc<Modification>> {
        if id == 0 {
            return Err(DomainError::NonPositiveId);
        }
        self.groups_at_level(level)?
            .iter()
            .flat_map(|g| g.members())
            .find(|m| m.id() == id)
            .ok_or(DomainError::ModificationNotFound(id))
    }

    /// The highest-priority member modification at the level; ties break
    /// toward the lowest id. `None` when the level holds no members.
    #[instrument(level = "debug", skip(self))]
    pub fn highest_priority_leaf_at_level(
        &self,
        level: i32,
    ) -> DomainResult<Option<Arc<Modification>>> {
        let mut best: Option<Arc<Modification>> = None;
        for modification in self
            .groups_at_level(level)?
            .iter()
            .flat_map(|g| g.members())
        {
            let better = match &best {
                None => true,
                Some(current) => {
                    modification.priority_value() > current.priority_value()
                        || (modification.priority_value() == current.priority_value()
                            && modification.id() < current.id())
                }
            };
            if better {
                best = Some(modification);
            }
        }
        Ok(best)
    }

    /// Union of the member sets of every group in the tree.
    pub fn all_modifications(&self) -> Vec<Arc<Modification>> {
        let groups = self.tree.groups_up_to_level(self.tree.level_count());
        let set: BTreeSet<Arc<Modification>> =
            groups.iter().flat_map(|g| g.members()).collect();
        set.into_iter().collect()
    }

    fn all_groups(&self) -> Vec<Arc<ModificationGroup>> {
        self.tree.groups_up_to_level(self.tree.level_count())
    }

    pub fn modifications_by_name_ascending(&self) -> Vec<Arc<Modification>> {
        sort::ascending_by(&self.all_modifications(), |a, b| a.name().cmp(b.name()))
    }

    pub fn modifications_by_name_descending(&self) -> Vec<Arc<Modification>> {
        sort::descending_by(&self.all_modifications(), |a, b| a.name().cmp(b.name()))
    }

    pub fn modifications_by_priority_ascending(&self) -> Vec<Arc<Modification>> {
        sort::ascending_by(&self.all_modifications(), |a, b| {
            a.priority_value().cmp(&b.priority_value())
        })
    }

    pub fn modifications_by_priority_descending(&self) -> Vec<Arc<Modification>> {
        sort::descending_by(&self.all_modifications(), |a, b| {
            a.priority_value().cmp(&b.priority_value())
        })
    }

    pub fn groups_by_name_ascending(&self) -> Vec<Arc<ModificationGroup>> {
        sort::ascending_by(&self.all_groups(), |a, b| a.name().cmp(b.name()))
    }

    pub fn groups_by_name_descending(&self) -> Vec<Arc<ModificationGroup>> {
        sort::descending_by(&self.all_groups(), |a, b| a.name().cmp(b.name()))
    }

    pub fn groups_by_priority_ascending(&self) -> Vec<Arc<ModificationGroup>> {
        sort::ascending_by(&self.all_groups(), |a, b| {
            a.priority_value().cmp(&b.priority_value())
        })
    }

    pub fn groups_by_priority_descending(&self) -> Vec<Arc<ModificationGroup>> {
        sort::descending_by(&self.all_groups(), |a, b| {
            a.priority_value().cmp(&b.priority_value())
        })
    }
}
