//! Composite hierarchy nodes aggregating leaf records and child groups.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::domain::modification::{CostPolicy, Modification, StandardCost};
use crate::domain::next_element_id;

/// Level value of a group that is not attached to any tree.
pub const DETACHED_LEVEL: i32 = -1;

/// A modification group: the composite node of the hierarchy.
///
/// Externally shaped like a leaf (id, name, priority, cost), but priority
/// and cost are derived by summing the direct members and resummed on each
/// membership mutation. The member set and the child list are independent
/// synchronization domains so that subtree aggregation can walk one group
/// while mutation happens elsewhere in the hierarchy.
///
/// Lock order, fixed crate-wide: tree lock before any group guard; within
/// one group, membership before child list; a parent's child-list guard
/// before any descendant's guards.
#[derive(Debug)]
pub struct ModificationGroup {
    id: u64,
    name: String,
    members: Mutex<BTreeSet<Arc<Modification>>>,
    children: Mutex<Vec<Arc<ModificationGroup>>>,
    cost: AtomicI64,
    priority: AtomicI64,
    level: AtomicI32,
    policy: Arc<dyn CostPolicy>,
}

impl ModificationGroup {
    pub fn new(
        name: impl Into<String>,
        modifications: impl IntoIterator<Item = Arc<Modification>>,
    ) -> Arc<Self> {
        Self::with_policy(name, modifications, Arc::new(StandardCost))
    }

    /// Construct with a custom aggregation policy.
    pub fn with_policy(
        name: impl Into<String>,
        modifications: impl IntoIterator<Item = Arc<Modification>>,
        policy: Arc<dyn CostPolicy>,
    ) -> Arc<Self> {
        let group = Arc::new(Self {
            id: next_element_id(),
            name: name.into(),
            members: Mutex::new(BTreeSet::new()),
            children: Mutex::new(Vec::new()),
            cost: AtomicI64::new(0),
            priority: AtomicI64::new(0),
            level: AtomicI32::new(DETACHED_LEVEL),
            policy,
        });
        group.add_modifications(modifications);
        group
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived aggregate cost over the direct members.
    pub fn cost(&self) -> i64 {
        self.cost.load(Ordering::Relaxed)
    }

    /// Derived aggregate priority over the direct members.
    pub fn priority_value(&self) -> i64 {
        self.priority.load(Ordering::Relaxed)
    }

    /// Cached depth level: 0 for the root, [`DETACHED_LEVEL`] when outside
    /// any tree.
    pub fn level(&self) -> i32 {
        self.level.load(Ordering::Relaxed)
    }

    pub fn policy(&self) -> &dyn CostPolicy {
        self.policy.as_ref()
    }

    /// Snapshot of the direct member set, in id order.
    pub fn members(&self) -> Vec<Arc<Modification>> {
        self.members.lock().iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.lock().len()
    }

    pub fn contains_member(&self, modification: &Arc<Modification>) -> bool {
        self.members.lock().contains(modification)
    }

    /// Snapshot of the direct child groups, in attachment order.
    pub fn children(&self) -> Vec<Arc<ModificationGroup>> {
        self.children.lock().iter().cloned().collect()
    }

    pub fn contains_child(&self, group: &ModificationGroup) -> bool {
        self.children.lock().iter().any(|c| c.id == group.id)
    }

    /// Add modifications to the member set, reparenting each leaf and
    /// resumming the derived aggregates. O(member count).
    pub fn add_modifications(
        self: &Arc<Self>,
        modifications: impl IntoIterator<Item = Arc<Modification>>,
    ) {
        let mut members = self.members.lock();
        for modification in modifications {
            modification.set_owner(Some(self));
            members.insert(modification);
        }
        self.resum(&members);
    }

    /// Remove one modification, clearing its owner link and resumming.
    /// Returns `false` when the leaf was not a member.
    pub fn remove_modification(&self, modification: &Arc<Modification>) -> bool {
        let mut members = self.members.lock();
        if !members.remove(modification) {
            return false;
        }
        modification.set_owner(None);
        self.resum(&members);
        true
    }

    /// Whether the group or any hierarchy descendant has the id.
    fn in_subtree(&self, id: u64) -> bool {
        if self.id == id {
            return true;
        }
        self.children.lock().iter().any(|c| c.in_subtree(id))
    }

    /// Attach a child group, placing it one level below this group.
    /// Dedupes by id and refuses an edge that would close a hierarchy
    /// cycle; returns whether the edge was created.
    pub fn add_child(self: &Arc<Self>, child: &Arc<ModificationGroup>) -> bool {
        if child.in_subtree(self.id) {
            return false;
        }
        let mut children = self.children.lock();
        if children.iter().any(|c| c.id == child.id) {
            return false;
        }
        child.set_level(self.level() + 1);
        children.push(Arc::clone(child));
        trace!(parent = %self.name, child = %child.name, "hierarchy edge added");
        true
    }

    /// Detach a child group. The child keeps its own subtree untouched.
    pub fn remove_child(&self, child: &ModificationGroup) -> bool {
        let mut children = self.children.lock();
        let before = children.len();
        children.retain(|c| c.id != child.id);
        children.len() != before
    }

    /// Set the cached level, shifting every hierarchy descendant by the
    /// same delta so cached levels stay consistent after reattachment.
    /// Returns `false` (unchanged) when the new level equals the current.
    pub fn set_level(&self, new_level: i32) -> bool {
        let current = self.level.load(Ordering::Relaxed);
        if current == new_level {
            return false;
        }
        self.level.store(new_level, Ordering::Relaxed);
        let delta = new_level - current;
        for child in self.children.lock().iter() {
            child.shift_level(delta);
        }
        true
    }

    fn shift_level(&self, delta: i32) {
        self.level.fetch_add(delta, Ordering::Relaxed);
        for child in self.children.lock().iter() {
            child.shift_level(delta);
        }
    }

    /// Mark the group detached without disturbing descendants still in
    /// the tree.
    pub(crate) fn reset_level(&self) {
        self.level.store(DETACHED_LEVEL, Ordering::Relaxed);
    }

    /// Drop every hierarchy edge leaving this group. Part of fully
    /// unlinking a removed node; the former children stay in the tree
    /// under their own nodes.
    pub(crate) fn clear_children(&self) {
        self.children.lock().clear();
    }

    fn resum(&self, members: &BTreeSet<Arc<Modification>>) {
        let totals: Vec<i64> = members.iter().map(|m| m.total_cost()).collect();
        self.cost
            .store(self.policy.aggregate(&totals), Ordering::Relaxed);
        self.priority.store(
            members.iter().map(|m| i64::from(m.priority_value())).sum(),
            Ordering::Relaxed,
        );
    }
}

impl PartialEq for ModificationGroup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModificationGroup {}

impl std::hash::Hash for ModificationGroup {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ModificationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id {}, priority {}, cost {})",
            self.name,
            self.id,
            self.priority_value(),
            self.cost()
        )
    }
}
