//! Leaf cost records and the cost capability contract.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::{next_element_id, ModificationGroup};

/// Kind of a modification, each carrying a fixed cost multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModificationKind {
    Add,
    Remove,
    Modify,
}

impl ModificationKind {
    /// Fixed multiplier applied to the base cost: 1, -1, 3.
    pub const fn multiplier(self) -> i64 {
        match self {
            ModificationKind::Add => 1,
            ModificationKind::Remove => -1,
            ModificationKind::Modify => 3,
        }
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModificationKind::Add => write!(f, "add"),
            ModificationKind::Remove => write!(f, "remove"),
            ModificationKind::Modify => write!(f, "modify"),
        }
    }
}

/// Cost computation capability, injected at construction.
///
/// Tree, BFS and aggregation code call only this contract, so a
/// specialized policy (e.g. [`DiscountedCost`]) changes the formula
/// without any algorithm special-casing it.
pub trait CostPolicy: fmt::Debug + Send + Sync {
    /// Total cost of a single record: base cost times the kind multiplier.
    fn compute_total(&self, base_cost: i64, kind: ModificationKind) -> i64 {
        base_cost * kind.multiplier()
    }

    /// Aggregate of already-computed member totals.
    fn aggregate(&self, totals: &[i64]) -> i64 {
        totals.iter().sum()
    }
}

/// The default policy: multiplier product, plain sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCost;

impl CostPolicy for StandardCost {}

/// A 10% rebate on both the per-record total and the aggregate,
/// truncated toward zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountedCost;

impl CostPolicy for DiscountedCost {
    fn compute_total(&self, base_cost: i64, kind: ModificationKind) -> i64 {
        base_cost * kind.multiplier() * 9 / 10
    }

    fn aggregate(&self, totals: &[i64]) -> i64 {
        totals.iter().sum::<i64>() * 9 / 10
    }
}

/// A concrete modification: the leaf record of the hierarchy.
///
/// All fields except the owner back-reference are fixed at construction;
/// the total cost is computed once via the injected [`CostPolicy`] and
/// never recomputed. Identity (equality, ordering, hashing) is the
/// globally unique id.
#[derive(Debug)]
pub struct Modification {
    id: u64,
    name: String,
    priority: i32,
    base_cost: i64,
    kind: ModificationKind,
    total_cost: i64,
    /// Current owning group. Non-owning: cleared on removal, never used
    /// for traversal, only to permit self-removal via [`Modification::resolved`].
    owner: Mutex<Weak<ModificationGroup>>,
}

impl Modification {
    pub fn new(
        name: impl Into<String>,
        priority: i32,
        base_cost: i64,
        kind: ModificationKind,
    ) -> Arc<Self> {
        Self::with_policy(name, priority, base_cost, kind, &StandardCost)
    }

    /// Construct with a custom cost policy; the policy is consulted once.
    pub fn with_policy(
        name: impl Into<String>,
        priority: i32,
        base_cost: i64,
        kind: ModificationKind,
        policy: &dyn CostPolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: next_element_id(),
            name: name.into(),
            priority,
            base_cost,
            kind,
            total_cost: policy.compute_total(base_cost, kind),
            owner: Mutex::new(Weak::new()),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority_value(&self) -> i32 {
        self.priority
    }

    pub fn base_cost(&self) -> i64 {
        self.base_cost
    }

    pub fn kind(&self) -> ModificationKind {
        self.kind
    }

    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    /// The owning group, if currently attached.
    pub fn owner(&self) -> Option<Arc<ModificationGroup>> {
        self.owner.lock().upgrade()
    }

    pub(crate) fn set_owner(&self, owner: Option<&Arc<ModificationGroup>>) {
        *self.owner.lock() = owner.map(Arc::downgrade).unwrap_or_default();
    }

    /// Remove this modification from its owning group.
    ///
    /// One-shot: succeeds on the first call and fails with
    /// [`DomainError::AlreadyResolved`] once the owner link is cleared.
    /// The failure is an idempotency signal, not a defect.
    pub fn resolved(self: &Arc<Self>) -> DomainResult<()> {
        let owner = self.owner.lock().upgrade();
        match owner {
            Some(group) if group.remove_modification(self) => Ok(()),
            _ => Err(DomainError::AlreadyResolved(self.name.clone())),
        }
    }
}

impl PartialEq for Modification {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Modification {}

impl PartialOrd for Modification {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Modification {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Modification {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id {}, {}, priority {}, cost {} -> {})",
            self.name, self.id, self.kind, self.priority, self.base_cost, self.total_cost
        )
    }
}
