//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no
//! config loading).

use std::sync::atomic::{AtomicU64, Ordering};

pub mod error;
pub mod group;
pub mod modification;

pub use error::{DomainError, DomainResult};
pub use group::{ModificationGroup, DETACHED_LEVEL};
pub use modification::{CostPolicy, DiscountedCost, Modification, ModificationKind, StandardCost};

/// One process-wide id source shared by leaves and groups: ids are
/// globally unique and monotonically increasing, starting at 1.
static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_element_id() -> u64 {
    NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed) + 1
}
