//! Process-wide cache of per-type mappings
//!
//! Descriptors and enum tables are built on first use and kept for the life
//! of the process, keyed by the Rust type of the cached entry. Entries are
//! built outside the map lock; two threads racing on the same type may both
//! build, and the first insert wins. Built entries are pure, so the loser's
//! copy is equal to the winner's.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::sync::Arc;

static ENTRIES: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

/// Get the cached `V`, building it with `build` on first access
pub(crate) fn get_or_build<V, F>(build: F) -> Arc<V>
where
    V: Any + Send + Sync,
    F: FnOnce() -> V,
{
    let key = TypeId::of::<V>();

    let existing = ENTRIES.get(&key).map(|entry| entry.value().clone());
    if let Some(hit) = existing.and_then(|entry| entry.downcast::<V>().ok()) {
        return hit;
    }

    let fresh = Arc::new(build());
    let stored = ENTRIES
        .entry(key)
        .or_insert_with(|| fresh.clone() as Arc<dyn Any + Send + Sync>)
        .value()
        .clone();

    // The key is the entry's own type, so this downcast only fails if the
    // map was never written.
    stored.downcast::<V>().unwrap_or(fresh)
}

/// Number of cached entries
pub fn cached_entries() -> usize {
    ENTRIES.len()
}
