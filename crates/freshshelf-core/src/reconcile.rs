//! Reconciliation of divergent collection copies
//!
//! When a write reached only one backend, or another session wrote its own
//! ephemeral copy, the two backends can hold different versions of the same
//! collection. [`merge`] folds them into one list keyed by record identity.

use std::collections::HashMap;
use std::hash::Hash;

/// Merge two lists by identity, `secondary` winning on conflicts
///
/// Output order is `primary`'s order, with records only present in
/// `secondary` appended in `secondary`'s order. A record whose identity
/// appears in both lists keeps its primary position but takes the secondary
/// value. Duplicate identities within one list collapse to the last one.
pub fn merge<T, K, F>(primary: Vec<T>, secondary: Vec<T>, identity: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut merged: Vec<T> = Vec::with_capacity(primary.len() + secondary.len());
    let mut positions: HashMap<K, usize> = HashMap::new();

    for record in primary.into_iter().chain(secondary) {
        let key = identity(&record);
        match positions.get(&key) {
            Some(&index) => merged[index] = record,
            None => {
                positions.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// Merge optional snapshots, treating a missing copy as empty
pub fn merge_snapshots<T, K, F>(
    primary: Option<Vec<T>>,
    secondary: Option<Vec<T>>,
    identity: F,
) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    merge(
        primary.unwrap_or_default(),
        secondary.unwrap_or_default(),
        identity,
    )
}
