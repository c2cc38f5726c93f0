//! List and map merge utilities
//!
//! Pure helpers combining global and per-resource configuration values.
//! Both functions are copy-on-write: the inputs are never mutated.

use std::collections::BTreeMap;

/// Merge two ordered string lists, deduplicating by value.
///
/// The result keeps every element of `base` in its original order,
/// followed by the elements of `addition` that are not already present.
pub fn merge_lists(base: &[String], addition: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = base.to_vec();
    for item in addition {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Merge two string maps, with `addition` winning on key collisions.
pub fn merge_maps(
    base: &BTreeMap<String, String>,
    addition: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in addition {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
