// src/pipeline/group.rs
use crate::model::{Category, Episode};
use std::collections::BTreeMap;

/// Partition by category; each list newest first, undated episodes last.
/// The sort is stable, so equal timestamps keep their input order.
pub fn group_by_category(episodes: &[Episode]) -> BTreeMap<Category, Vec<Episode>> {
    let mut groups: BTreeMap<Category, Vec<Episode>> = BTreeMap::new();
    for ep in episodes {
        groups
            .entry(ep.matched_category)
            .or_default()
            .push(ep.clone());
    }
    for list in groups.values_mut() {
        // `None < Some(_)`, so descending order puts undated episodes last.
        list.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    }
    groups
}
