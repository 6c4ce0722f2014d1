// src/digest.rs
//! Capped, category-grouped result handed to renderers.

use crate::model::{Category, Episode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub date: DateTime<Utc>,
    pub episodes_by_category: BTreeMap<Category, Vec<Episode>>,
    pub total_episodes: usize,
}

impl Digest {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            episodes_by_category: BTreeMap::new(),
            total_episodes: 0,
        }
    }

    /// Build from grouper output, keeping at most `max_per_category` of the
    /// newest episodes per category.
    pub fn from_groups(
        date: DateTime<Utc>,
        groups: &BTreeMap<Category, Vec<Episode>>,
        max_per_category: usize,
    ) -> Self {
        let mut digest = Self::new(date);
        for episodes in groups.values() {
            for ep in episodes.iter().take(max_per_category) {
                digest.add_episode(ep.clone());
            }
        }
        digest
    }

    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes_by_category
            .entry(episode.matched_category)
            .or_default()
            .push(episode);
        self.total_episodes += 1;
    }

    /// `(display name, count)` per non-empty category, in category order.
    pub fn summary(&self) -> Vec<(&'static str, usize)> {
        self.episodes_by_category
            .iter()
            .map(|(c, eps)| (c.display_name(), eps.len()))
            .collect()
    }
}
