// src/pipeline/categorize.rs
//! Keyword-scoring categorizer.
//!
//! Every keyword phrase is compiled to a `(?i)\b<phrase>\b` regex. An episode's
//! score for a category is the sum of non-overlapping match counts of all that
//! category's phrases. The highest score wins; ties go to the category declared
//! first in the table, and an all-zero result is `Uncategorized`.

use crate::config::KeywordTable;
use crate::model::{Category, Episode};
use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug)]
struct CompiledCategory {
    key: String,
    category: Category,
    patterns: Vec<Regex>,
}

/// Compiled, immutable form of a [`KeywordTable`].
#[derive(Debug)]
pub struct Categorizer {
    categories: Vec<CompiledCategory>,
}

/// Lower-cased text an episode is scored against.
pub fn search_text(ep: &Episode) -> String {
    [
        ep.title.as_str(),
        ep.description.as_deref().unwrap_or(""),
        ep.podcast_title.as_str(),
        ep.source_categories.join(" ").as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

impl Categorizer {
    /// Validate and compile the table. Errors here are deployment errors.
    pub fn new(table: &KeywordTable) -> Result<Self> {
        table.validate()?;

        let mut categories = Vec::with_capacity(table.categories.len());
        for entry in &table.categories {
            let category = Category::from_key(&entry.key).unwrap_or_else(|| {
                tracing::warn!(key = %entry.key, "keyword category has no public category");
                Category::Uncategorized
            });
            let patterns = entry
                .keywords
                .iter()
                .map(|kw| {
                    let pattern = format!(r"(?i)\b{}\b", regex::escape(kw));
                    Regex::new(&pattern)
                        .with_context(|| format!("compiling keyword {kw:?} for {}", entry.key))
                })
                .collect::<Result<Vec<_>>>()?;
            categories.push(CompiledCategory {
                key: entry.key.clone(),
                category,
                patterns,
            });
        }

        Ok(Self { categories })
    }

    /// Per-category totals in declared table order.
    pub fn scores(&self, ep: &Episode) -> Vec<(&str, usize)> {
        let text = search_text(ep);
        self.categories
            .iter()
            .map(|c| {
                let total = c.patterns.iter().map(|re| re.find_iter(&text).count()).sum();
                (c.key.as_str(), total)
            })
            .collect()
    }

    pub fn classify(&self, ep: &Episode) -> Category {
        let text = search_text(ep);
        let mut best: Option<(usize, Category)> = None;
        for c in &self.categories {
            let total: usize = c.patterns.iter().map(|re| re.find_iter(&text).count()).sum();
            // strictly greater: earlier categories keep ties
            if total > 0 && best.is_none_or(|(top, _)| total > top) {
                best = Some((total, c.category));
            }
        }
        best.map_or(Category::Uncategorized, |(_, category)| category)
    }

    /// New records stamped with their category; input order is preserved.
    pub fn categorize_episodes(&self, episodes: &[Episode]) -> Vec<Episode> {
        episodes
            .iter()
            .map(|ep| Episode {
                matched_category: self.classify(ep),
                ..ep.clone()
            })
            .collect()
    }
}
