// src/pipeline/mod.rs
//! Episode processing pipeline: normalize → dedup → categorize → group.
//!
//! Every stage takes a batch and returns a new one; nothing is mutated in place
//! and episodes are processed in collection order, which the first-wins
//! tie-breaks of the dedup and categorize stages rely on.

pub mod categorize;
pub mod dedup;
pub mod group;
pub mod normalize;

use crate::model::{Category, Episode};
use categorize::Categorizer;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use normalize::{NormalizeOptions, SkipReason};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use tracing::info;

pub use categorize::search_text;
pub use dedup::{dedup_key, deduplicate_episodes, DedupOutcome};
pub use group::group_by_category;
pub use normalize::{clean_text, normalize_episodes, truncate_text, NormalizeOutcome};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "pipeline_episodes_in_total",
            "Raw episodes handed to the pipeline."
        );
        describe_counter!(
            "pipeline_normalize_skipped_total",
            "Episodes dropped by the normalizer (duplicate id, missing id, short title)."
        );
        describe_counter!(
            "pipeline_dedup_merged_total",
            "Episodes collapsed into a cross-source survivor."
        );
        describe_counter!(
            "pipeline_uncategorized_total",
            "Episodes that matched no category keyword."
        );
        describe_counter!(
            "pipeline_episodes_out_total",
            "Episodes leaving the pipeline grouped by category."
        );
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Grouped output plus what each stage dropped.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub groups: BTreeMap<Category, Vec<Episode>>,
    pub collected: usize,
    pub normalized: usize,
    pub deduplicated: usize,
    pub skipped: Vec<SkipReason>,
}

impl PipelineReport {
    pub fn total_episodes(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Episodes in category order, each group newest first.
    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.groups.values().flatten()
    }
}

/// Run all stages over one collected batch.
pub fn run(raw: &[Episode], categorizer: &Categorizer, opts: &NormalizeOptions) -> PipelineReport {
    ensure_metrics_described();
    counter!("pipeline_episodes_in_total").increment(raw.len() as u64);

    let NormalizeOutcome { kept, skipped } = normalize_episodes(raw, opts);
    info!(
        collected = raw.len(),
        normalized = kept.len(),
        skipped = skipped.len(),
        "normalization done"
    );
    counter!("pipeline_normalize_skipped_total").increment(skipped.len() as u64);
    let normalized = kept.len();

    let DedupOutcome { survivors, merged } = deduplicate_episodes(kept);
    info!(deduplicated = survivors.len(), merged, "deduplication done");
    counter!("pipeline_dedup_merged_total").increment(merged as u64);
    let deduplicated = survivors.len();

    let categorized = categorizer.categorize_episodes(&survivors);
    let uncategorized = categorized
        .iter()
        .filter(|e| e.matched_category == Category::Uncategorized)
        .count();
    info!(categorized = categorized.len(), uncategorized, "categorization done");
    counter!("pipeline_uncategorized_total").increment(uncategorized as u64);

    let groups = group_by_category(&categorized);
    counter!("pipeline_episodes_out_total").increment(categorized.len() as u64);
    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    PipelineReport {
        groups,
        collected: raw.len(),
        normalized,
        deduplicated,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordTable;
    use crate::model::Source;

    #[test]
    fn run_reports_stage_counts() {
        let categorizer = Categorizer::new(&KeywordTable::builtin()).unwrap();
        let raw = vec![
            Episode::new("s:1", "Better sleep tonight", "Rest Easy", Source::Spotify),
            Episode::new("a:1", "Better Sleep Tonight!", "Rest Easy", Source::ApplePodcasts),
            Episode::new("s:1", "Better sleep tonight", "Rest Easy", Source::Spotify),
            Episode::new("s:2", "ok", "Rest Easy", Source::Spotify),
        ];
        let report = run(&raw, &categorizer, &NormalizeOptions::default());
        assert_eq!(report.collected, 4);
        assert_eq!(report.normalized, 2);
        assert_eq!(report.deduplicated, 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.total_episodes(), 1);

        let only = report.episodes().next().unwrap();
        assert_eq!(only.id, "s:1");
        assert_eq!(only.matched_category, Category::SleepManagement);
    }
}
