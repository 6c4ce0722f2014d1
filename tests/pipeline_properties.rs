// tests/pipeline_properties.rs
//! Seeded, generated batches checked against the pipeline's invariants.

use chrono::{TimeZone, Utc};
use podcast_digest::pipeline::dedup::{dedup_key, deduplicate_episodes};
use podcast_digest::pipeline::normalize::{
    clean_text, normalize_episodes, truncate_text, NormalizeOptions,
};
use podcast_digest::{run, Categorizer, Category, Episode, KeywordTable, Source};
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use std::collections::HashSet;

const WORDS: &[&str] = &[
    "the", "sleep", "startup", "gym", "zen", "career", "health", "future", "ai", "daily",
    "show", "podcast", "episode", "#12", "&amp;", "<b>", "</b>", "quilting", "river", "ep.",
    "Strength", "   ", "nap", "Founder", "wisdom", "of",
];

fn phrase(rng: &mut StdRng, min: usize, max: usize) -> String {
    let n = rng.random_range(min..=max);
    (0..n)
        .map(|_| *WORDS.choose(rng).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

fn batch(seed: u64, size: usize) -> Vec<Episode> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|i| {
            let source = *Source::ALL.choose(&mut rng).unwrap();
            let mut ep = Episode::new(
                format!("{}:{}", source.as_str(), rng.random_range(0..size)),
                phrase(&mut rng, 1, 6),
                phrase(&mut rng, 1, 3),
                source,
            );
            if rng.random_bool(0.6) {
                ep.description = Some(phrase(&mut rng, 0, 40));
            }
            if rng.random_bool(0.5) {
                let day = rng.random_range(1..=28);
                ep.published_at = Some(Utc.with_ymd_and_hms(2024, 2, day, 0, 0, 0).unwrap());
            }
            if rng.random_bool(0.3) {
                ep.duration_seconds = Some(rng.random_range(0..7200));
            }
            if rng.random_bool(0.3) {
                ep.episode_url = Some(format!("https://example.test/{i}"));
            }
            ep
        })
        .collect()
}

#[test]
fn pipeline_is_deterministic() {
    let categorizer = Categorizer::new(&KeywordTable::builtin()).unwrap();
    let opts = NormalizeOptions::default();
    for seed in 0..20 {
        let raw = batch(seed, 60);
        let a = run(&raw, &categorizer, &opts);
        let b = run(&raw, &categorizer, &opts);
        assert_eq!(a.groups, b.groups, "seed {seed}");
        assert_eq!(a.skipped, b.skipped, "seed {seed}");
    }
}

#[test]
fn survivors_have_unique_keys() {
    for seed in 0..20 {
        let raw = batch(seed, 80);
        let normalized = normalize_episodes(&raw, &NormalizeOptions::default()).kept;
        let out = deduplicate_episodes(normalized.clone());
        let keys: HashSet<String> = out.survivors.iter().map(dedup_key).collect();
        assert_eq!(keys.len(), out.survivors.len(), "seed {seed}");

        let all_keys: HashSet<String> = normalized.iter().map(dedup_key).collect();
        assert_eq!(keys, all_keys, "seed {seed}: every key keeps one survivor");
        assert_eq!(out.merged, normalized.len() - out.survivors.len());
    }
}

#[test]
fn every_output_episode_has_a_known_category() {
    let categorizer = Categorizer::new(&KeywordTable::builtin()).unwrap();
    for seed in 0..10 {
        let report = run(&batch(seed, 50), &categorizer, &NormalizeOptions::default());
        for (cat, eps) in &report.groups {
            assert!(Category::ALL.contains(cat));
            assert!(eps.iter().all(|e| e.matched_category == *cat));
        }
    }
}

#[test]
fn cleaning_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let once = clean_text(&phrase(&mut rng, 0, 12));
        assert_eq!(clean_text(&once), once);
    }
    assert_eq!(clean_text("already clean text"), "already clean text");
}

#[test]
fn truncation_stays_within_limit() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let limit = rng.random_range(10..120);
        let text = clean_text(&phrase(&mut rng, 5, 60));
        let out = truncate_text(&text, limit);
        if text.chars().count() <= limit {
            assert_eq!(out, text);
            continue;
        }
        let body = out.strip_suffix("...").expect("ellipsis appended");
        assert!(body.chars().count() <= limit, "{body:?} > {limit}");
        assert!(text.starts_with(body));

        // With a space past the midpoint the cut must land on it (modulo the
        // trailing punctuation that gets stripped).
        let head: String = text.chars().take(limit).collect();
        let late_space = head
            .char_indices()
            .any(|(i, c)| c == ' ' && head[..i].chars().count() >= limit / 2);
        if late_space {
            let rest = text[body.len()..].trim_start_matches(['.', ',', '!', '?', ';', ':']);
            assert!(rest.starts_with(' '), "mid-word cut: {body:?} / {rest:?}");
        }
    }
}

#[test]
fn groups_are_ordered_by_recency() {
    let categorizer = Categorizer::new(&KeywordTable::builtin()).unwrap();
    for seed in 0..10 {
        let report = run(&batch(seed, 80), &categorizer, &NormalizeOptions::default());
        for eps in report.groups.values() {
            for pair in eps.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                assert!(
                    b.published_at.is_none() || a.published_at >= b.published_at,
                    "{:?} before {:?}",
                    a.published_at,
                    b.published_at
                );
            }
        }
    }
}
