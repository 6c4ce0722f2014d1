// src/pipeline/dedup.rs
//! Cross-source deduplication by fuzzy podcast+title key.
//!
//! The same real episode usually arrives from several collectors with
//! different ids and slightly different titles ("The Daily Show Podcast" vs
//! "Daily Show"). Each episode is reduced to a normalized key; episodes sharing
//! a key form a bucket, and one survivor per bucket is kept by completeness
//! score.
//!
//! Noise words (`podcast`, `show`, `episode`, `ep`) only match as whole words,
//! so "Deep Questions" keys as `deep questions` rather than `de`.

use crate::model::Episode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const PODCAST_KEY_CHARS: usize = 30;
pub const TITLE_KEY_CHARS: usize = 50;
/// Descriptions must be longer than this (in chars) to earn the bonus.
pub const DESCRIPTION_BONUS_MIN_CHARS: usize = 50;

// "Episode 45: " / "Ep. 12 - " / "#7 | " numbering marker at the start of a title.
static RE_NUMBERING_LEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:episode|ep)\.?\s*#?\d+|#\d+)\s*[:|\-–—]\s*")
        .expect("numbering marker regex")
});
static RE_LEADING_ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:the|a|an)\s+").expect("article regex"));
static RE_TRAILING_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:^|\s+)(?:podcast|show|episode|ep)\b\.?|\s*#\d+).*$")
        .expect("noise regex")
});
static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Survivors in first-seen key order plus how many records were merged away.
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    pub survivors: Vec<Episode>,
    pub merged: usize,
}

/// Reduce a podcast or episode title to its matching form.
pub fn normalize_for_matching(text: &str) -> String {
    let lower = text.to_lowercase();
    normalize_lowered(&lower)
}

fn normalize_lowered(lower: &str) -> String {
    let s = RE_LEADING_ARTICLE.replace(lower, "");
    let s = RE_TRAILING_NOISE.replace(&s, "");
    let s = RE_NON_WORD.replace_all(&s, "");
    RE_WS.replace_all(&s, " ").trim().to_string()
}

/// Drop a leading numbering marker, optionally preceded by the podcast's own
/// name ("The Daily Show Episode 45: ..."). Any other text before the marker
/// is kept because it is what tells episodes apart.
fn strip_numbering(lower_title: &str, podcast_title: &str) -> String {
    let title = RE_WS.replace_all(lower_title.trim(), " ");
    if let Some(m) = RE_NUMBERING_LEAD.find(&title) {
        return title[m.end()..].to_string();
    }

    let podcast = podcast_title.to_lowercase();
    let podcast = RE_LEADING_ARTICLE.replace(podcast.trim(), "");
    let podcast = podcast.split_whitespace().collect::<Vec<_>>().join(" ");
    if podcast.is_empty() {
        return title.into_owned();
    }

    let body = RE_LEADING_ARTICLE.replace(&title, "");
    if let Some(rest) = body
        .strip_prefix(podcast.as_str())
        .and_then(|r| r.strip_prefix(' '))
    {
        if let Some(m) = RE_NUMBERING_LEAD.find(rest) {
            return rest[m.end()..].to_string();
        }
    }
    title.into_owned()
}

fn normalize_title_for_matching(title: &str, podcast_title: &str) -> String {
    let lower = title.to_lowercase();
    normalize_lowered(&strip_numbering(&lower, podcast_title))
}

fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// `"<podcast prefix>|<title prefix>"` grouping key.
pub fn dedup_key(ep: &Episode) -> String {
    let podcast = normalize_for_matching(&ep.podcast_title);
    let title = normalize_title_for_matching(&ep.title, &ep.podcast_title);
    format!(
        "{}|{}",
        prefix_chars(&podcast, PODCAST_KEY_CHARS),
        prefix_chars(&title, TITLE_KEY_CHARS)
    )
}

fn has_text(s: &Option<String>) -> bool {
    s.as_deref().is_some_and(|v| !v.is_empty())
}

/// Completeness score used to pick a survivor.
pub fn completeness_score(ep: &Episode) -> u32 {
    let mut score = 0;
    if ep
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > DESCRIPTION_BONUS_MIN_CHARS)
    {
        score += 2;
    }
    if ep.published_at.is_some() {
        score += 2;
    }
    if ep.duration_seconds.is_some_and(|d| d > 0) {
        score += 1;
    }
    if has_text(&ep.episode_url) {
        score += 1;
    }
    if has_text(&ep.audio_url) {
        score += 1;
    }
    score + ep.source.priority_bonus()
}

/// Highest score wins; ties keep the earliest member.
fn pick_survivor(bucket: Vec<Episode>) -> Option<Episode> {
    if bucket.len() <= 1 {
        return bucket.into_iter().next();
    }
    let mut best: Option<(u32, Episode)> = None;
    for ep in bucket {
        let score = completeness_score(&ep);
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, ep));
        }
    }
    best.map(|(_, ep)| ep)
}

pub fn deduplicate_episodes(episodes: Vec<Episode>) -> DedupOutcome {
    let total = episodes.len();
    let mut index: HashMap<String, usize> = HashMap::with_capacity(total);
    let mut buckets: Vec<Vec<Episode>> = Vec::new();

    for ep in episodes {
        let key = dedup_key(&ep);
        match index.get(&key) {
            Some(&i) => buckets[i].push(ep),
            None => {
                index.insert(key, buckets.len());
                buckets.push(vec![ep]);
            }
        }
    }

    let survivors: Vec<Episode> = buckets.into_iter().filter_map(pick_survivor).collect();
    let merged = total - survivors.len();
    if merged > 0 {
        tracing::debug!(merged, buckets = survivors.len(), "collapsed duplicate episodes");
    }

    DedupOutcome { survivors, merged }
}
