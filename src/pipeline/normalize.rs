// src/pipeline/normalize.rs
//! Text cleaning and per-record validation.

use crate::model::Episode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_DESCRIPTION_LIMIT: usize = 500;
pub const MIN_TITLE_CHARS: usize = 3;
pub const UNKNOWN_PODCAST: &str = "Unknown Podcast";

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Why a raw record did not make it through the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Another record earlier in the batch already claimed this id.
    DuplicateId { id: String },
    MissingId,
    /// Cleaned title is empty or shorter than [`MIN_TITLE_CHARS`].
    TitleTooShort { id: String, title: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DuplicateId { id } => write!(f, "duplicate id {id}"),
            SkipReason::MissingId => f.write_str("missing id"),
            SkipReason::TitleTooShort { id, title } => {
                write!(f, "title too short for {id}: {title:?}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub description_limit: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
        }
    }
}

/// Result of one normalizer pass: kept records in input order plus the skips.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub kept: Vec<Episode>,
    pub skipped: Vec<SkipReason>,
}

/// Decode entities, replace tags with a space, collapse whitespace, trim.
pub fn clean_text(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let decoded = html_escape::decode_html_entities(s);
    let untagged = RE_TAGS.replace_all(&decoded, " ");
    RE_WS.replace_all(&untagged, " ").trim().to_string()
}

/// Cut `text` to at most `max_chars` chars, preferring a space boundary at or
/// past the midpoint. Truncated output ends with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let head: String = text.chars().take(max_chars).collect();
    let cut = match head.rfind(' ') {
        Some(byte_idx) if head[..byte_idx].chars().count() >= max_chars / 2 => &head[..byte_idx],
        _ => head.as_str(),
    };

    let mut out = cut
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .to_string();
    out.push_str("...");
    out
}

fn clean_optional(s: Option<&str>) -> Option<String> {
    s.map(clean_text).filter(|t| !t.is_empty())
}

/// Clean a single record. Never mutates the input.
pub fn normalize_episode(ep: &Episode, opts: &NormalizeOptions) -> Result<Episode, SkipReason> {
    if ep.id.trim().is_empty() {
        return Err(SkipReason::MissingId);
    }

    let title = clean_text(&ep.title);
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(SkipReason::TitleTooShort {
            id: ep.id.clone(),
            title,
        });
    }

    let mut podcast_title = clean_text(&ep.podcast_title);
    if podcast_title.is_empty() {
        podcast_title = UNKNOWN_PODCAST.to_string();
    }

    let description = clean_optional(ep.description.as_deref())
        .map(|d| truncate_text(&d, opts.description_limit));

    Ok(Episode {
        id: ep.id.clone(),
        title,
        podcast_title,
        podcast_author: clean_optional(ep.podcast_author.as_deref()),
        description,
        summary: clean_optional(ep.summary.as_deref()),
        published_at: ep.published_at,
        duration_seconds: ep.duration_seconds,
        audio_url: ep.audio_url.clone(),
        episode_url: ep.episode_url.clone(),
        image_url: ep.image_url.clone(),
        source: ep.source,
        source_categories: ep.source_categories.clone(),
        matched_category: ep.matched_category,
    })
}

/// Normalize a batch. The first record carrying an id claims it, even if that
/// record is then rejected.
pub fn normalize_episodes(raw: &[Episode], opts: &NormalizeOptions) -> NormalizeOutcome {
    let mut seen: HashSet<&str> = HashSet::with_capacity(raw.len());
    let mut out = NormalizeOutcome {
        kept: Vec::with_capacity(raw.len()),
        skipped: Vec::new(),
    };

    for ep in raw {
        if !seen.insert(ep.id.as_str()) {
            out.skipped.push(SkipReason::DuplicateId { id: ep.id.clone() });
            continue;
        }
        match normalize_episode(ep, opts) {
            Ok(clean) => out.kept.push(clean),
            Err(reason) => {
                tracing::debug!(%reason, "normalizer skipped episode");
                out.skipped.push(reason);
            }
        }
    }

    out
}
