// src/config/settings.rs
//! Runtime knobs read from the environment (`.env` is loaded by the binary).

use crate::pipeline::normalize::{NormalizeOptions, DEFAULT_DESCRIPTION_LIMIT};

pub const ENV_MAX_PER_CATEGORY: &str = "DIGEST_MAX_PER_CATEGORY";
pub const ENV_DESCRIPTION_LIMIT: &str = "DIGEST_DESCRIPTION_LIMIT";

pub const DEFAULT_MAX_PER_CATEGORY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Cap applied per category when the digest is assembled.
    pub max_episodes_per_category: usize,
    /// Description truncation limit in chars.
    pub description_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_episodes_per_category: DEFAULT_MAX_PER_CATEGORY,
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
        }
    }
}

// parse a positive integer env value; anything else falls back to the default
fn parse_positive(raw: Option<String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_episodes_per_category = parse_positive(std::env::var(ENV_MAX_PER_CATEGORY).ok())
            .unwrap_or(defaults.max_episodes_per_category);
        let description_limit = parse_positive(std::env::var(ENV_DESCRIPTION_LIMIT).ok())
            .unwrap_or(defaults.description_limit);
        Self {
            max_episodes_per_category,
            description_limit,
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            description_limit: self.description_limit,
        }
    }
}
