// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod digest;
pub mod metrics;
pub mod model;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::config::{KeywordTable, Settings};
pub use crate::digest::Digest;
pub use crate::model::{Category, Episode, Source};
pub use crate::pipeline::categorize::Categorizer;
pub use crate::pipeline::{run, PipelineReport};

use anyhow::{Context, Result};
use std::path::Path;

/// Read a JSON array of raw episodes, as written by the collectors.
pub fn load_episodes_json(path: &Path) -> Result<Vec<Episode>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading episodes from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing episodes from {}", path.display()))
}
