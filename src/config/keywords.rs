// src/config/keywords.rs
//! Category keyword table: ordered `{ key, keywords }` entries.
//!
//! Declaration order is the categorizer's tie-break priority, so the table is a
//! `Vec` rather than a map, in code and on disk (`[[category]]` arrays).

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_KEYWORDS_PATH: &str = "DIGEST_KEYWORDS_PATH";
pub const DEFAULT_KEYWORDS_TOML: &str = "config/keywords.toml";
pub const DEFAULT_KEYWORDS_JSON: &str = "config/keywords.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub key: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    #[serde(rename = "category")]
    pub categories: Vec<CategoryKeywords>,
}

impl KeywordTable {
    pub fn new(categories: Vec<CategoryKeywords>) -> Self {
        Self { categories }
    }

    /// Reject tables the categorizer cannot score deterministically.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("keyword table has no categories");
        }
        let mut seen = HashSet::new();
        for cat in &self.categories {
            let key = cat.key.trim();
            if key.is_empty() {
                bail!("keyword table has a category with a blank key");
            }
            if !seen.insert(key) {
                bail!("keyword table declares category {key:?} twice");
            }
            if let Some(i) = cat.keywords.iter().position(|k| k.trim().is_empty()) {
                bail!("category {key:?} has a blank keyword at index {i}");
            }
        }
        Ok(())
    }

    /// Table shipped with the crate (mirrors `config/keywords.toml`).
    pub fn builtin() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "tech_startups",
                &[
                    "tech", "technology", "startup", "startups", "entrepreneur",
                    "silicon valley", "software", "programming", "developer", "coding", "ai",
                    "artificial intelligence", "machine learning", "data science",
                    "venture capital", "vc", "saas", "product", "innovation", "disruption",
                    "founder", "ceo", "cto", "engineering",
                ],
            ),
            (
                "philosophy",
                &[
                    "philosophy", "philosophical", "ethics", "moral", "meaning", "existence",
                    "consciousness", "wisdom", "stoic", "stoicism", "meditation", "mindfulness",
                    "buddhism", "zen", "spiritual", "metaphysics", "epistemology",
                ],
            ),
            (
                "lifestyle_personal_growth",
                &[
                    "lifestyle", "personal growth", "self-improvement", "self-help", "habits",
                    "productivity", "motivation", "inspiration", "happiness", "relationships",
                    "dating", "marriage", "parenting", "family", "minimalism", "creativity",
                ],
            ),
            (
                "career_development",
                &[
                    "career", "job", "employment", "professional", "work", "workplace",
                    "interview", "resume", "networking", "promotion", "salary", "negotiation",
                    "remote work", "freelance", "side hustle", "skill", "learning",
                ],
            ),
            (
                "health_longevity",
                &[
                    "health", "longevity", "aging", "anti-aging", "lifespan", "wellness",
                    "nutrition", "diet", "fasting", "supplement", "biohacking", "medical",
                    "doctor", "disease", "prevention", "immune", "gut health", "mental health",
                ],
            ),
            (
                "fitness_weight_training",
                &[
                    "fitness", "weight training", "weightlifting", "strength", "muscle",
                    "bodybuilding", "gym", "workout", "exercise", "lifting", "powerlifting",
                    "crossfit", "running", "cardio", "sports", "athletic", "performance",
                ],
            ),
            (
                "sleep_management",
                &[
                    "sleep", "insomnia", "rest", "recovery", "circadian", "melatonin", "dream",
                    "nap", "fatigue", "energy", "tired", "bedtime",
                ],
            ),
        ];

        Self::new(
            table
                .iter()
                .map(|(key, words)| CategoryKeywords {
                    key: (*key).to_string(),
                    keywords: words.iter().map(|w| (*w).to_string()).collect(),
                })
                .collect(),
        )
    }
}

/// Load a keyword table from an explicit path. Supports TOML or JSON formats.
pub fn load_keywords_from(path: &Path) -> Result<KeywordTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading keyword table from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let table = parse_keywords(&content, ext.as_str())
        .with_context(|| format!("parsing keyword table {}", path.display()))?;
    table.validate()?;
    Ok(table)
}

/// Load the keyword table using env var + fallbacks:
/// 1) $DIGEST_KEYWORDS_PATH
/// 2) config/keywords.toml
/// 3) config/keywords.json
/// 4) built-in table
pub fn load_keywords_default() -> Result<KeywordTable> {
    if let Ok(p) = std::env::var(ENV_KEYWORDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_keywords_from(&pb);
        }
        return Err(anyhow!("{ENV_KEYWORDS_PATH} points to non-existent path"));
    }
    let toml_p = PathBuf::from(DEFAULT_KEYWORDS_TOML);
    if toml_p.exists() {
        return load_keywords_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_KEYWORDS_JSON);
    if json_p.exists() {
        return load_keywords_from(&json_p);
    }
    tracing::debug!("no keyword table on disk, using built-in table");
    Ok(KeywordTable::builtin())
}

fn parse_keywords(s: &str, hint_ext: &str) -> Result<KeywordTable> {
    // JSON documents start with `{`; anything else is tried as TOML first.
    let try_json_first = hint_ext == "json" || s.trim_start().starts_with('{');
    if try_json_first {
        if let Ok(t) = serde_json::from_str::<KeywordTable>(s) {
            return Ok(clean_table(t));
        }
    }
    match toml::from_str::<KeywordTable>(s) {
        Ok(t) => Ok(clean_table(t)),
        Err(toml_err) if !try_json_first => serde_json::from_str::<KeywordTable>(s)
            .map(clean_table)
            .map_err(|_| anyhow!("unsupported keyword table format: {toml_err}")),
        Err(_) => Err(anyhow!("unsupported keyword table format")),
    }
}

/// Trim and lower-case phrases; keys are trimmed. Order is preserved.
fn clean_table(table: KeywordTable) -> KeywordTable {
    KeywordTable::new(
        table
            .categories
            .into_iter()
            .map(|c| CategoryKeywords {
                key: c.key.trim().to_string(),
                keywords: c
                    .keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .collect(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_keep_declared_order() {
        let toml = r#"
[[category]]
key = "sleep_management"
keywords = [" Sleep ", "nap"]

[[category]]
key = "tech_startups"
keywords = ["tech"]
"#;
        let json = r#"{"category": [
            {"key": "sleep_management", "keywords": ["sleep", "nap"]},
            {"key": "tech_startups", "keywords": ["TECH"]}
        ]}"#;
        let a = parse_keywords(toml, "toml").unwrap();
        let b = parse_keywords(json, "json").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.categories[0].key, "sleep_management");
        assert_eq!(a.categories[0].keywords, vec!["sleep", "nap"]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_keywords("not a table at all = = =", "").is_err());
    }

    #[test]
    fn validation_catches_bad_tables() {
        assert!(KeywordTable::new(vec![]).validate().is_err());

        let dup = KeywordTable::new(vec![
            CategoryKeywords {
                key: "a".into(),
                keywords: vec!["x".into()],
            },
            CategoryKeywords {
                key: "a".into(),
                keywords: vec!["y".into()],
            },
        ]);
        assert!(dup.validate().is_err());

        let blank_kw = KeywordTable::new(vec![CategoryKeywords {
            key: "a".into(),
            keywords: vec!["  ".into()],
        }]);
        assert!(blank_kw.validate().is_err());

        assert!(KeywordTable::builtin().validate().is_ok());
    }

    #[test]
    fn shipped_config_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_KEYWORDS_TOML);
        let on_disk = load_keywords_from(&path).unwrap();
        assert_eq!(on_disk, KeywordTable::builtin());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so the repo's own config/ is not picked up.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_KEYWORDS_PATH);

        // Nothing on disk: built-in table.
        assert_eq!(load_keywords_default().unwrap(), KeywordTable::builtin());

        // Env wins.
        let p_json = tmp.path().join("kw.json");
        fs::write(&p_json, r#"{"category":[{"key":"philosophy","keywords":["zen"]}]}"#).unwrap();
        env::set_var(ENV_KEYWORDS_PATH, p_json.display().to_string());
        let v = load_keywords_default().unwrap();
        assert_eq!(v.categories.len(), 1);
        assert_eq!(v.categories[0].keywords, vec!["zen".to_string()]);

        // Env pointing nowhere is an error, not a silent fallback.
        env::set_var(ENV_KEYWORDS_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(load_keywords_default().is_err());
        env::remove_var(ENV_KEYWORDS_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
