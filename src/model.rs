// src/model.rs
//! Episode record and the closed `Source` / `Category` sets it refers to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collector that produced a raw episode. Declared in dedup priority order
/// (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    PodcastIndex,
    Spotify,
    ApplePodcasts,
    ListenNotes,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::PodcastIndex,
        Source::Spotify,
        Source::ApplePodcasts,
        Source::ListenNotes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::PodcastIndex => "podcast_index",
            Source::Spotify => "spotify",
            Source::ApplePodcasts => "apple_podcasts",
            Source::ListenNotes => "listen_notes",
        }
    }

    /// Bonus added to a survivor candidate's completeness score.
    pub fn priority_bonus(self) -> u32 {
        match self {
            Source::PodcastIndex => 3,
            Source::Spotify => 2,
            Source::ApplePodcasts => 1,
            Source::ListenNotes => 0,
        }
    }
}

/// Topical classification. `Uncategorized` is the fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TechStartups,
    BusinessFinance,
    NewsCurrentEvents,
    Philosophy,
    LifestylePersonalGrowth,
    CareerDevelopment,
    HealthLongevity,
    FitnessWeightTraining,
    SleepManagement,
    #[default]
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::TechStartups,
        Category::BusinessFinance,
        Category::NewsCurrentEvents,
        Category::Philosophy,
        Category::LifestylePersonalGrowth,
        Category::CareerDevelopment,
        Category::HealthLongevity,
        Category::FitnessWeightTraining,
        Category::SleepManagement,
        Category::Uncategorized,
    ];

    /// Key used by the keyword table and the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Category::TechStartups => "tech_startups",
            Category::BusinessFinance => "business_finance",
            Category::NewsCurrentEvents => "news_current_events",
            Category::Philosophy => "philosophy",
            Category::LifestylePersonalGrowth => "lifestyle_personal_growth",
            Category::CareerDevelopment => "career_development",
            Category::HealthLongevity => "health_longevity",
            Category::FitnessWeightTraining => "fitness_weight_training",
            Category::SleepManagement => "sleep_management",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// Map a keyword-table key to its category. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::TechStartups => "Tech & Startups",
            Category::BusinessFinance => "Business & Finance",
            Category::NewsCurrentEvents => "News & Current Events",
            Category::Philosophy => "Philosophy",
            Category::LifestylePersonalGrowth => "Lifestyle & Personal Growth",
            Category::CareerDevelopment => "Career Development",
            Category::HealthLongevity => "Health & Longevity",
            Category::FitnessWeightTraining => "Fitness & Weight Training",
            Category::SleepManagement => "Sleep Management",
            Category::Uncategorized => "Other Picks",
        }
    }
}

/// A single podcast episode as reported by one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub podcast_title: String,
    #[serde(default)]
    pub podcast_author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub episode_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub source: Source,
    #[serde(default)]
    pub source_categories: Vec<String>,
    #[serde(default)]
    pub matched_category: Category,
}

impl Episode {
    /// Minimal record; optional fields start empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        podcast_title: impl Into<String>,
        source: Source,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            podcast_title: podcast_title.into(),
            podcast_author: None,
            description: None,
            summary: None,
            published_at: None,
            duration_seconds: None,
            audio_url: None,
            episode_url: None,
            image_url: None,
            source,
            source_categories: Vec::new(),
            matched_category: Category::Uncategorized,
        }
    }

    /// Duration as `H:MM:SS` or `M:SS`; `Unknown` when missing or zero.
    pub fn duration_formatted(&self) -> String {
        let secs = match self.duration_seconds {
            Some(s) if s > 0 => s,
            _ => return "Unknown".to_string(),
        };
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}
