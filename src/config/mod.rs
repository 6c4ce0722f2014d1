// src/config/mod.rs
pub mod keywords;
pub mod settings;

pub use keywords::{load_keywords_default, load_keywords_from, CategoryKeywords, KeywordTable};
pub use settings::Settings;
