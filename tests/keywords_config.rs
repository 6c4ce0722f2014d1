// tests/keywords_config.rs
use podcast_digest::config::{load_keywords_from, KeywordTable};
use podcast_digest::{Categorizer, Category, Episode, Source};
use std::fs;

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("keywords.toml");
    fs::write(
        &p_toml,
        r#"
[[category]]
key = "philosophy"
keywords = ["Stoic", " zen "]

[[category]]
key = "sleep_management"
keywords = ["nap"]
"#,
    )
    .unwrap();
    let t = load_keywords_from(&p_toml).unwrap();
    assert_eq!(t.categories[0].key, "philosophy");
    assert_eq!(t.categories[0].keywords, vec!["stoic", "zen"]);

    let p_json = dir.path().join("keywords.json");
    fs::write(
        &p_json,
        r#"{"category":[{"key":"philosophy","keywords":["stoic","zen"]},{"key":"sleep_management","keywords":["nap"]}]}"#,
    )
    .unwrap();
    assert_eq!(load_keywords_from(&p_json).unwrap(), t);
}

#[test]
fn duplicate_keys_fail_loading() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("keywords.toml");
    fs::write(
        &p,
        r#"
[[category]]
key = "philosophy"
keywords = ["zen"]

[[category]]
key = "philosophy"
keywords = ["stoic"]
"#,
    )
    .unwrap();
    let err = load_keywords_from(&p).unwrap_err();
    assert!(format!("{err:#}").contains("twice"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_keywords_from(&dir.path().join("nope.toml")).is_err());
}

#[test]
fn substitute_table_drives_classification() {
    let table = KeywordTable::new(vec![podcast_digest::config::CategoryKeywords {
        key: "business_finance".into(),
        keywords: vec!["index funds".into(), "earnings".into()],
    }]);
    let categorizer = Categorizer::new(&table).unwrap();
    let ep = Episode::new("x", "Earnings season and index funds", "Money Talk", Source::Spotify);
    assert_eq!(categorizer.classify(&ep), Category::BusinessFinance);
}
