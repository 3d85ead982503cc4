use std::path::Path;

use chrono::NaiveDate;

use super::*;
use crate::mention::Sentiment;

fn mention(id: &str, brand: &str, day: u32) -> Mention {
    Mention {
        id: id.to_string(),
        brand: brand.to_string(),
        category: Category::Crm,
        assistant: Assistant::Gemini,
        rank: 1,
        cited_reason: "reliable pipeline tracking".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
        sentiment: Sentiment::Positive,
    }
}

#[test]
fn validate_rejects_rank_zero() {
    let mut m = mention("m1", "HubSpot", 1);
    m.rank = 0;
    let file = MentionsFile { mentions: vec![m] };
    let err = validate_mentions(&file).unwrap_err();
    assert!(err.to_string().contains("invalid rank 0"));
}

#[test]
fn validate_rejects_empty_brand() {
    let file = MentionsFile {
        mentions: vec![mention("m1", "   ", 1)],
    };
    let err = validate_mentions(&file).unwrap_err();
    assert!(err.to_string().contains("empty brand"));
}

#[test]
fn validate_rejects_empty_id() {
    let file = MentionsFile {
        mentions: vec![mention("", "HubSpot", 1)],
    };
    let err = validate_mentions(&file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_duplicate_id() {
    let file = MentionsFile {
        mentions: vec![mention("m1", "HubSpot", 1), mention("m1", "Salesforce", 2)],
    };
    let err = validate_mentions(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate mention id"));
}

#[test]
fn validate_accepts_valid_mentions() {
    let file = MentionsFile {
        mentions: vec![mention("m1", "HubSpot", 1), mention("m2", "Salesforce", 2)],
    };
    assert!(validate_mentions(&file).is_ok());
}

#[test]
fn parses_yaml_with_display_labels() {
    let yaml = r"
mentions:
  - id: pm-1
    brand: Asana
    category: Project Management
    assistant: ChatGPT
    rank: 2
    cited_reason: Intuitive task boards
    date: 2026-02-20
    sentiment: Positive
";
    let file: MentionsFile = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(file.mentions.len(), 1);
    let m = &file.mentions[0];
    assert_eq!(m.category, Category::ProjectManagement);
    assert_eq!(m.assistant, Assistant::ChatGpt);
    assert_eq!(m.rank, 2);
}

#[test]
fn list_mentions_orders_newest_first() {
    let source = vec![
        mention("a", "HubSpot", 1),
        mention("b", "HubSpot", 3),
        mention("c", "HubSpot", 2),
    ];
    let out = list_mentions(&source, &MentionFilter::default());
    let ids: Vec<&str> = out.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["b", "c", "a"]);
}

#[test]
fn list_mentions_applies_every_filter_field() {
    let mut other_assistant = mention("c", "HubSpot", 1);
    other_assistant.assistant = Assistant::Perplexity;
    let source = vec![
        mention("a", "HubSpot", 1),
        mention("b", "Salesforce", 1),
        other_assistant,
    ];
    let filter = MentionFilter {
        brand: Some("HubSpot".to_string()),
        category: Some(Category::Crm),
        assistant: Some(Assistant::Gemini),
    };
    let out = list_mentions(&source, &filter);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "a");
}

#[test]
fn list_mentions_on_empty_source_is_empty() {
    assert!(list_mentions(&[], &MentionFilter::default()).is_empty());
}

#[test]
fn validate_identifier_trims_and_rejects_blank() {
    assert_eq!(validate_identifier("brand", "  Notion ").unwrap(), "Notion");
    let err = validate_identifier("brand", " ").unwrap_err();
    assert_eq!(err.to_string(), "brand must be non-empty");
}

#[test]
fn load_mentions_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("mentions.yaml");
    assert!(
        path.exists(),
        "mentions.yaml missing at {path:?}; required for this test"
    );
    let result = load_mentions(&path);
    assert!(result.is_ok(), "failed to load mentions.yaml: {result:?}");
    assert!(!result.unwrap().mentions.is_empty());
}
