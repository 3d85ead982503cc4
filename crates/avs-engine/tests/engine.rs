//! End-to-end tests for `AnalyticsEngine` over the sample mentions file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use avs_core::{load_mentions, Category, Mention};
use avs_engine::audit::fallback_recommendations;
use avs_engine::{
    AnalyticsEngine, DisabledGenerator, EngineError, GenerationError, Generated, InMemoryStore,
    PositioningCategory, SnapshotStore, TextGenerator,
};
use chrono::NaiveDate;

fn sample_mentions() -> Vec<Mention> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/mentions.yaml");
    load_mentions(&path).expect("sample file loads").mentions
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
}

/// Slow generator that counts how often it is invoked.
struct Counting {
    calls: AtomicUsize,
    delay: Duration,
}

#[async_trait]
impl TextGenerator for Counting {
    async fn generate(&self, _prompt: &str) -> Result<Generated, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(Generated {
            text: r#"{"narrativeSummary": "Salesforce is the default enterprise CRM.",
                      "positioningCategory": "Leader",
                      "signatureAdjectives": ["dominant"],
                      "differentiationSignals": ["Ecosystem"]}"#
                .to_string(),
        })
    }
}

#[tokio::test]
async fn recorded_snapshots_drive_the_next_days_delta() {
    let store = Arc::new(InMemoryStore::new());
    let engine = AnalyticsEngine::new(
        Arc::new(DisabledGenerator),
        store.clone(),
        store.clone(),
        Duration::from_secs(1),
    );
    let all = sample_mentions();
    let first_day: Vec<Mention> = all.iter().filter(|m| m.date == date(20)).cloned().collect();

    let day_one = engine.compute_scores(&first_day, None, date(20)).await.unwrap();
    engine
        .record_snapshots(&day_one, date(20))
        .await
        .expect("snapshot task completes");

    let day_two = engine.compute_scores(&all, None, date(22)).await.unwrap();
    for score in &day_two {
        let prior = day_one.iter().find(|s| s.brand == score.brand);
        let expected = prior.map_or(0, |p| {
            i32::try_from(score.raw_score).unwrap() - i32::try_from(p.raw_score).unwrap()
        });
        assert_eq!(score.delta, expected, "delta for {}", score.brand);
        assert_eq!(score.history.len(), usize::from(prior.is_some()));
    }

    let asana = store.load_score_history("Asana").await.unwrap();
    assert_eq!(asana.len(), 1);
    assert_eq!(asana[0].snapshot_date, date(20));
}

#[tokio::test]
async fn same_day_rerecording_upserts() {
    let store = Arc::new(InMemoryStore::new());
    let engine = AnalyticsEngine::new(
        Arc::new(DisabledGenerator),
        store.clone(),
        store.clone(),
        Duration::from_secs(1),
    );
    let all = sample_mentions();
    let scores = engine.compute_scores(&all, None, date(21)).await.unwrap();

    engine.record_snapshots(&scores, date(21)).await.unwrap();
    engine.record_snapshots(&scores, date(21)).await.unwrap();

    assert_eq!(store.snapshot_count().await, scores.len());
    let again = engine.compute_scores(&all, None, date(21)).await.unwrap();
    assert!(again.iter().all(|s| s.delta == 0));
}

#[tokio::test]
async fn concurrent_narrative_requests_generate_once() {
    let generator = Arc::new(Counting {
        calls: AtomicUsize::new(0),
        delay: Duration::from_millis(50),
    });
    let engine = AnalyticsEngine::in_memory(generator.clone(), Duration::from_secs(5));
    let mentions = sample_mentions();

    let (a, b) = tokio::join!(
        engine.compute_narrative("Salesforce", Category::Crm, &mentions, date(21)),
        engine.compute_narrative("Salesforce", Category::Crm, &mentions, date(21)),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(a, b);
    assert_eq!(a.narrative_summary, "Salesforce is the default enterprise CRM.");
}

#[tokio::test]
async fn gap_with_unknown_brand_is_not_found() {
    let engine = AnalyticsEngine::in_memory(Arc::new(DisabledGenerator), Duration::from_secs(1));
    let err = engine
        .compute_gap("Asana", "Trello", &sample_mentions(), date(21))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn generator_timeout_falls_back_to_template() {
    let generator = Arc::new(Counting {
        calls: AtomicUsize::new(0),
        delay: Duration::from_secs(5),
    });
    let engine = AnalyticsEngine::in_memory(generator, Duration::from_millis(50));

    let gap = engine
        .compute_gap("Notion", "Asana", &sample_mentions(), date(21))
        .await
        .expect("gap never fails on generation");
    let templated = avs_engine::gap::fallback_summary(&gap);
    assert_eq!(gap.summary, templated);
}

#[tokio::test]
async fn category_view_does_not_skew_next_days_delta() {
    let engine = AnalyticsEngine::in_memory(Arc::new(DisabledGenerator), Duration::from_secs(1));
    let all = sample_mentions();

    let crm = engine
        .compute_scores(&all, Some(Category::Crm), date(20))
        .await
        .unwrap();
    assert!(!crm.is_empty());
    assert!(crm.iter().all(|s| s.category == Category::Crm));
    engine.record_snapshots(&crm, date(20)).await.unwrap();

    let next_day = engine.compute_scores(&all, None, date(21)).await.unwrap();
    for score in &next_day {
        assert_eq!(score.delta, 0, "delta for {}", score.brand);
    }
    let salesforce = next_day.iter().find(|s| s.brand == "Salesforce").unwrap();
    assert_eq!(salesforce.history.len(), 1);
}

#[tokio::test]
async fn category_view_keeps_whole_set_normalisation() {
    let engine = AnalyticsEngine::in_memory(Arc::new(DisabledGenerator), Duration::from_secs(1));
    let all = sample_mentions();

    let everything = engine.compute_scores(&all, None, date(21)).await.unwrap();
    let crm = engine
        .compute_scores(&all, Some(Category::Crm), date(21))
        .await
        .unwrap();
    for score in &crm {
        let same = everything.iter().find(|s| s.brand == score.brand).unwrap();
        assert_eq!(score, same);
    }
}

/// Answers every prompt with the same JSON list.
struct Advisor;

#[async_trait]
impl TextGenerator for Advisor {
    async fn generate(&self, _prompt: &str) -> Result<Generated, GenerationError> {
        Ok(Generated {
            text: r#"Here you go: ["Publish benchmark reports", "Court analyst coverage"]"#
                .to_string(),
        })
    }
}

#[tokio::test]
async fn audit_falls_back_and_targets_the_top_competitor() {
    let engine = AnalyticsEngine::in_memory(Arc::new(DisabledGenerator), Duration::from_secs(1));
    let all = sample_mentions();

    let crm = engine
        .compute_scores(&all, Some(Category::Crm), date(21))
        .await
        .unwrap();
    let audited = crm.last().expect("at least two CRM brands");
    let leader = &crm[0];
    assert_ne!(audited.brand, leader.brand);

    let report = engine
        .compute_audit(&audited.brand, Category::Crm, &all, date(21))
        .await
        .unwrap();

    assert_eq!(report.raw_score, audited.raw_score);
    assert_eq!(report.recommendations, fallback_recommendations(Category::Crm));
    assert_eq!(report.narrative.positioning, PositioningCategory::Emerging);
    assert_eq!(report.authority_strength_score, report.narrative.authority_strength_score);
    let gap = report.top_competitor_gap.expect("competitor gap");
    assert_eq!(gap.brand_a, audited.brand);
    assert_eq!(gap.brand_b, leader.brand);
    assert!(report
        .executive_summary
        .starts_with(&format!("{} has a visibility score of", audited.brand)));
    assert!(report.executive_summary.contains("up 0 points"));
}

#[tokio::test]
async fn audit_uses_generated_recommendations() {
    let engine = AnalyticsEngine::in_memory(Arc::new(Advisor), Duration::from_secs(1));
    let report = engine
        .compute_audit("Salesforce", Category::Crm, &sample_mentions(), date(21))
        .await
        .unwrap();
    assert_eq!(
        report.recommendations,
        ["Publish benchmark reports", "Court analyst coverage"]
    );
}

#[tokio::test]
async fn audit_outside_the_brands_category_is_not_found() {
    let engine = AnalyticsEngine::in_memory(Arc::new(DisabledGenerator), Duration::from_secs(1));
    let err = engine
        .compute_audit("Salesforce", Category::DesignTools, &sample_mentions(), date(21))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
