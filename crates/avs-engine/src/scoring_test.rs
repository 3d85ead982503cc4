use avs_core::{Assistant, Category, Mention, Sentiment};
use chrono::NaiveDate;

use super::*;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
}

fn mention(
    brand: &str,
    assistant: Assistant,
    rank: u32,
    sentiment: Sentiment,
    category: Category,
) -> Mention {
    Mention {
        id: format!("{brand}-{assistant}-{rank}-{sentiment}"),
        brand: brand.to_string(),
        category,
        assistant,
        rank,
        cited_reason: format!("{brand} ranked {rank}"),
        date: date(20),
        sentiment,
    }
}

fn acme() -> Vec<Mention> {
    use Assistant::{ChatGpt, Gemini, Perplexity};
    use Sentiment::{Neutral, Positive};
    [
        (ChatGpt, 1, Positive),
        (ChatGpt, 2, Positive),
        (Gemini, 1, Positive),
        (Gemini, 3, Neutral),
        (Perplexity, 2, Positive),
    ]
    .into_iter()
    .map(|(a, r, s)| mention("Acme", a, r, s, Category::ProjectManagement))
    .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn acme_scenario_matches_reference_figures() {
    let mentions = acme();
    let refs: Vec<&Mention> = mentions.iter().collect();
    let v = visibility_score(&refs, 10);

    assert_close(v.components.frequency, 50.0);
    assert_close(average_rank(&refs), 1.8);
    assert_close(v.components.position, 84.0);
    assert_close(v.components.sentiment, 80.0);
    assert_close(v.components.cross_coverage, 100.0);
    assert_eq!(v.raw_score, 71);
}

#[test]
fn empty_mentions_score_zero_everywhere() {
    let v = visibility_score(&[], 10);
    assert_eq!(v, Visibility::default());
    assert_eq!(v.raw_score, 0);
}

#[test]
fn zero_max_frequency_does_not_divide() {
    let mentions = acme();
    let refs: Vec<&Mention> = mentions.iter().collect();
    let v = visibility_score(&refs, 0);
    assert_close(v.components.frequency, 0.0);
}

#[test]
fn position_clamps_at_rank_six_and_beyond() {
    let m = mention(
        "Deep",
        Assistant::Gemini,
        9,
        Sentiment::Neutral,
        Category::Crm,
    );
    let v = visibility_score(&[&m], 1);
    assert_close(v.components.position, 0.0);
}

#[test]
fn rank_one_gives_full_position_and_rank_five_gives_twenty() {
    let top = mention("Top", Assistant::Gemini, 1, Sentiment::Neutral, Category::Crm);
    let low = mention("Low", Assistant::Gemini, 5, Sentiment::Neutral, Category::Crm);
    assert_close(visibility_score(&[&top], 1).components.position, 100.0);
    assert_close(visibility_score(&[&low], 1).components.position, 20.0);
}

#[test]
fn raw_score_is_composite_of_components_for_generated_sets() {
    // Small LCG so the sweep is deterministic without extra crates.
    let mut seed: u64 = 0x5eed;
    let mut next = move |modulo: u64| {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (seed >> 33) % modulo
    };

    for round in 0..200 {
        let len = 1 + usize::try_from(next(12)).unwrap();
        let mentions: Vec<Mention> = (0..len)
            .map(|i| {
                let assistant = Assistant::ALL[usize::try_from(next(3)).unwrap()];
                let sentiment = match next(3) {
                    0 => Sentiment::Positive,
                    1 => Sentiment::Neutral,
                    _ => Sentiment::Negative,
                };
                let rank = 1 + u32::try_from(next(8)).unwrap();
                let mut m = mention("Gen", assistant, rank, sentiment, Category::AiWriting);
                m.id = format!("{round}-{i}");
                m
            })
            .collect();
        let refs: Vec<&Mention> = mentions.iter().collect();
        let max = len + usize::try_from(next(5)).unwrap();
        let v = visibility_score(&refs, max);

        for c in [
            v.components.frequency,
            v.components.position,
            v.components.sentiment,
            v.components.cross_coverage,
        ] {
            assert!((0.0..=100.0).contains(&c), "component out of range: {c}");
        }
        assert_eq!(v.raw_score, composite(&v.components));
        assert!(v.raw_score <= 100);
    }
}

#[test]
fn per_assistant_scores_use_each_assistants_own_maximum() {
    let mut mentions = acme();
    // A second brand with three Perplexity mentions raises only Perplexity's maximum.
    for rank in 1..=3 {
        let mut m = mention(
            "Rival",
            Assistant::Perplexity,
            rank,
            Sentiment::Positive,
            Category::ProjectManagement,
        );
        m.id = format!("rival-{rank}");
        mentions.push(m);
    }

    let scores = compute_scores(&mentions, &[], date(21));
    let acme = scores.iter().find(|s| s.brand == "Acme").unwrap();

    // ChatGPT: 2 mentions vs max 2 -> freq 100, avg rank 1.5 -> 90, all positive, coverage 1/3
    // round(40 + 27 + 20 + 3.33) = 90
    assert_eq!(acme.by_assistant.chatgpt, 90);
    // Perplexity: 1 mention vs max 3 -> freq 33.3, rank 2 -> 80, positive, coverage 1/3
    // round(13.33 + 24 + 20 + 3.33) = 61
    assert_eq!(acme.by_assistant.perplexity, 61);
}

#[test]
fn compute_scores_sorts_descending_and_fills_metadata() {
    let mut mentions = acme();
    let mut weak = mention(
        "Weak",
        Assistant::Gemini,
        5,
        Sentiment::Negative,
        Category::Crm,
    );
    weak.cited_reason = "rarely recommended".to_string();
    mentions.push(weak);

    let scores = compute_scores(&mentions, &[], date(21));
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].brand, "Acme");
    assert!(scores[0].raw_score >= scores[1].raw_score);

    let acme = &scores[0];
    assert_eq!(acme.mention_count, 5);
    assert_close(acme.avg_rank, 1.8);
    assert_eq!(acme.category, Category::ProjectManagement);
    assert_eq!(acme.sentiment.positive, 4);
    assert_eq!(acme.sentiment.neutral, 1);
    assert_eq!(acme.coverage, Assistant::ALL.to_vec());
    assert_close(acme.tracked_sov, 83.3);
    assert_eq!(acme.delta, 0);
    assert!(acme.history.is_empty());
    assert_eq!(acme.top_cited_reason, "Acme ranked 1");
    assert!(!acme.is_emerging, "three assistants cover Acme");

    let weak = &scores[1];
    assert_close(weak.tracked_sov, 16.7);
    assert_eq!(weak.category, Category::Crm);
    assert!(!weak.is_recurring_winner);
}

#[test]
fn weighted_score_uses_dominant_category_weight() {
    let scores = compute_scores(&acme(), &[], date(21));
    let acme = &scores[0];
    // Alone in the set, Acme normalises against itself: freq 100.
    // round(40 + 25.2 + 16 + 10) = 91; Project Management weight 0.76 -> round(69.16) = 69
    assert_eq!(acme.raw_score, 91);
    assert_eq!(acme.weighted_score, 69);
    assert!(acme.is_recurring_winner);
}

#[test]
fn dominant_category_ties_go_to_first_seen() {
    let a = mention("X", Assistant::Gemini, 1, Sentiment::Neutral, Category::Crm);
    let b = mention(
        "X",
        Assistant::Gemini,
        1,
        Sentiment::Neutral,
        Category::DesignTools,
    );
    assert_eq!(dominant_category([&a, &b].into_iter()), Some(Category::Crm));
    assert_eq!(
        dominant_category([&b, &a].into_iter()),
        Some(Category::DesignTools)
    );
    assert_eq!(dominant_category(std::iter::empty()), None);
}

#[test]
fn emerging_flag_requires_narrow_coverage_and_positive_lean() {
    let mentions: Vec<Mention> = [Sentiment::Positive, Sentiment::Positive, Sentiment::Neutral]
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let mut m = mention("Newco", Assistant::Gemini, 2, s, Category::AiWriting);
            m.id = format!("newco-{i}");
            m
        })
        .collect();
    let scores = compute_scores(&mentions, &[], date(21));
    assert!(scores[0].is_emerging);
}

#[test]
fn group_by_brand_preserves_first_seen_order() {
    let mentions = vec![
        mention("B", Assistant::Gemini, 1, Sentiment::Neutral, Category::Crm),
        mention("A", Assistant::Gemini, 1, Sentiment::Neutral, Category::Crm),
        mention("B", Assistant::ChatGpt, 2, Sentiment::Neutral, Category::Crm),
    ];
    let groups = group_by_brand(&mentions);
    let order: Vec<&str> = groups.iter().map(|(b, _)| *b).collect();
    assert_eq!(order, ["B", "A"]);
    assert_eq!(groups[0].1.len(), 2);
}

#[test]
fn prompt_matrix_picks_best_rank_per_cell() {
    let mentions = vec![
        mention("Salesforce", Assistant::ChatGpt, 2, Sentiment::Positive, Category::Crm),
        mention("HubSpot", Assistant::ChatGpt, 1, Sentiment::Positive, Category::Crm),
        mention("Pipedrive", Assistant::Gemini, 3, Sentiment::Neutral, Category::Crm),
        mention("Zoho", Assistant::Gemini, 3, Sentiment::Neutral, Category::Crm),
        mention("Figma", Assistant::Perplexity, 1, Sentiment::Positive, Category::DesignTools),
    ];
    let matrix = prompt_matrix(&mentions);

    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix[0].category, Category::Crm);
    let chatgpt = matrix[0].get(Assistant::ChatGpt).expect("chatgpt cell");
    assert_eq!((chatgpt.brand.as_str(), chatgpt.rank), ("HubSpot", 1));
    // equal ranks keep the earlier mention
    assert_eq!(matrix[0].gemini.as_ref().unwrap().brand, "Pipedrive");
    assert!(matrix[0].perplexity.is_none());

    assert_eq!(matrix[1].category, Category::DesignTools);
    assert_eq!(matrix[1].perplexity.as_ref().unwrap().brand, "Figma");
    assert!(matrix[1].chatgpt.is_none());
}

#[test]
fn prompt_matrix_of_nothing_is_empty() {
    assert!(prompt_matrix(&[]).is_empty());
}

#[test]
fn highlights_select_leader_winners_and_emerging() {
    let mut mentions: Vec<Mention> = Assistant::ALL
        .into_iter()
        .map(|a| mention("Big", a, 1, Sentiment::Positive, Category::Crm))
        .collect();
    mentions.push(mention("Newco", Assistant::Gemini, 2, Sentiment::Positive, Category::Crm));

    let scores = compute_scores(&mentions, &[], date(21));
    let picks = highlights(&scores);

    assert_eq!(picks.brand_of_the_day.as_ref().map(|s| s.brand.as_str()), Some("Big"));
    let winners: Vec<&str> = picks.recurring_winners.iter().map(|s| s.brand.as_str()).collect();
    assert_eq!(winners, ["Big"]);
    let emerging: Vec<&str> = picks.emerging_brands.iter().map(|s| s.brand.as_str()).collect();
    assert_eq!(emerging, ["Newco"]);

    assert!(highlights(&[]).brand_of_the_day.is_none());
}
