//! Audit pieces: top-competitor selection, generated recommendations with a
//! fixed fallback, and the templated executive summary.
//!
//! [`AnalyticsEngine::compute_audit`](crate::AnalyticsEngine::compute_audit)
//! combines these with the score, narrative and gap for one brand.

use std::sync::LazyLock;
use std::time::Duration;

use avs_core::Category;
use regex::Regex;

use crate::error::GenerationError;
use crate::generator::{generate_with_timeout, TextGenerator};
use crate::types::{BrandScore, GapAnalysis, NarrativeResult};

pub const RECOMMENDATION_COUNT: usize = 5;

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

/// Highest-scoring brand other than `brand` whose dominant category is
/// `category`. Ties keep the brand listed first.
#[must_use]
pub fn top_competitor<'a>(
    scores: &'a [BrandScore],
    brand: &str,
    category: Category,
) -> Option<&'a BrandScore> {
    scores
        .iter()
        .filter(|s| s.category == category && s.brand != brand)
        .fold(None, |best: Option<&BrandScore>, s| {
            if best.is_none_or(|b| s.raw_score > b.raw_score) {
                Some(s)
            } else {
                best
            }
        })
}

/// Pull the first JSON string array out of generated text, keeping at most
/// [`RECOMMENDATION_COUNT`] non-blank entries.
///
/// # Errors
///
/// [`GenerationError::Parse`] when no array parses, [`GenerationError::Empty`]
/// when it holds no usable entries.
pub fn parse_recommendations(text: &str) -> Result<Vec<String>, GenerationError> {
    let array = JSON_ARRAY
        .find(text)
        .ok_or_else(|| GenerationError::Parse("no JSON array in response".to_string()))?;
    let items: Vec<String> = serde_json::from_str(array.as_str())
        .map_err(|e| GenerationError::Parse(e.to_string()))?;

    let items: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(RECOMMENDATION_COUNT)
        .collect();
    if items.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(items)
}

#[must_use]
pub fn fallback_recommendations(category: Category) -> Vec<String> {
    vec![
        format!(
            "Increase mention frequency in {category} by publishing authoritative comparison \
             content that assistants cite."
        ),
        "Improve rank positions by targeting enterprise-intent queries, where assistant \
         recommendations carry the most buying intent."
            .to_string(),
        "Build authority signals: earn third-party reviews that describe the product as an \
         industry standard or best-in-class."
            .to_string(),
        "Keep brand representation consistent across ChatGPT, Gemini and Perplexity; \
         cross-assistant coverage lifts the visibility score."
            .to_string(),
        "Improve the sentiment ratio by addressing negative feedback patterns in the public \
         sources assistants draw on."
            .to_string(),
    ]
}

/// Headline paragraph: score, direction of the delta, tracked SOV, then the
/// narrative summary.
#[must_use]
pub fn executive_summary(
    score: &BrandScore,
    category: Category,
    narrative_summary: &str,
) -> String {
    let trend = if score.delta >= 0 {
        format!("up {} points", score.delta)
    } else {
        format!("down {} points", score.delta.unsigned_abs())
    };
    format!(
        "{} has a visibility score of {}/100 in the {category} category, {trend} from the \
         previous snapshot. Tracked share of voice stands at {}%. {narrative_summary}",
        score.brand, score.raw_score, score.tracked_sov,
    )
}

fn recommendations_prompt(
    score: &BrandScore,
    category: Category,
    narrative: &NarrativeResult,
    gap: Option<&GapAnalysis>,
) -> String {
    let competitor = gap.map_or_else(String::new, |g| {
        format!(
            "Top competitor: {} (score gap: {:+})\n",
            g.brand_b, g.score_difference
        )
    });
    format!(
        "You are a B2B SaaS positioning strategist focused on AI assistant visibility.\n\n\
         Brand: \"{brand}\" | Category: \"{category}\"\n\
         Visibility score: {raw}/100\n\
         Weighted score: {weighted}/100\n\
         Tracked share of voice: {sov}%\n\
         Trend delta: {delta:+} vs last snapshot\n\
         Narrative: {summary}\n\
         Authority score: {authority}/100\n\
         Signature adjectives: {adjectives}\n\
         {competitor}\n\
         Generate exactly {count} specific, actionable positioning recommendations to improve \
         AI visibility. Each should be 1-2 sentences. Format as a JSON array of strings.",
        brand = score.brand,
        raw = score.raw_score,
        weighted = score.weighted_score,
        sov = score.tracked_sov,
        delta = score.delta,
        summary = narrative.narrative_summary,
        authority = narrative.authority_strength_score,
        adjectives = narrative.signature_adjectives.join(", "),
        count = RECOMMENDATION_COUNT,
    )
}

/// Generated recommendations, or [`fallback_recommendations`] when the
/// generator fails, times out or answers without a usable array.
pub async fn recommendations(
    score: &BrandScore,
    category: Category,
    narrative: &NarrativeResult,
    gap: Option<&GapAnalysis>,
    generator: &dyn TextGenerator,
    timeout: Duration,
) -> Vec<String> {
    let prompt = recommendations_prompt(score, category, narrative, gap);
    let generated = generate_with_timeout(generator, &prompt, timeout)
        .await
        .and_then(|text| parse_recommendations(&text));

    match generated {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(
                brand = %score.brand,
                %category,
                error = %e,
                "recommendation generation failed; using fallback list"
            );
            fallback_recommendations(category)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssistantScores, ScoreComponents, SentimentCounts};

    fn score(brand: &str, category: Category, raw: u32, delta: i32) -> BrandScore {
        BrandScore {
            brand: brand.to_string(),
            category,
            raw_score: raw,
            weighted_score: raw,
            delta,
            components: ScoreComponents::default(),
            by_assistant: AssistantScores::default(),
            tracked_sov: 12.5,
            mention_count: 1,
            avg_rank: 1.0,
            sentiment: SentimentCounts::default(),
            coverage: vec![],
            history: vec![],
            is_recurring_winner: false,
            is_emerging: false,
            top_cited_reason: String::new(),
        }
    }

    #[test]
    fn top_competitor_is_best_other_brand_in_category() {
        let scores = vec![
            score("Asana", Category::ProjectManagement, 90, 0),
            score("Salesforce", Category::Crm, 80, 0),
            score("HubSpot", Category::Crm, 70, 0),
            score("Pipedrive", Category::Crm, 70, 0),
        ];
        let rival = top_competitor(&scores, "Salesforce", Category::Crm).expect("rival");
        assert_eq!(rival.brand, "HubSpot");

        let rival = top_competitor(&scores, "Pipedrive", Category::Crm).expect("rival");
        assert_eq!(rival.brand, "Salesforce");

        assert!(top_competitor(&scores, "Asana", Category::ProjectManagement).is_none());
    }

    #[test]
    fn parses_array_inside_prose() {
        let text = "Sure:\n[\"Publish benchmarks\", \"  \", \" Win analyst reviews \"]\nDone.";
        let items = parse_recommendations(text).unwrap();
        assert_eq!(items, ["Publish benchmarks", "Win analyst reviews"]);
    }

    #[test]
    fn keeps_at_most_five_recommendations() {
        let text = r#"["a","b","c","d","e","f","g"]"#;
        assert_eq!(parse_recommendations(text).unwrap().len(), RECOMMENDATION_COUNT);
    }

    #[test]
    fn rejects_missing_or_empty_arrays() {
        assert!(matches!(
            parse_recommendations("no list here"),
            Err(GenerationError::Parse(_))
        ));
        assert!(matches!(
            parse_recommendations("[1, 2]"),
            Err(GenerationError::Parse(_))
        ));
        assert!(matches!(
            parse_recommendations("[\"\", \" \"]"),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn fallback_has_five_items_naming_the_category() {
        let items = fallback_recommendations(Category::Crm);
        assert_eq!(items.len(), RECOMMENDATION_COUNT);
        assert!(items[0].contains("CRM"));
    }

    #[test]
    fn executive_summary_words_the_delta_direction() {
        let hubspot = score("HubSpot", Category::Crm, 71, 4);
        let up = executive_summary(&hubspot, Category::Crm, "Strong.");
        assert_eq!(
            up,
            "HubSpot has a visibility score of 71/100 in the CRM category, up 4 points from the \
             previous snapshot. Tracked share of voice stands at 12.5%. Strong."
        );

        let flat = executive_summary(&score("HubSpot", Category::Crm, 71, 0), Category::Crm, "");
        assert!(flat.contains("up 0 points"));

        let down = executive_summary(&score("HubSpot", Category::Crm, 71, -6), Category::Crm, "");
        assert!(down.contains("down 6 points"));
    }
}
