//! Head-to-head gap analysis between two brands.
//!
//! Both brands are scored over the full mention set so that brands spanning
//! several categories are compared on equal footing. The category reported on
//! the gap is the one holding most of the pair's combined mentions.

use std::time::Duration;

use avs_core::{validate_identifier, Assistant, Category, Mention};
use chrono::NaiveDate;

use crate::error::EngineError;
use crate::generator::{generate_with_timeout, TextGenerator};
use crate::intent::IntentType;
use crate::scoring::{compute_scores, dominant_category, round_to_tenth, FALLBACK_CATEGORY};
use crate::types::{AdjectiveComparison, AvsSnapshot, BrandScore, GapAnalysis};

/// Descriptors searched for in cited reasons, in reporting order.
pub const ADJECTIVE_VOCABULARY: [&str; 24] = [
    "powerful",
    "intuitive",
    "scalable",
    "affordable",
    "reliable",
    "fast",
    "flexible",
    "simple",
    "robust",
    "enterprise",
    "modern",
    "collaborative",
    "feature-rich",
    "easy",
    "efficient",
    "comprehensive",
    "innovative",
    "trusted",
    "popular",
    "leading",
    "advanced",
    "customizable",
    "integrations",
    "secure",
];

const MAX_ADJECTIVES: usize = 6;

/// First six vocabulary terms found (case-insensitive substring) in the
/// concatenated cited reasons.
#[must_use]
pub fn extract_adjectives<'a>(mentions: impl IntoIterator<Item = &'a Mention>) -> Vec<String> {
    let text = mentions
        .into_iter()
        .map(|m| m.cited_reason.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    ADJECTIVE_VOCABULARY
        .iter()
        .filter(|adj| text.contains(*adj))
        .take(MAX_ADJECTIVES)
        .map(|adj| (*adj).to_string())
        .collect()
}

/// Category with the most mentions across both brands; ties go to the first
/// encountered, and a pair with no mentions falls back to the default.
#[must_use]
pub fn gap_category(mentions: &[Mention], brand_a: &str, brand_b: &str) -> Category {
    dominant_category(
        mentions
            .iter()
            .filter(|m| m.brand == brand_a || m.brand == brand_b),
    )
    .unwrap_or(FALLBACK_CATEGORY)
}

/// Percentage of a brand's mentions that are positive; a zero count is treated as one.
fn positive_percent(score: &BrandScore) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ratio = score.sentiment.positive as f64 / score.mention_count.max(1) as f64;
    ratio * 100.0
}

/// Every numeric and categorical part of the gap, with the templated summary.
///
/// # Errors
///
/// [`EngineError::InvalidInput`] for blank or identical brand names,
/// [`EngineError::NotFound`] when either brand has no mentions.
pub fn compute_gap_metrics(
    brand_a: &str,
    brand_b: &str,
    mentions: &[Mention],
    history: &[AvsSnapshot],
    as_of: NaiveDate,
) -> Result<GapAnalysis, EngineError> {
    let brand_a = validate_identifier("brand_a", brand_a)?;
    let brand_b = validate_identifier("brand_b", brand_b)?;
    if brand_a == brand_b {
        return Err(EngineError::InvalidInput(format!(
            "cannot compare {brand_a} with itself"
        )));
    }

    let scores = compute_scores(mentions, history, as_of);
    let find = |brand: &str| {
        scores
            .iter()
            .find(|s| s.brand == brand)
            .ok_or_else(|| EngineError::NotFound(brand.to_string()))
    };
    let score_a = find(brand_a)?;
    let score_b = find(brand_b)?;

    let category = gap_category(mentions, brand_a, brand_b);

    let score_difference =
        i32::try_from(i64::from(score_a.raw_score) - i64::from(score_b.raw_score)).unwrap_or(0);
    let sov_difference = round_to_tenth(score_a.tracked_sov - score_b.tracked_sov);
    let sentiment_gap_percent =
        round_to_tenth(positive_percent(score_a) - positive_percent(score_b));

    let assistants_where_competitor_leads: Vec<Assistant> = Assistant::ALL
        .into_iter()
        .filter(|a| score_b.by_assistant.get(*a) > score_a.by_assistant.get(*a))
        .collect();

    let in_category = |brand: &str| {
        mentions
            .iter()
            .filter(|m| m.brand == brand && m.category == category)
            .count()
    };
    let competitor_owns_best = in_category(brand_b) > in_category(brand_a);
    let competitor_owns_enterprise = score_b.by_assistant.chatgpt > score_a.by_assistant.chatgpt;
    let intent_clusters_competitor_dominates: Vec<IntentType> = IntentType::ALL
        .into_iter()
        .filter(|intent| match intent {
            IntentType::Best => competitor_owns_best,
            IntentType::Enterprise => competitor_owns_enterprise,
            _ => false,
        })
        .collect();

    let adjectives = AdjectiveComparison {
        brand_a: extract_adjectives(mentions.iter().filter(|m| m.brand == brand_a)),
        brand_b: extract_adjectives(mentions.iter().filter(|m| m.brand == brand_b)),
    };

    let mut gap = GapAnalysis {
        brand_a: brand_a.to_string(),
        brand_b: brand_b.to_string(),
        category,
        as_of,
        score_difference,
        sov_difference,
        sentiment_gap_percent,
        assistants_where_competitor_leads,
        intent_clusters_competitor_dominates,
        adjectives,
        summary: String::new(),
    };
    gap.summary = fallback_summary(&gap);
    Ok(gap)
}

/// Full gap analysis. The summary comes from `generator` when it answers in
/// time and from [`fallback_summary`] otherwise.
///
/// # Errors
///
/// Same as [`compute_gap_metrics`]; generation failures are never returned.
pub async fn compute_gap(
    brand_a: &str,
    brand_b: &str,
    mentions: &[Mention],
    history: &[AvsSnapshot],
    as_of: NaiveDate,
    generator: &dyn TextGenerator,
    timeout: Duration,
) -> Result<GapAnalysis, EngineError> {
    let mut gap = compute_gap_metrics(brand_a, brand_b, mentions, history, as_of)?;

    match generate_with_timeout(generator, &summary_prompt(&gap), timeout).await {
        Ok(text) => gap.summary = text,
        Err(e) => {
            tracing::warn!(
                brand_a = %gap.brand_a,
                brand_b = %gap.brand_b,
                error = %e,
                "gap summary generation failed; using templated summary"
            );
        }
    }
    Ok(gap)
}

/// Deterministic two-branch summary built from the score and SOV differences.
#[must_use]
pub fn fallback_summary(gap: &GapAnalysis) -> String {
    let (a, b) = (&gap.brand_a, &gap.brand_b);
    if gap.score_difference < 0 {
        format!(
            "Why {b} Is Beating {a}: {b} holds a {}-point visibility advantage and {:.1}% more \
             tracked share of voice. To close this gap, {a} should improve its rank positions \
             in assistant recommendations and build stronger citation authority.",
            gap.score_difference.unsigned_abs(),
            gap.sov_difference.abs(),
        )
    } else {
        format!(
            "{a} currently leads {b} by {} visibility points and {:.1}% tracked share of voice. \
             Keeping its narrative consistent across all three assistants will protect the lead.",
            gap.score_difference, gap.sov_difference,
        )
    }
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn summary_prompt(gap: &GapAnalysis) -> String {
    let (a, b) = (&gap.brand_a, &gap.brand_b);
    let verdict = if gap.score_difference < 0 {
        "Beating"
    } else {
        "Trailing"
    };
    let assistants: Vec<String> = gap
        .assistants_where_competitor_leads
        .iter()
        .map(ToString::to_string)
        .collect();
    let intents: Vec<String> = gap
        .intent_clusters_competitor_dominates
        .iter()
        .map(ToString::to_string)
        .collect();

    format!(
        "You are a competitive AI positioning analyst. Write a direct 3-4 sentence analysis.\n\
         \n\
         Brand being analyzed: \"{a}\"\n\
         Competitor: \"{b}\"\n\
         Category: \"{category}\"\n\
         \n\
         Data:\n\
         - Visibility score difference: {score} (negative means {a} is behind)\n\
         - Tracked share of voice difference: {sov:.1}%\n\
         - Sentiment gap: {sentiment:.1}% (positive means {a} has better sentiment)\n\
         - Assistants where {b} outperforms: {assistants}\n\
         - Intent clusters where {b} dominates: {intents}\n\
         - {a} is described as: {adj_a}\n\
         - {b} is described as: {adj_b}\n\
         \n\
         Start with \"Why {b} Is {verdict} {a}:\". Cite the numbers. End with one \
         actionable insight.\n",
        category = gap.category,
        score = gap.score_difference,
        sov = gap.sov_difference,
        sentiment = gap.sentiment_gap_percent,
        assistants = join_or(&assistants, "none"),
        intents = join_or(&intents, "none identified"),
        adj_a = join_or(&gap.adjectives.brand_a, "insufficient data"),
        adj_b = join_or(&gap.adjectives.brand_b, "insufficient data"),
    )
}

#[cfg(test)]
#[path = "gap_test.rs"]
mod tests;
