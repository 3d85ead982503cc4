//! Visibility Score: four weighted components per brand and their composite.
//!
//! ```text
//! raw = round(0.4 × frequency + 0.3 × position + 0.2 × sentiment + 0.1 × cross_coverage)
//! ```
//!
//! Frequency is normalised against the most-mentioned brand, so a score only
//! has meaning relative to the mention set it was computed from.

use std::collections::HashMap;

use avs_core::{Assistant, Category, Mention, Sentiment};
use chrono::NaiveDate;

use crate::intent::weighted_score;
use crate::sov::tracked_share;
use crate::trend::{compute_delta, history_series};
use crate::types::{
    AssistantScores, AvsSnapshot, BrandScore, Highlights, MatrixLeader, PromptMatrixRow,
    ScoreComponents, SentimentCounts,
};

pub const FREQUENCY_WEIGHT: f64 = 0.4;
pub const POSITION_WEIGHT: f64 = 0.3;
pub const SENTIMENT_WEIGHT: f64 = 0.2;
pub const COVERAGE_WEIGHT: f64 = 0.1;

/// Raw score at or above which a brand counts as a recurring winner.
pub const RECURRING_WINNER_THRESHOLD: u32 = 75;

/// Category used when no mention identifies one.
pub const FALLBACK_CATEGORY: Category = Category::ProjectManagement;

/// Number of persisted scores carried on each [`BrandScore`].
const HISTORY_LEN: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Visibility {
    pub components: ScoreComponents,
    pub raw_score: u32,
}

/// Score one brand's mentions against the largest mention count in scope.
///
/// An empty slice scores zero everywhere; a zero `max_frequency` zeroes the
/// frequency component instead of dividing by it.
#[must_use]
pub fn visibility_score(mentions: &[&Mention], max_frequency: usize) -> Visibility {
    if mentions.is_empty() {
        return Visibility::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let count = mentions.len() as f64;

    #[allow(clippy::cast_precision_loss)]
    let frequency = if max_frequency == 0 {
        0.0
    } else {
        count / max_frequency as f64 * 100.0
    };

    // rank 1 -> 100, rank 5 -> 20, rank >= 6 -> 0
    let position = ((6.0 - average_rank(mentions)) / 5.0 * 100.0).max(0.0);

    #[allow(clippy::cast_precision_loss)]
    let positive = mentions
        .iter()
        .filter(|m| m.sentiment == Sentiment::Positive)
        .count() as f64;
    let sentiment = positive / count * 100.0;

    #[allow(clippy::cast_precision_loss)]
    let covered = coverage(mentions).len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let cross_coverage = covered / Assistant::ALL.len() as f64 * 100.0;

    let components = ScoreComponents {
        frequency: frequency.clamp(0.0, 100.0),
        position: position.clamp(0.0, 100.0),
        sentiment: sentiment.clamp(0.0, 100.0),
        cross_coverage: cross_coverage.clamp(0.0, 100.0),
    };

    Visibility {
        components,
        raw_score: composite(&components),
    }
}

/// Weighted sum of the components, rounded and capped at 100.
#[must_use]
pub fn composite(components: &ScoreComponents) -> u32 {
    let sum = components.frequency * FREQUENCY_WEIGHT
        + components.position * POSITION_WEIGHT
        + components.sentiment * SENTIMENT_WEIGHT
        + components.cross_coverage * COVERAGE_WEIGHT;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = sum.round().clamp(0.0, 100.0) as u32;
    rounded
}

/// Per-assistant raw scores, each normalised against that assistant's own
/// busiest brand so assistants with fewer answers are not penalised.
#[must_use]
pub fn assistant_scores(
    mentions: &[&Mention],
    max_per_assistant: &[usize; 3],
) -> AssistantScores {
    let mut scores = AssistantScores::default();
    for (idx, assistant) in Assistant::ALL.into_iter().enumerate() {
        let subset: Vec<&Mention> = mentions
            .iter()
            .copied()
            .filter(|m| m.assistant == assistant)
            .collect();
        let max = max_per_assistant[idx].max(1);
        scores.set(assistant, visibility_score(&subset, max).raw_score);
    }
    scores
}

/// Score every brand in `mentions`, highest raw score first.
///
/// `history` supplies persisted snapshots for the delta and the history
/// series; `as_of` is the date the scores are being computed for. Brands with
/// equal scores keep their first-seen order.
#[must_use]
pub fn compute_scores(
    mentions: &[Mention],
    history: &[AvsSnapshot],
    as_of: NaiveDate,
) -> Vec<BrandScore> {
    let groups = group_by_brand(mentions);
    let max_frequency = groups.iter().map(|(_, g)| g.len()).max().unwrap_or(0);
    let max_per_assistant = max_per_assistant(&groups);
    let total = mentions.len();

    let mut scores: Vec<BrandScore> = groups
        .iter()
        .map(|(brand, group)| {
            let Visibility {
                components,
                raw_score,
            } = visibility_score(group, max_frequency);
            let category = dominant_category(group.iter().copied()).unwrap_or(FALLBACK_CATEGORY);
            let sentiment = sentiment_counts(group);
            let coverage = coverage(group);
            let is_emerging = coverage.len() <= 2 && sentiment.positive > sentiment.neutral;
            let top_cited_reason = group
                .iter()
                .min_by_key(|m| m.rank)
                .map(|m| m.cited_reason.clone())
                .unwrap_or_default();

            BrandScore {
                brand: (*brand).to_string(),
                category,
                raw_score,
                weighted_score: weighted_score(raw_score, category),
                delta: compute_delta(brand, raw_score, history, as_of),
                components,
                by_assistant: assistant_scores(group, &max_per_assistant),
                tracked_sov: tracked_share(group.len(), total),
                mention_count: group.len(),
                avg_rank: round_to_tenth(average_rank(group)),
                sentiment,
                coverage,
                history: history_series(brand, history, HISTORY_LEN),
                is_recurring_winner: raw_score >= RECURRING_WINNER_THRESHOLD,
                is_emerging,
                top_cited_reason,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.raw_score.cmp(&a.raw_score));
    scores
}

/// Group mentions by brand, preserving the order brands first appear in.
pub(crate) fn group_by_brand(mentions: &[Mention]) -> Vec<(&str, Vec<&Mention>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Mention>)> = Vec::new();
    for mention in mentions {
        let brand = mention.brand.as_str();
        if let Some(&i) = index.get(brand) {
            groups[i].1.push(mention);
        } else {
            index.insert(brand, groups.len());
            groups.push((brand, vec![mention]));
        }
    }
    groups
}

/// Largest single-brand mention count per assistant, in [`Assistant::ALL`] order.
fn max_per_assistant(groups: &[(&str, Vec<&Mention>)]) -> [usize; 3] {
    let mut max = [1_usize; 3];
    for (_, group) in groups {
        for (idx, assistant) in Assistant::ALL.into_iter().enumerate() {
            let count = group.iter().filter(|m| m.assistant == assistant).count();
            max[idx] = max[idx].max(count);
        }
    }
    max
}

/// Category with the most mentions; ties go to the one seen first.
pub(crate) fn dominant_category<'a>(
    mentions: impl Iterator<Item = &'a Mention>,
) -> Option<Category> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for mention in mentions {
        match counts.iter_mut().find(|(c, _)| *c == mention.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((mention.category, 1)),
        }
    }

    let mut best: Option<(Category, usize)> = None;
    for (category, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((category, n));
        }
    }
    best.map(|(c, _)| c)
}

/// Arithmetic mean of rank; `0.0` for an empty slice.
pub(crate) fn average_rank(mentions: &[&Mention]) -> f64 {
    if mentions.is_empty() {
        return 0.0;
    }
    let sum: u64 = mentions.iter().map(|m| u64::from(m.rank)).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg = sum as f64 / mentions.len() as f64;
    avg
}

/// Distinct assistants mentioning the brand, in canonical order.
pub(crate) fn coverage(mentions: &[&Mention]) -> Vec<Assistant> {
    Assistant::ALL
        .into_iter()
        .filter(|a| mentions.iter().any(|m| m.assistant == *a))
        .collect()
}

fn sentiment_counts(mentions: &[&Mention]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for mention in mentions {
        match mention.sentiment {
            Sentiment::Positive => counts.positive += 1,
            Sentiment::Neutral => counts.neutral += 1,
            Sentiment::Negative => counts.negative += 1,
        }
    }
    counts
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Best-ranked mention per (category, assistant), categories in first-seen
/// order. Ties on rank keep the earlier mention.
#[must_use]
pub fn prompt_matrix(mentions: &[Mention]) -> Vec<PromptMatrixRow> {
    let mut categories: Vec<Category> = Vec::new();
    for mention in mentions {
        if !categories.contains(&mention.category) {
            categories.push(mention.category);
        }
    }

    categories
        .into_iter()
        .map(|category| {
            let mut row = PromptMatrixRow {
                category,
                chatgpt: None,
                gemini: None,
                perplexity: None,
            };
            for assistant in Assistant::ALL {
                let leader = mentions
                    .iter()
                    .filter(|m| m.category == category && m.assistant == assistant)
                    .min_by_key(|m| m.rank)
                    .map(|m| MatrixLeader {
                        brand: m.brand.clone(),
                        rank: m.rank,
                    });
                row.set(assistant, leader);
            }
            row
        })
        .collect()
}

/// Brand of the day, recurring winners and emerging brands from `scores`
/// as returned by [`compute_scores`] (highest first).
#[must_use]
pub fn highlights(scores: &[BrandScore]) -> Highlights {
    Highlights {
        brand_of_the_day: scores.first().cloned(),
        recurring_winners: scores
            .iter()
            .filter(|s| s.is_recurring_winner)
            .cloned()
            .collect(),
        emerging_brands: scores.iter().filter(|s| s.is_emerging).cloned().collect(),
    }
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;
