//! Tracked share of voice.
//!
//! Shares are computed among the tracked brands only and sum to 100 within a
//! scope (± rounding). They say nothing about total market share.

use avs_core::{Assistant, Category, Mention};

use crate::scoring::{group_by_brand, round_to_tenth};
use crate::types::{CategorySov, SovEntry};

/// `count / total × 100`, rounded to one decimal. Zero when `total` is zero.
#[must_use]
pub fn tracked_share(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let share = count as f64 / total as f64 * 100.0;
    round_to_tenth(share)
}

/// Rank brands by share of mentions within `category`, optionally narrowed to
/// one assistant. Highest share first; equal shares keep first-seen order.
#[must_use]
pub fn compute_share_of_voice(
    mentions: &[Mention],
    category: Category,
    assistant: Option<Assistant>,
) -> Vec<SovEntry> {
    let scoped: Vec<Mention> = mentions
        .iter()
        .filter(|m| m.category == category && assistant.is_none_or(|a| m.assistant == a))
        .cloned()
        .collect();
    let total = scoped.len();

    let mut entries: Vec<SovEntry> = group_by_brand(&scoped)
        .into_iter()
        .map(|(brand, group)| SovEntry {
            brand: brand.to_string(),
            sov: tracked_share(group.len(), total),
            mention_count: group.len(),
        })
        .collect();

    entries.sort_by(|a, b| b.sov.total_cmp(&a.sov));
    entries
}

/// Overall and per-assistant rankings for one category.
#[must_use]
pub fn category_share_of_voice(mentions: &[Mention], category: Category) -> CategorySov {
    CategorySov {
        category,
        overall: compute_share_of_voice(mentions, category, None),
        chatgpt: compute_share_of_voice(mentions, category, Some(Assistant::ChatGpt)),
        gemini: compute_share_of_voice(mentions, category, Some(Assistant::Gemini)),
        perplexity: compute_share_of_voice(mentions, category, Some(Assistant::Perplexity)),
    }
}
