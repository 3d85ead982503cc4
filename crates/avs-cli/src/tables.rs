//! Plain-text table output for `scores`, `sov`, `matrix`, `highlights` and
//! `catalog`.

use std::fmt::Write as _;

use avs_core::{Assistant, Category, Mention};
use avs_engine::{
    average_intent_weight, catalog_categories, prompts, AnalyticsEngine, BrandScore, Highlights,
    PromptMatrixRow, SovEntry,
};
use chrono::NaiveDate;

/// Score brands, print the table and persist the day's snapshots.
///
/// Scores are always normalised over the whole file. `category` keeps brands
/// whose dominant category matches and `brand` keeps the exact brand name.
///
/// # Errors
///
/// Returns an error if snapshot history cannot be loaded or the snapshot
/// task panics.
pub(crate) async fn run_scores(
    engine: &AnalyticsEngine,
    mentions: &[Mention],
    brand: Option<&str>,
    category: Option<Category>,
    as_of: NaiveDate,
) -> anyhow::Result<()> {
    let scores = engine.compute_scores(mentions, category, as_of).await?;

    let shown: Vec<&BrandScore> = scores
        .iter()
        .filter(|s| brand.is_none_or(|b| s.brand == b.trim()))
        .collect();
    if shown.is_empty() {
        println!(
            "no mentions found{}",
            brand.map(|b| format!(" for brand {b}")).unwrap_or_default()
        );
        return Ok(());
    }

    print!("{}", render_scores(&shown));
    engine.record_snapshots(&scores, as_of).await?;
    Ok(())
}

fn fmt_delta(delta: i32) -> String {
    match delta {
        0 => "0".to_string(),
        d if d > 0 => format!("+{d}"),
        d => d.to_string(),
    }
}

fn flags(score: &BrandScore) -> String {
    let mut out = Vec::new();
    if score.is_recurring_winner {
        out.push("winner");
    }
    if score.is_emerging {
        out.push("emerging");
    }
    out.join(",")
}

pub(crate) fn render_scores(scores: &[&BrandScore]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16}{:<20}{:>5}{:>6}{:>7}{:>8}{:>6}{:>6}{:>6}{:>6}  FLAGS",
        "BRAND", "CATEGORY", "RAW", "WTD", "DELTA", "SOV%", "RANK", "GPT", "GEM", "PPX"
    );
    for s in scores {
        let _ = writeln!(
            out,
            "{:<16}{:<20}{:>5}{:>6}{:>7}{:>8.1}{:>6.1}{:>6}{:>6}{:>6}  {}",
            s.brand,
            s.category.label(),
            s.raw_score,
            s.weighted_score,
            fmt_delta(s.delta),
            s.tracked_sov,
            s.avg_rank,
            s.by_assistant.chatgpt,
            s.by_assistant.gemini,
            s.by_assistant.perplexity,
            flags(s),
        );
    }
    out
}

pub(crate) fn render_sov(
    category: Category,
    assistant: Option<Assistant>,
    entries: &[SovEntry],
) -> String {
    let scope = assistant.map_or_else(|| "all assistants".to_string(), |a| a.to_string());
    let mut out = String::new();
    let _ = writeln!(out, "Share of voice: {category} ({scope})");
    if entries.is_empty() {
        let _ = writeln!(out, "no mentions in scope");
        return out;
    }
    let _ = writeln!(out, "{:<6}{:<16}{:>8}{:>10}", "#", "BRAND", "SOV%", "MENTIONS");
    for (i, e) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<6}{:<16}{:>8.1}{:>10}",
            i + 1,
            e.brand,
            e.sov,
            e.mention_count
        );
    }
    out
}

pub(crate) fn render_matrix(rows: &[PromptMatrixRow]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<20}", "CATEGORY");
    for assistant in Assistant::ALL {
        let _ = write!(out, "{:<22}", assistant.label());
    }
    let _ = writeln!(out);
    for row in rows {
        let _ = write!(out, "{:<20}", row.category.label());
        for assistant in Assistant::ALL {
            let cell = row
                .get(assistant)
                .map_or_else(|| "-".to_string(), |l| format!("{} (#{})", l.brand, l.rank));
            let _ = write!(out, "{cell:<22}");
        }
        let _ = writeln!(out);
    }
    out
}

fn brand_list(scores: &[BrandScore]) -> String {
    if scores.is_empty() {
        return "none".to_string();
    }
    scores
        .iter()
        .map(|s| format!("{} ({})", s.brand, s.raw_score))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_highlights(highlights: &Highlights, as_of: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Highlights for {}", as_of.format("%Y-%m-%d"));
    let leader = highlights.brand_of_the_day.as_ref().map_or_else(
        || "none".to_string(),
        |s| format!("{} ({}, {})", s.brand, s.category, s.raw_score),
    );
    let _ = writeln!(out, "{:<20}{leader}", "brand of the day");
    let _ = writeln!(
        out,
        "{:<20}{}",
        "recurring winners",
        brand_list(&highlights.recurring_winners)
    );
    let _ = writeln!(
        out,
        "{:<20}{}",
        "emerging",
        brand_list(&highlights.emerging_brands)
    );
    out
}

pub(crate) fn render_catalog(category: Option<Category>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<13}{:<20}{:<18}{:>7}{:>6}  PROMPT",
        "ID", "CATEGORY", "INTENT", "WEIGHT", "DIFF"
    );
    for p in prompts(category, None) {
        let _ = writeln!(
            out,
            "{:<13}{:<20}{:<18}{:>7.2}{:>6}  {}",
            p.id,
            p.category.label(),
            p.intent.to_string(),
            p.buying_intent_weight,
            p.difficulty,
            p.prompt
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<20}{:>8}", "CATEGORY", "AVG WT");
    for c in catalog_categories()
        .into_iter()
        .filter(|c| category.is_none_or(|want| *c == want))
    {
        let _ = writeln!(out, "{:<20}{:>8.3}", c.label(), average_intent_weight(c));
    }
    out
}
