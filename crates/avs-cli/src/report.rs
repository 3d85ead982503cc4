//! Markdown output for `gap`, `narrative` and `audit`.

use std::fmt::Write as _;

use avs_engine::{AuditReport, GapAnalysis, NarrativeResult};

fn list_or_dash<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        "\u{2014}".to_string()
    } else {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn render_gap(gap: &GapAnalysis) -> String {
    let (a, b) = (&gap.brand_a, &gap.brand_b);
    let mut out = String::new();

    let _ = writeln!(out, "# Gap Report: {a} vs {b}");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Category**: {}", gap.category);
    let _ = writeln!(out, "**As of**: {}", gap.as_of.format("%Y-%m-%d"));
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | {a} minus {b} |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Visibility score | {:+} |", gap.score_difference);
    let _ = writeln!(out, "| Tracked share of voice | {:+.1}% |", gap.sov_difference);
    let _ = writeln!(out, "| Positive sentiment | {:+.1}% |", gap.sentiment_gap_percent);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Assistants where {b} leads**: {}",
        list_or_dash(&gap.assistants_where_competitor_leads)
    );
    let _ = writeln!(
        out,
        "**Intent clusters {b} dominates**: {}",
        list_or_dash(&gap.intent_clusters_competitor_dominates)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "## How assistants describe them");
    let _ = writeln!(out);
    let _ = writeln!(out, "- **{a}**: {}", list_or_dash(&gap.adjectives.brand_a));
    let _ = writeln!(out, "- **{b}**: {}", list_or_dash(&gap.adjectives.brand_b));
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", gap.summary);
    out
}

pub(crate) fn render_narrative(n: &NarrativeResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Narrative: {} ({})", n.brand, n.category);
    let _ = writeln!(out);
    let _ = writeln!(out, "**Date**: {}", n.snapshot_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "**Positioning**: {}", n.positioning);
    let _ = writeln!(out, "**Authority strength**: {}/100", n.authority_strength_score);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", n.narrative_summary);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Signature adjectives**: {}",
        list_or_dash(&n.signature_adjectives)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "## Differentiation signals");
    let _ = writeln!(out);
    if n.differentiation_signals.is_empty() {
        let _ = writeln!(out, "- \u{2014}");
    }
    for signal in &n.differentiation_signals {
        let _ = writeln!(out, "- {signal}");
    }

    if let Some(shift) = &n.narrative_shift {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Drift since the previous narrative");
        let _ = writeln!(out);
        let _ = writeln!(out, "{shift}");
        let _ = writeln!(out);
        let emerging = n.emerging_themes.as_deref().unwrap_or_default();
        let lost = n.lost_themes.as_deref().unwrap_or_default();
        let _ = writeln!(out, "**Emerging themes**: {}", list_or_dash(emerging));
        let _ = writeln!(out, "**Lost themes**: {}", list_or_dash(lost));
    }
    out
}

pub(crate) fn render_audit(report: &AuditReport) -> String {
    let c = &report.components;
    let mut out = String::new();

    let _ = writeln!(out, "# Visibility Audit: {} ({})", report.brand, report.category);
    let _ = writeln!(out);
    let _ = writeln!(out, "**As of**: {}", report.as_of.format("%Y-%m-%d"));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.executive_summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Visibility score | {}/100 |", report.raw_score);
    let _ = writeln!(out, "| Weighted score | {}/100 |", report.weighted_score);
    let _ = writeln!(out, "| Delta | {:+} |", report.delta);
    let _ = writeln!(out, "| Tracked share of voice | {:.1}% |", report.tracked_sov);
    let _ = writeln!(out, "| Authority strength | {}/100 |", report.authority_strength_score);
    let _ = writeln!(out, "| Positioning | {} |", report.narrative.positioning);
    let _ = writeln!(
        out,
        "| Components (freq / pos / sent / cov) | {:.0} / {:.0} / {:.0} / {:.0} |",
        c.frequency, c.position, c.sentiment, c.cross_coverage
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Top competitor");
    let _ = writeln!(out);
    match &report.top_competitor_gap {
        Some(gap) => {
            let _ = writeln!(
                out,
                "**{}** (score gap {:+}, SOV gap {:+.1}%)",
                gap.brand_b, gap.score_difference, gap.sov_difference
            );
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", gap.summary);
        }
        None => {
            let _ = writeln!(out, "No other brand is tracked in this category.");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Recommendations");
    let _ = writeln!(out);
    for (i, rec) in report.recommendations.iter().enumerate() {
        let _ = writeln!(out, "{}. {rec}", i + 1);
    }
    out
}
