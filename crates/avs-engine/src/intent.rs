//! Query-intent catalog and the category-level buying-intent weighting.
//!
//! Each category is represented by five queries, one per [`IntentType`].
//! Enterprise queries carry the most buying intent and budget queries the
//! least, so a category's average weight scales a raw score up or down.

use avs_core::Category;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentType {
    Best,
    Comparison,
    Enterprise,
    Budget,
    FeatureSpecific,
}

impl IntentType {
    pub const ALL: [IntentType; 5] = [
        IntentType::Best,
        IntentType::Comparison,
        IntentType::Enterprise,
        IntentType::Budget,
        IntentType::FeatureSpecific,
    ];
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IntentType::Best => "best",
            IntentType::Comparison => "comparison",
            IntentType::Enterprise => "enterprise",
            IntentType::Budget => "budget",
            IntentType::FeatureSpecific => "feature-specific",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PromptCatalogEntry {
    pub id: &'static str,
    pub category: Category,
    pub prompt: &'static str,
    pub intent: IntentType,
    /// Buying intent in `[0, 1]`.
    pub buying_intent_weight: f64,
    pub difficulty: u8,
}

const fn entry(
    id: &'static str,
    category: Category,
    intent: IntentType,
    buying_intent_weight: f64,
    difficulty: u8,
    prompt: &'static str,
) -> PromptCatalogEntry {
    PromptCatalogEntry {
        id,
        category,
        prompt,
        intent,
        buying_intent_weight,
        difficulty,
    }
}

#[rustfmt::skip]
pub static PROMPT_CATALOG: [PromptCatalogEntry; 25] = {
    use Category::{AiWriting, CloudStorage, Crm, DesignTools, ProjectManagement};
    use IntentType::{Best, Budget, Comparison, Enterprise, FeatureSpecific};

    [
        entry("pm-best-01", ProjectManagement, Best, 0.70, 85,
              "What is the best project management software this year?"),
        entry("pm-ent-01", ProjectManagement, Enterprise, 0.95, 90,
              "Best enterprise project management tools for large teams?"),
        entry("pm-cmp-01", ProjectManagement, Comparison, 0.85, 88,
              "Notion vs Asana vs Monday.com comparison"),
        entry("pm-bud-01", ProjectManagement, Budget, 0.50, 65,
              "Best free project management software for startups"),
        entry("pm-feat-01", ProjectManagement, FeatureSpecific, 0.80, 70,
              "Which project management tool has the best Gantt chart?"),
        entry("crm-best-01", Crm, Best, 0.75, 88,
              "What is the best CRM software for sales teams?"),
        entry("crm-ent-01", Crm, Enterprise, 0.95, 92,
              "Best enterprise CRM for Fortune 500 companies"),
        entry("crm-cmp-01", Crm, Comparison, 0.88, 90,
              "Salesforce vs HubSpot vs Pipedrive comparison"),
        entry("crm-bud-01", Crm, Budget, 0.55, 60,
              "Best affordable CRM for small business"),
        entry("crm-feat-01", Crm, FeatureSpecific, 0.82, 72,
              "Which CRM has the best email automation features?"),
        entry("cs-best-01", CloudStorage, Best, 0.65, 80,
              "Best cloud storage for business?"),
        entry("cs-ent-01", CloudStorage, Enterprise, 0.92, 88,
              "Best enterprise cloud storage with compliance features?"),
        entry("cs-cmp-01", CloudStorage, Comparison, 0.78, 82,
              "Google Drive vs Dropbox vs Box for teams"),
        entry("cs-bud-01", CloudStorage, Budget, 0.40, 55,
              "Best free cloud storage with large storage limits"),
        entry("cs-feat-01", CloudStorage, FeatureSpecific, 0.75, 68,
              "Which cloud storage has the best collaboration features?"),
        entry("aw-best-01", AiWriting, Best, 0.70, 82,
              "What is the best AI writing tool?"),
        entry("aw-ent-01", AiWriting, Enterprise, 0.90, 85,
              "Best AI writing software for enterprise content teams?"),
        entry("aw-cmp-01", AiWriting, Comparison, 0.80, 80,
              "Jasper vs Copy.ai vs Writesonic comparison"),
        entry("aw-bud-01", AiWriting, Budget, 0.45, 58,
              "Best free AI writing tools for bloggers"),
        entry("aw-feat-01", AiWriting, FeatureSpecific, 0.77, 66,
              "Which AI writing tool supports SEO optimization best?"),
        entry("dt-best-01", DesignTools, Best, 0.68, 78,
              "Best AI-powered design tools for teams?"),
        entry("dt-ent-01", DesignTools, Enterprise, 0.88, 84,
              "Best enterprise design software for product teams?"),
        entry("dt-cmp-01", DesignTools, Comparison, 0.82, 86,
              "Figma vs Canva vs Adobe XD comparison"),
        entry("dt-bud-01", DesignTools, Budget, 0.42, 58,
              "Best free design tools for startups and freelancers"),
        entry("dt-feat-01", DesignTools, FeatureSpecific, 0.79, 70,
              "Which design tool has the best prototyping features?"),
    ]
};

/// Catalog entries, optionally narrowed by category and/or intent.
#[must_use]
pub fn prompts(
    category: Option<Category>,
    intent: Option<IntentType>,
) -> Vec<&'static PromptCatalogEntry> {
    PROMPT_CATALOG
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| intent.is_none_or(|i| p.intent == i))
        .collect()
}

/// Distinct categories present in the catalog, in catalog order.
#[must_use]
pub fn catalog_categories() -> Vec<Category> {
    let mut out: Vec<Category> = Vec::new();
    for p in &PROMPT_CATALOG {
        if !out.contains(&p.category) {
            out.push(p.category);
        }
    }
    out
}

/// Mean buying-intent weight of the category's catalog entries; `1.0` if none.
#[must_use]
pub fn average_intent_weight(category: Category) -> f64 {
    average_weight(&prompts(Some(category), None))
}

fn average_weight(entries: &[&PromptCatalogEntry]) -> f64 {
    if entries.is_empty() {
        return 1.0;
    }
    let sum: f64 = entries.iter().map(|p| p.buying_intent_weight).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / entries.len() as f64;
    mean
}

/// `round(min(100, raw × average_intent_weight(category)))`.
#[must_use]
pub fn weighted_score(raw_score: u32, category: Category) -> u32 {
    apply_weight(raw_score, average_intent_weight(category))
}

fn apply_weight(raw_score: u32, weight: f64) -> u32 {
    let weighted = (f64::from(raw_score) * weight).min(100.0).max(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = weighted.round() as u32;
    rounded
}
