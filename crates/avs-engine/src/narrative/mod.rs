//! Narrative extraction: how assistants describe a brand in one category.
//!
//! The authority score is computed locally; the summary, positioning,
//! adjectives and differentiation signals come from the text generator, with a
//! fixed fallback whenever it fails. When an earlier narrative exists for the
//! same brand and category, a second generation describes the drift.
//! Results are cached per (brand, category, date).

pub mod authority;

use std::sync::LazyLock;
use std::time::Duration;

use avs_core::{validate_identifier, Category, Mention};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::error::{EngineError, GenerationError};
use crate::generator::{generate_with_timeout, TextGenerator};
use crate::scoring::{average_rank, coverage};
use crate::store::NarrativeCache;
use crate::types::{NarrativeResult, PositioningCategory};

pub use authority::{authority_breakdown, authority_strength_score, AuthorityBreakdown};

/// Cited reasons included in the generation prompt.
const MAX_PROMPT_REASONS: usize = 20;

pub const NO_SHIFT: &str = "No significant shift detected.";

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Outermost `{ ... }` span in generated text.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Positioning and descriptors produced for one brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeBody {
    pub summary: String,
    pub positioning: PositioningCategory,
    pub signature_adjectives: Vec<String>,
    pub differentiation_signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub shift: String,
    pub emerging_themes: Vec<String>,
    pub lost_themes: Vec<String>,
}

impl Drift {
    fn unchanged() -> Self {
        Self {
            shift: NO_SHIFT.to_string(),
            emerging_themes: Vec::new(),
            lost_themes: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedNarrative {
    narrative_summary: String,
    #[serde(default)]
    positioning_category: String,
    #[serde(default)]
    signature_adjectives: Vec<String>,
    #[serde(default)]
    differentiation_signals: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedDrift {
    #[serde(default)]
    narrative_shift: Option<String>,
    #[serde(default)]
    emerging_themes: Vec<String>,
    #[serde(default)]
    lost_themes: Vec<String>,
}

/// Label match ignoring case; anything else reads as `Emerging`.
#[must_use]
pub fn parse_positioning(label: &str) -> PositioningCategory {
    match label.trim().to_lowercase().as_str() {
        "leader" => PositioningCategory::Leader,
        "challenger" => PositioningCategory::Challenger,
        "niche" => PositioningCategory::Niche,
        "legacy" => PositioningCategory::Legacy,
        _ => PositioningCategory::Emerging,
    }
}

/// Parse a narrative body out of generated text.
///
/// # Errors
///
/// [`GenerationError::Parse`] when no JSON object is present, it does not
/// match the expected shape, or the summary is blank.
pub fn parse_narrative(text: &str) -> Result<NarrativeBody, GenerationError> {
    let json = extract_json(text).ok_or_else(|| GenerationError::Parse("no JSON object".into()))?;
    let parsed: GeneratedNarrative =
        serde_json::from_str(json).map_err(|e| GenerationError::Parse(e.to_string()))?;
    if parsed.narrative_summary.trim().is_empty() {
        return Err(GenerationError::Parse("blank narrativeSummary".into()));
    }
    Ok(NarrativeBody {
        summary: parsed.narrative_summary.trim().to_string(),
        positioning: parse_positioning(&parsed.positioning_category),
        signature_adjectives: parsed.signature_adjectives,
        differentiation_signals: parsed.differentiation_signals,
    })
}

/// Parse a drift description; missing fields take the no-shift defaults.
///
/// # Errors
///
/// [`GenerationError::Parse`] when no JSON object is present or it is malformed.
pub fn parse_drift(text: &str) -> Result<Drift, GenerationError> {
    let json = extract_json(text).ok_or_else(|| GenerationError::Parse("no JSON object".into()))?;
    let parsed: GeneratedDrift =
        serde_json::from_str(json).map_err(|e| GenerationError::Parse(e.to_string()))?;
    Ok(Drift {
        shift: parsed
            .narrative_shift
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_SHIFT.to_string()),
        emerging_themes: parsed.emerging_themes,
        lost_themes: parsed.lost_themes,
    })
}

#[must_use]
pub fn fallback_narrative(brand: &str, category: Category) -> NarrativeBody {
    NarrativeBody {
        summary: format!(
            "{brand} is mentioned across AI assistants in the {category} category. \
             A detailed narrative is not available yet."
        ),
        positioning: PositioningCategory::Emerging,
        signature_adjectives: vec![
            "reliable".to_string(),
            "popular".to_string(),
            "versatile".to_string(),
        ],
        differentiation_signals: vec!["Present across multiple AI platforms".to_string()],
    }
}

fn narrative_prompt(
    brand: &str,
    category: Category,
    mentions: &[&Mention],
    avg_rank: f64,
) -> String {
    let assistants: Vec<String> = coverage(mentions).iter().map(ToString::to_string).collect();
    let reasons: String = mentions
        .iter()
        .map(|m| m.cited_reason.trim())
        .filter(|r| !r.is_empty())
        .take(MAX_PROMPT_REASONS)
        .enumerate()
        .map(|(i, r)| format!("{}. {r}\n", i + 1))
        .collect();

    format!(
        "You are an AI visibility analyst for a B2B SaaS intelligence platform.\n\
         \n\
         Brand: \"{brand}\"\n\
         Category: \"{category}\"\n\
         Number of AI mentions: {count}\n\
         Average rank position: {avg_rank:.1}\n\
         Assistants that mention this brand: {assistants}\n\
         \n\
         Reasons AI systems cite when recommending this brand:\n\
         {reasons}\n\
         Respond ONLY with valid JSON matching this structure:\n\
         {{\n\
           \"narrativeSummary\": \"2-3 sentence summary of how AI platforms position \
         this brand\",\n\
           \"positioningCategory\": \"one of: Leader, Challenger, Niche, Emerging, Legacy\",\n\
           \"signatureAdjectives\": [\"5-8 adjectives AI uses for this brand\"],\n\
           \"differentiationSignals\": [\"3-5 unique positioning signals\"]\n\
         }}\n",
        count = mentions.len(),
        assistants = assistants.join(", "),
    )
}

fn drift_prompt(brand: &str, current: &NarrativeBody, previous: &NarrativeResult) -> String {
    let prev_adjectives = serde_json::to_string(&previous.signature_adjectives).unwrap_or_default();
    let curr_adjectives = serde_json::to_string(&current.signature_adjectives).unwrap_or_default();
    format!(
        "You are analyzing narrative positioning drift for a B2B brand called \"{brand}\" \
         in AI recommendation systems.\n\
         \n\
         PREVIOUS narrative summary: \"{prev}\"\n\
         PREVIOUS signature adjectives: {prev_adjectives}\n\
         \n\
         CURRENT narrative summary: \"{curr}\"\n\
         CURRENT signature adjectives: {curr_adjectives}\n\
         \n\
         Respond ONLY with valid JSON:\n\
         {{\n\
           \"narrativeShift\": \"1-2 sentence description of how the positioning changed\",\n\
           \"emergingThemes\": [\"themes new in current\"],\n\
           \"lostThemes\": [\"themes present before but dropped\"]\n\
         }}\n",
        prev = previous.narrative_summary,
        curr = current.summary,
    )
}

/// Generated narrative body, or the fixed fallback on any failure.
async fn generate_body(
    generator: &dyn TextGenerator,
    brand: &str,
    category: Category,
    mentions: &[&Mention],
    avg_rank: f64,
    timeout: Duration,
) -> NarrativeBody {
    let prompt = narrative_prompt(brand, category, mentions, avg_rank);
    let parsed = generate_with_timeout(generator, &prompt, timeout)
        .await
        .and_then(|text| parse_narrative(&text));
    match parsed {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(
                brand,
                %category,
                error = %e,
                "narrative generation failed; using fallback"
            );
            fallback_narrative(brand, category)
        }
    }
}

/// Drift against `previous`, or [`NO_SHIFT`] with empty themes on any failure.
pub async fn detect_drift(
    generator: &dyn TextGenerator,
    brand: &str,
    current: &NarrativeBody,
    previous: &NarrativeResult,
    timeout: Duration,
) -> Drift {
    let prompt = drift_prompt(brand, current, previous);
    let parsed = generate_with_timeout(generator, &prompt, timeout)
        .await
        .and_then(|text| parse_drift(&text));
    match parsed {
        Ok(drift) => drift,
        Err(e) => {
            tracing::warn!(brand, error = %e, "drift detection failed; reporting no shift");
            Drift::unchanged()
        }
    }
}

/// Collaborators a narrative computation reads from and writes to.
#[derive(Clone, Copy)]
pub struct NarrativeDeps<'a> {
    pub generator: &'a dyn TextGenerator,
    pub cache: &'a dyn NarrativeCache,
    pub timeout: Duration,
}

/// Narrative for `brand` in `category` on `as_of`, from cache when present.
///
/// `mentions` may hold any brands and categories; only the requested pair is
/// used. A cache miss computes, generates and stores a fresh result.
///
/// # Errors
///
/// [`EngineError::InvalidInput`] for a blank brand, [`EngineError::NotFound`]
/// when the brand has no mentions in the category, [`EngineError::Store`]
/// when the cache cannot be read.
pub async fn compute_narrative(
    brand: &str,
    category: Category,
    mentions: &[Mention],
    as_of: NaiveDate,
    deps: NarrativeDeps<'_>,
) -> Result<NarrativeResult, EngineError> {
    let brand = validate_identifier("brand", brand)?;

    if let Some(cached) = deps.cache.load_cached_narrative(brand, category, as_of).await? {
        tracing::debug!(brand, %category, %as_of, "narrative cache hit");
        return Ok(cached);
    }

    let scoped: Vec<&Mention> = mentions
        .iter()
        .filter(|m| m.brand == brand && m.category == category)
        .collect();
    if scoped.is_empty() {
        return Err(EngineError::NotFound(format!("{brand} in {category}")));
    }

    let avg_rank = average_rank(&scoped);
    let reasons: Vec<&str> = scoped
        .iter()
        .map(|m| m.cited_reason.as_str())
        .filter(|r| !r.is_empty())
        .collect();
    let authority = authority_strength_score(&reasons, avg_rank, coverage(&scoped).len());

    let body = generate_body(
        deps.generator,
        brand,
        category,
        &scoped,
        avg_rank,
        deps.timeout,
    )
    .await;

    let previous = deps
        .cache
        .load_previous_narrative(brand, category, as_of)
        .await?;
    let drift = match &previous {
        Some(prev) => Some(detect_drift(deps.generator, brand, &body, prev, deps.timeout).await),
        None => None,
    };

    let result = NarrativeResult {
        brand: brand.to_string(),
        category,
        snapshot_date: as_of,
        narrative_summary: body.summary,
        positioning: body.positioning,
        signature_adjectives: body.signature_adjectives,
        authority_strength_score: authority,
        differentiation_signals: body.differentiation_signals,
        narrative_shift: drift.as_ref().map(|d| d.shift.clone()),
        emerging_themes: drift.as_ref().map(|d| d.emerging_themes.clone()),
        lost_themes: drift.map(|d| d.lost_themes),
    };

    if let Err(e) = deps.cache.save_narrative_snapshot(result.clone()).await {
        tracing::warn!(brand, %category, error = %e, "failed to cache narrative");
    }

    Ok(result)
}

#[cfg(test)]
#[path = "narrative_test.rs"]
mod tests;
