use avs_core::{Assistant, Category};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::intent::IntentType;

/// The four weighted inputs to the raw Visibility Score, each in `[0, 100]`.
///
/// Values are kept unrounded so the raw score is reproducible from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub frequency: f64,
    pub position: f64,
    pub sentiment: f64,
    pub cross_coverage: f64,
}

/// Raw score computed independently per assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantScores {
    pub chatgpt: u32,
    pub gemini: u32,
    pub perplexity: u32,
}

impl AssistantScores {
    #[must_use]
    pub fn get(&self, assistant: Assistant) -> u32 {
        match assistant {
            Assistant::ChatGpt => self.chatgpt,
            Assistant::Gemini => self.gemini,
            Assistant::Perplexity => self.perplexity,
        }
    }

    pub fn set(&mut self, assistant: Assistant, score: u32) {
        match assistant {
            Assistant::ChatGpt => self.chatgpt = score,
            Assistant::Gemini => self.gemini = score,
            Assistant::Perplexity => self.perplexity = score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

/// Derived visibility metrics for one brand, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandScore {
    pub brand: String,
    /// Category holding most of the brand's mentions.
    pub category: Category,
    pub raw_score: u32,
    pub weighted_score: u32,
    /// Raw score minus the latest snapshot before the as-of date; positive is improving.
    pub delta: i32,
    pub components: ScoreComponents,
    pub by_assistant: AssistantScores,
    /// Tracked share of voice (percent of the supplied mention set, one decimal).
    pub tracked_sov: f64,
    pub mention_count: usize,
    /// Mean rank, rounded to one decimal for display.
    pub avg_rank: f64,
    pub sentiment: SentimentCounts,
    pub coverage: Vec<Assistant>,
    /// Last persisted raw scores, oldest first.
    pub history: Vec<u32>,
    pub is_recurring_winner: bool,
    pub is_emerging: bool,
    pub top_cited_reason: String,
}

/// Point-in-time record of a brand's score, keyed by (brand, category, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvsSnapshot {
    pub brand: String,
    pub category: Category,
    pub snapshot_date: NaiveDate,
    pub raw_score: u32,
    pub weighted_score: u32,
    pub tracked_sov: f64,
    pub by_assistant: AssistantScores,
    pub mention_count: usize,
    pub avg_rank: f64,
}

impl AvsSnapshot {
    #[must_use]
    pub fn from_score(score: &BrandScore, snapshot_date: NaiveDate) -> Self {
        Self {
            brand: score.brand.clone(),
            category: score.category,
            snapshot_date,
            raw_score: score.raw_score,
            weighted_score: score.weighted_score,
            tracked_sov: score.tracked_sov,
            by_assistant: score.by_assistant,
            mention_count: score.mention_count,
            avg_rank: score.avg_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SovEntry {
    pub brand: String,
    pub sov: f64,
    pub mention_count: usize,
}

/// Share of voice for one category: overall plus one ranking per assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySov {
    pub category: Category,
    pub overall: Vec<SovEntry>,
    pub chatgpt: Vec<SovEntry>,
    pub gemini: Vec<SovEntry>,
    pub perplexity: Vec<SovEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjectiveComparison {
    pub brand_a: Vec<String>,
    pub brand_b: Vec<String>,
}

/// Head-to-head comparison of two brands. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub brand_a: String,
    pub brand_b: String,
    pub category: Category,
    pub as_of: NaiveDate,
    /// `score(a) - score(b)`; negative means `brand_a` is behind.
    pub score_difference: i32,
    pub sov_difference: f64,
    pub sentiment_gap_percent: f64,
    pub assistants_where_competitor_leads: Vec<Assistant>,
    pub intent_clusters_competitor_dominates: Vec<IntentType>,
    pub adjectives: AdjectiveComparison,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositioningCategory {
    Leader,
    Challenger,
    Niche,
    Emerging,
    Legacy,
}

impl std::fmt::Display for PositioningCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PositioningCategory::Leader => "Leader",
            PositioningCategory::Challenger => "Challenger",
            PositioningCategory::Niche => "Niche",
            PositioningCategory::Emerging => "Emerging",
            PositioningCategory::Legacy => "Legacy",
        };
        f.write_str(label)
    }
}

/// Narrative read of how assistants describe a brand on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeResult {
    pub brand: String,
    pub category: Category,
    pub snapshot_date: NaiveDate,
    pub narrative_summary: String,
    pub positioning: PositioningCategory,
    pub signature_adjectives: Vec<String>,
    pub authority_strength_score: u32,
    pub differentiation_signals: Vec<String>,
    /// Drift fields; present only when an earlier narrative existed.
    pub narrative_shift: Option<String>,
    pub emerging_themes: Option<Vec<String>>,
    pub lost_themes: Option<Vec<String>>,
}

/// Best-ranked brand seen for one (category, assistant) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixLeader {
    pub brand: String,
    pub rank: u32,
}

/// One category row of the prompt matrix; `None` where an assistant never
/// mentioned the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMatrixRow {
    pub category: Category,
    pub chatgpt: Option<MatrixLeader>,
    pub gemini: Option<MatrixLeader>,
    pub perplexity: Option<MatrixLeader>,
}

impl PromptMatrixRow {
    #[must_use]
    pub fn get(&self, assistant: Assistant) -> Option<&MatrixLeader> {
        match assistant {
            Assistant::ChatGpt => self.chatgpt.as_ref(),
            Assistant::Gemini => self.gemini.as_ref(),
            Assistant::Perplexity => self.perplexity.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, assistant: Assistant, leader: Option<MatrixLeader>) {
        match assistant {
            Assistant::ChatGpt => self.chatgpt = leader,
            Assistant::Gemini => self.gemini = leader,
            Assistant::Perplexity => self.perplexity = leader,
        }
    }
}

/// Leaderboard call-outs drawn from one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub brand_of_the_day: Option<BrandScore>,
    pub recurring_winners: Vec<BrandScore>,
    pub emerging_brands: Vec<BrandScore>,
}

/// Full visibility audit for one brand in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub brand: String,
    pub category: Category,
    pub as_of: NaiveDate,
    pub executive_summary: String,
    pub raw_score: u32,
    pub weighted_score: u32,
    pub delta: i32,
    pub tracked_sov: f64,
    pub components: ScoreComponents,
    pub narrative: NarrativeResult,
    /// Gap against the highest-scoring other brand in the category, if any.
    pub top_competitor_gap: Option<GapAnalysis>,
    pub recommendations: Vec<String>,
    pub authority_strength_score: u32,
}
