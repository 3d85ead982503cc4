//! Visibility analytics over AI-assistant brand mentions.
//!
//! Pure, synchronous computations:
//!
//! - [`scoring`]: the raw Visibility Score, its four components and the
//!   per-assistant breakdown
//! - [`sov`]: tracked share of voice within a category
//! - [`trend`]: deltas against persisted snapshots
//! - [`intent`]: the query-intent catalog and weighted scores
//! - [`gap`]: head-to-head metrics for two brands
//! - [`narrative::authority`]: the deterministic authority score
//! - [`audit`]: top-competitor selection and the executive summary
//!
//! Asynchronous parts talk to collaborators behind traits: a
//! [`TextGenerator`] for prose, a [`SnapshotStore`] and a [`NarrativeCache`]
//! for persistence. [`AnalyticsEngine`] wires them together.

pub mod audit;
pub mod engine;
pub mod error;
pub mod gap;
pub mod generator;
pub mod intent;
pub mod narrative;
pub mod scoring;
pub mod sov;
pub mod store;
pub mod trend;
pub mod types;

pub use engine::AnalyticsEngine;
pub use error::{EngineError, GenerationError, StoreError};
pub use gap::{compute_gap, compute_gap_metrics};
pub use generator::{
    generate_with_timeout, generator_from_config, DisabledGenerator, Generated, HttpTextGenerator,
    TextGenerator,
};
pub use intent::{
    average_intent_weight, catalog_categories, prompts, weighted_score, IntentType,
    PromptCatalogEntry, PROMPT_CATALOG,
};
pub use narrative::{authority_strength_score, compute_narrative, NarrativeDeps};
pub use scoring::{compute_scores, highlights, prompt_matrix, visibility_score, Visibility};
pub use sov::{category_share_of_voice, compute_share_of_voice, tracked_share};
pub use store::{InMemoryStore, NarrativeCache, SnapshotStore};
pub use trend::{compute_delta, latest_prior_snapshot};
pub use types::{
    AdjectiveComparison, AssistantScores, AuditReport, AvsSnapshot, BrandScore, CategorySov,
    GapAnalysis, Highlights, MatrixLeader, NarrativeResult, PositioningCategory, PromptMatrixRow,
    ScoreComponents, SentimentCounts, SovEntry,
};
