//! [`AnalyticsEngine`]: the analytics operations bound to their collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use avs_core::{validate_identifier, AppConfig, Assistant, Category, Mention};
use chrono::NaiveDate;
use tokio::task::JoinHandle;

use crate::error::{EngineError, GenerationError};
use crate::generator::{generator_from_config, TextGenerator};
use crate::narrative::{self, NarrativeDeps};
use crate::store::{InMemoryStore, NarrativeCache, SnapshotStore};
use crate::types::{
    AuditReport, AvsSnapshot, BrandScore, CategorySov, GapAnalysis, Highlights, NarrativeResult,
    PromptMatrixRow, SovEntry,
};
use crate::{audit, gap, scoring, sov};

type NarrativeKey = (String, Category, NaiveDate);
type InFlight = Mutex<HashMap<NarrativeKey, Arc<tokio::sync::Mutex<()>>>>;

/// Shared entry point for the CLI and the HTTP server.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct AnalyticsEngine {
    generator: Arc<dyn TextGenerator>,
    snapshots: Arc<dyn SnapshotStore>,
    narratives: Arc<dyn NarrativeCache>,
    timeout: Duration,
    in_flight: InFlight,
}

/// One caller's hold on a single-flight gate.
///
/// Dropping it, whether the narrative finished or the future was cancelled,
/// removes the map entry once no other caller shares the gate.
struct InFlightEntry<'a> {
    map: &'a InFlight,
    key: NarrativeKey,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> InFlightEntry<'a> {
    fn join(map: &'a InFlight, key: NarrativeKey) -> Self {
        let gate = {
            let mut in_flight = map.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        Self { map, key, gate }
    }
}

impl Drop for InFlightEntry<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        let ours = in_flight
            .get(&self.key)
            .is_some_and(|g| Arc::ptr_eq(g, &self.gate));
        // map entry plus ours means nobody else is waiting
        if ours && Arc::strong_count(&self.gate) <= 2 {
            in_flight.remove(&self.key);
        }
    }
}

impl AnalyticsEngine {
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        snapshots: Arc<dyn SnapshotStore>,
        narratives: Arc<dyn NarrativeCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            snapshots,
            narratives,
            timeout,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Engine backed by one [`InMemoryStore`] for both snapshots and narratives.
    #[must_use]
    pub fn in_memory(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(generator, store.clone(), store, timeout)
    }

    /// In-memory engine with the generator and timeout taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if the HTTP generator cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let generator = generator_from_config(config)?;
        Ok(Self::in_memory(
            generator,
            Duration::from_secs(config.generator_timeout_secs),
        ))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Persisted snapshots for every brand named in `brands`, each brand's
    /// history ascending by date.
    async fn history_for<'a>(
        &self,
        brands: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<AvsSnapshot>, EngineError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut history = Vec::new();
        for brand in brands {
            if seen.insert(brand) {
                history.extend(self.snapshots.load_score_history(brand).await?);
            }
        }
        Ok(history)
    }

    async fn score_all(
        &self,
        mentions: &[Mention],
        as_of: NaiveDate,
    ) -> Result<(Vec<BrandScore>, Vec<AvsSnapshot>), EngineError> {
        let brands: Vec<&str> = mentions.iter().map(|m| m.brand.as_str()).collect();
        let history = self.history_for(brands).await?;
        let scores = scoring::compute_scores(mentions, &history, as_of);
        Ok((scores, history))
    }

    /// Score every brand in `mentions` as of `as_of`, highest raw score first.
    ///
    /// Scores are always normalised over the whole of `mentions`; `category`
    /// only keeps the brands whose dominant category matches. Every returned
    /// score is therefore safe to pass to [`Self::record_snapshots`].
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when snapshot history cannot be loaded.
    pub async fn compute_scores(
        &self,
        mentions: &[Mention],
        category: Option<Category>,
        as_of: NaiveDate,
    ) -> Result<Vec<BrandScore>, EngineError> {
        let (mut scores, _) = self.score_all(mentions, as_of).await?;
        if let Some(category) = category {
            scores.retain(|s| s.category == category);
        }
        Ok(scores)
    }

    /// Persist one snapshot per score without waiting for the writes.
    ///
    /// Failures are logged. The handle is returned for callers that want to
    /// wait, such as tests and the CLI before exit.
    pub fn record_snapshots(&self, scores: &[BrandScore], as_of: NaiveDate) -> JoinHandle<()> {
        let store = Arc::clone(&self.snapshots);
        let snapshots: Vec<AvsSnapshot> = scores
            .iter()
            .map(|s| AvsSnapshot::from_score(s, as_of))
            .collect();

        tokio::spawn(async move {
            let count = snapshots.len();
            for snapshot in snapshots {
                let brand = snapshot.brand.clone();
                if let Err(e) = store.save_score_snapshot(snapshot).await {
                    tracing::warn!(
                        brand = %brand,
                        %as_of,
                        error = %e,
                        "failed to save score snapshot"
                    );
                }
            }
            tracing::debug!(count, %as_of, "score snapshots recorded");
        })
    }

    /// Brand of the day, recurring winners and emerging brands.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when snapshot history cannot be loaded.
    pub async fn highlights(
        &self,
        mentions: &[Mention],
        as_of: NaiveDate,
    ) -> Result<Highlights, EngineError> {
        let (scores, _) = self.score_all(mentions, as_of).await?;
        Ok(scoring::highlights(&scores))
    }

    #[must_use]
    pub fn prompt_matrix(&self, mentions: &[Mention]) -> Vec<PromptMatrixRow> {
        scoring::prompt_matrix(mentions)
    }

    #[must_use]
    pub fn compute_share_of_voice(
        &self,
        mentions: &[Mention],
        category: Category,
        assistant: Option<Assistant>,
    ) -> Vec<SovEntry> {
        sov::compute_share_of_voice(mentions, category, assistant)
    }

    #[must_use]
    pub fn category_share_of_voice(&self, mentions: &[Mention], category: Category) -> CategorySov {
        sov::category_share_of_voice(mentions, category)
    }

    /// Compare `brand_a` against `brand_b`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`], [`EngineError::NotFound`] as for
    /// [`gap::compute_gap_metrics`]; [`EngineError::Store`] when history
    /// cannot be loaded.
    pub async fn compute_gap(
        &self,
        brand_a: &str,
        brand_b: &str,
        mentions: &[Mention],
        as_of: NaiveDate,
    ) -> Result<GapAnalysis, EngineError> {
        let brands: Vec<&str> = mentions.iter().map(|m| m.brand.as_str()).collect();
        let history = self.history_for(brands).await?;
        gap::compute_gap(
            brand_a,
            brand_b,
            mentions,
            &history,
            as_of,
            self.generator.as_ref(),
            self.timeout,
        )
        .await
    }

    /// Narrative for (brand, category, `as_of`).
    ///
    /// Concurrent calls for the same key are serialised, so the generator runs
    /// at most once per key and later callers read the cached result.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for a blank brand, [`EngineError::NotFound`]
    /// when the brand has no mentions in `category`, [`EngineError::Store`] when
    /// the cache cannot be read.
    pub async fn compute_narrative(
        &self,
        brand: &str,
        category: Category,
        mentions: &[Mention],
        as_of: NaiveDate,
    ) -> Result<NarrativeResult, EngineError> {
        let brand = validate_identifier("brand", brand)?;
        let entry = InFlightEntry::join(&self.in_flight, (brand.to_string(), category, as_of));
        let _permit = entry.gate.lock().await;

        narrative::compute_narrative(
            brand,
            category,
            mentions,
            as_of,
            NarrativeDeps {
                generator: self.generator.as_ref(),
                cache: self.narratives.as_ref(),
                timeout: self.timeout,
            },
        )
        .await
    }

    /// Audit for `brand` in `category`: its score, narrative, the gap against
    /// the highest-scoring other brand in the category, recommendations and an
    /// executive summary.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for a blank brand, [`EngineError::NotFound`]
    /// when the brand has no mentions in `category`, [`EngineError::Store`] when
    /// history or the narrative cache cannot be read.
    pub async fn compute_audit(
        &self,
        brand: &str,
        category: Category,
        mentions: &[Mention],
        as_of: NaiveDate,
    ) -> Result<AuditReport, EngineError> {
        let brand = validate_identifier("brand", brand)?;
        if !mentions
            .iter()
            .any(|m| m.brand == brand && m.category == category)
        {
            return Err(EngineError::NotFound(format!("{brand} in {category}")));
        }

        let (scores, history) = self.score_all(mentions, as_of).await?;
        let score = scores
            .iter()
            .find(|s| s.brand == brand)
            .ok_or_else(|| EngineError::NotFound(brand.to_string()))?;

        let narrative = self
            .compute_narrative(brand, category, mentions, as_of)
            .await?;

        let top_competitor_gap = match audit::top_competitor(&scores, brand, category) {
            Some(rival) => Some(
                gap::compute_gap(
                    brand,
                    &rival.brand,
                    mentions,
                    &history,
                    as_of,
                    self.generator.as_ref(),
                    self.timeout,
                )
                .await?,
            ),
            None => None,
        };

        let recommendations = audit::recommendations(
            score,
            category,
            &narrative,
            top_competitor_gap.as_ref(),
            self.generator.as_ref(),
            self.timeout,
        )
        .await;

        Ok(AuditReport {
            brand: brand.to_string(),
            category,
            as_of,
            executive_summary: audit::executive_summary(
                score,
                category,
                &narrative.narrative_summary,
            ),
            raw_score: score.raw_score,
            weighted_score: score.weighted_score,
            delta: score.delta,
            tracked_sov: score.tracked_sov,
            components: score.components,
            authority_strength_score: narrative.authority_strength_score,
            narrative,
            top_competitor_gap,
            recommendations,
        })
    }
}
