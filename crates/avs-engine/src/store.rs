//! Persistence collaborators for score snapshots and narratives.
//!
//! Both stores are keyed by (brand, category, date) with last-write-wins
//! upserts. [`InMemoryStore`] backs the CLI, the server and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use avs_core::Category;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{AvsSnapshot, NarrativeResult};

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Upsert on (brand, category, snapshot date).
    async fn save_score_snapshot(&self, snapshot: AvsSnapshot) -> Result<(), StoreError>;

    /// Every snapshot for `brand`, ascending by date.
    async fn load_score_history(&self, brand: &str) -> Result<Vec<AvsSnapshot>, StoreError>;

    /// Latest snapshot for (brand, category) dated strictly before `before`.
    async fn load_previous_score_snapshot(
        &self,
        brand: &str,
        category: Category,
        before: NaiveDate,
    ) -> Result<Option<AvsSnapshot>, StoreError>;
}

#[async_trait]
pub trait NarrativeCache: Send + Sync {
    async fn load_cached_narrative(
        &self,
        brand: &str,
        category: Category,
        date: NaiveDate,
    ) -> Result<Option<NarrativeResult>, StoreError>;

    /// Upsert on (brand, category, snapshot date).
    async fn save_narrative_snapshot(&self, narrative: NarrativeResult) -> Result<(), StoreError>;

    /// Latest narrative for (brand, category) dated strictly before `before`.
    async fn load_previous_narrative(
        &self,
        brand: &str,
        category: Category,
        before: NaiveDate,
    ) -> Result<Option<NarrativeResult>, StoreError>;
}

type Key = (String, Category, NaiveDate);

/// Stored value plus the sequence number of the write that produced it.
#[derive(Debug, Clone)]
struct Versioned<T> {
    seq: u64,
    value: T,
}

#[derive(Debug)]
struct Table<T> {
    rows: HashMap<Key, Versioned<T>>,
    next_seq: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn upsert(&mut self, key: Key, value: T) {
        self.next_seq += 1;
        self.rows.insert(
            key,
            Versioned {
                seq: self.next_seq,
                value,
            },
        );
    }

    /// Rows for `brand` (and `category` when given), oldest date first; equal
    /// dates order by write sequence.
    fn rows_for(&self, brand: &str, category: Option<Category>) -> Vec<(NaiveDate, &Versioned<T>)> {
        let mut rows: Vec<(NaiveDate, &Versioned<T>)> = self
            .rows
            .iter()
            .filter(|((b, c, _), _)| b == brand && category.is_none_or(|cat| *c == cat))
            .map(|((_, _, d), v)| (*d, v))
            .collect();
        rows.sort_by_key(|(d, v)| (*d, v.seq));
        rows
    }

    fn latest_before(&self, brand: &str, category: Category, before: NaiveDate) -> Option<T> {
        self.rows_for(brand, Some(category))
            .into_iter()
            .rev()
            .find(|(d, _)| *d < before)
            .map(|(_, v)| v.value.clone())
    }
}

/// Process-local store implementing both [`SnapshotStore`] and [`NarrativeCache`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshots: RwLock<Table<AvsSnapshot>>,
    narratives: RwLock<Table<NarrativeResult>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct (brand, category, date) snapshot keys held.
    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.read().await.rows.len()
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn save_score_snapshot(&self, snapshot: AvsSnapshot) -> Result<(), StoreError> {
        let key = (
            snapshot.brand.clone(),
            snapshot.category,
            snapshot.snapshot_date,
        );
        self.snapshots.write().await.upsert(key, snapshot);
        Ok(())
    }

    async fn load_score_history(&self, brand: &str) -> Result<Vec<AvsSnapshot>, StoreError> {
        let table = self.snapshots.read().await;
        Ok(table
            .rows_for(brand, None)
            .into_iter()
            .map(|(_, v)| v.value.clone())
            .collect())
    }

    async fn load_previous_score_snapshot(
        &self,
        brand: &str,
        category: Category,
        before: NaiveDate,
    ) -> Result<Option<AvsSnapshot>, StoreError> {
        Ok(self
            .snapshots
            .read()
            .await
            .latest_before(brand, category, before))
    }
}

#[async_trait]
impl NarrativeCache for InMemoryStore {
    async fn load_cached_narrative(
        &self,
        brand: &str,
        category: Category,
        date: NaiveDate,
    ) -> Result<Option<NarrativeResult>, StoreError> {
        let key = (brand.to_string(), category, date);
        Ok(self
            .narratives
            .read()
            .await
            .rows
            .get(&key)
            .map(|v| v.value.clone()))
    }

    async fn save_narrative_snapshot(&self, narrative: NarrativeResult) -> Result<(), StoreError> {
        let key = (
            narrative.brand.clone(),
            narrative.category,
            narrative.snapshot_date,
        );
        self.narratives.write().await.upsert(key, narrative);
        Ok(())
    }

    async fn load_previous_narrative(
        &self,
        brand: &str,
        category: Category,
        before: NaiveDate,
    ) -> Result<Option<NarrativeResult>, StoreError> {
        Ok(self
            .narratives
            .read()
            .await
            .latest_before(brand, category, before))
    }
}
