//! Score deltas against persisted snapshots.

use chrono::NaiveDate;

use crate::types::AvsSnapshot;

/// Most recent snapshot for `brand` dated strictly before `as_of`.
///
/// `history` is taken in write order; among snapshots sharing the latest date
/// the one written last wins.
#[must_use]
pub fn latest_prior_snapshot<'a>(
    brand: &str,
    history: &'a [AvsSnapshot],
    as_of: NaiveDate,
) -> Option<&'a AvsSnapshot> {
    let mut latest: Option<&AvsSnapshot> = None;
    for snap in history
        .iter()
        .filter(|s| s.brand == brand && s.snapshot_date < as_of)
    {
        if latest.is_none_or(|l| snap.snapshot_date >= l.snapshot_date) {
            latest = Some(snap);
        }
    }
    latest
}

/// `current - prior.raw_score`, or `0` when there is no prior snapshot.
///
/// Positive means the brand is improving.
#[must_use]
pub fn compute_delta(
    brand: &str,
    current: u32,
    history: &[AvsSnapshot],
    as_of: NaiveDate,
) -> i32 {
    let Some(prior) = latest_prior_snapshot(brand, history, as_of) else {
        return 0;
    };
    let current = i64::from(current);
    let prior = i64::from(prior.raw_score);
    i32::try_from(current - prior).unwrap_or(0)
}

/// The brand's last `len` persisted raw scores, oldest first.
#[must_use]
pub fn history_series(brand: &str, history: &[AvsSnapshot], len: usize) -> Vec<u32> {
    let mut snaps: Vec<&AvsSnapshot> = history.iter().filter(|s| s.brand == brand).collect();
    snaps.sort_by_key(|s| s.snapshot_date);
    let skip = snaps.len().saturating_sub(len);
    snaps.into_iter().skip(skip).map(|s| s.raw_score).collect()
}
