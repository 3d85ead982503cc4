//! Authority Strength: a 0–100 read of how authoritatively assistants
//! describe a brand, computed without any generative call.
//!
//! | part     | range | source                                   |
//! |----------|-------|------------------------------------------|
//! | phrase   | 0–50  | distinct high-authority phrases × 8      |
//! | rank     | 0–30  | average rank, 1 → 30, 5 and worse → 0    |
//! | coverage | 0–20  | distinct assistants, `[0, 7, 13, 20]`    |

pub const AUTHORITY_PHRASES: [&str; 15] = [
    "industry standard",
    "leading",
    "best-in-class",
    "top choice",
    "most recommended",
    "market leader",
    "gold standard",
    "enterprise-grade",
    "preferred by",
    "trusted by",
    "dominant",
    "number one",
    "#1",
    "widely adopted",
    "category leader",
];

const PHRASE_POINTS: u32 = 8;
const PHRASE_CAP: u32 = 50;
const RANK_CAP: f64 = 30.0;
const COVERAGE_POINTS: [u32; 4] = [0, 7, 13, 20];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorityBreakdown {
    pub phrase: u32,
    pub rank: u32,
    pub coverage: u32,
}

impl AuthorityBreakdown {
    #[must_use]
    pub fn total(&self) -> u32 {
        (self.phrase + self.rank + self.coverage).min(100)
    }
}

/// Number of distinct authority phrases present in the reasons (case-insensitive).
#[must_use]
pub fn phrase_hits<S: AsRef<str>>(cited_reasons: &[S]) -> usize {
    let text = cited_reasons
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();
    AUTHORITY_PHRASES
        .iter()
        .filter(|p| text.contains(*p))
        .count()
}

#[must_use]
pub fn phrase_score(hits: usize) -> u32 {
    let hits = u32::try_from(hits).unwrap_or(u32::MAX);
    hits.saturating_mul(PHRASE_POINTS).min(PHRASE_CAP)
}

#[must_use]
pub fn rank_score(avg_rank: f64) -> u32 {
    let raw = ((5.0 - avg_rank) / 4.0 * RANK_CAP).round();
    if raw.is_nan() {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = raw.clamp(0.0, RANK_CAP) as u32;
    score
}

#[must_use]
pub fn coverage_score(assistant_count: usize) -> u32 {
    COVERAGE_POINTS[assistant_count.min(3)]
}

#[must_use]
pub fn authority_breakdown<S: AsRef<str>>(
    cited_reasons: &[S],
    avg_rank: f64,
    assistant_count: usize,
) -> AuthorityBreakdown {
    AuthorityBreakdown {
        phrase: phrase_score(phrase_hits(cited_reasons)),
        rank: rank_score(avg_rank),
        coverage: coverage_score(assistant_count),
    }
}

/// `min(100, phrase + rank + coverage)`.
#[must_use]
pub fn authority_strength_score<S: AsRef<str>>(
    cited_reasons: &[S],
    avg_rank: f64,
    assistant_count: usize,
) -> u32 {
    authority_breakdown(cited_reasons, avg_rank, assistant_count).total()
}
