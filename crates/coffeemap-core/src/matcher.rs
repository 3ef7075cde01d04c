// crates/coffeemap-core/src/matcher.rs

//! # Matcher
//!
//! Resolves source-dataset country names to boundary-dataset names with three
//! tiers, tried in order until one succeeds:
//!
//! 1. **Exact**: the raw name is itself a reference name.
//! 2. **Normalized**: the normalized key is in the index.
//! 3. **Fuzzy**: the best-scoring index key at or above the cutoff.
//!
//! A name that clears no tier maps to `None`. That is a regular outcome
//! ("no region to draw"), never an error.

use crate::error::{CoffeeMapError, Result};
use crate::index::ReferenceIndex;
use crate::similarity::{quick_ratio, ratio, real_quick_ratio};
use crate::text::normalize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Minimum fuzzy score, inclusive, within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Cutoff(f64);

impl Cutoff {
    pub const DEFAULT: Cutoff = Cutoff(0.7);

    /// Rejects NaN and anything outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoffeeMapError::InvalidCutoff(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Normalized,
    Fuzzy { score: f64 },
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Exact => f.write_str("exact"),
            MatchTier::Normalized => f.write_str("normalized"),
            MatchTier::Fuzzy { score } => write!(f, "fuzzy ({score:.3})"),
        }
    }
}

/// A resolved reference name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub reference: String,
    #[serde(flatten)]
    pub tier: MatchTier,
}

/// Per-tier tally of a [`MatchResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub exact: usize,
    pub normalized: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
}

/// Raw source name -> optional reference name.
///
/// Iteration is ordered by raw name so output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    entries: BTreeMap<String, Option<Match>>,
}

impl MatchResult {
    /// `None` when `raw` was not part of the resolved set; `Some(None)` when
    /// it was resolved without a match.
    pub fn get(&self, raw: &str) -> Option<Option<&Match>> {
        self.entries.get(raw).map(Option::as_ref)
    }

    /// Matched reference name for `raw`, if any.
    pub fn reference(&self, raw: &str) -> Option<&str> {
        self.get(raw)
            .flatten()
            .map(|m| m.reference.as_str())
    }

    /// Region identifier for rendering: the matched reference name, or the
    /// raw name itself as an unlocatable placeholder.
    pub fn location<'a>(&'a self, raw: &'a str) -> &'a str {
        self.reference(raw).unwrap_or(raw)
    }

    /// Raw names without a match, in order.
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, m)| m.is_none())
            .map(|(raw, _)| raw.as_str())
    }

    pub fn tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for m in self.entries.values() {
            match m.as_ref().map(|m| m.tier) {
                Some(MatchTier::Exact) => counts.exact += 1,
                Some(MatchTier::Normalized) => counts.normalized += 1,
                Some(MatchTier::Fuzzy { .. }) => counts.fuzzy += 1,
                None => counts.unmatched += 1,
            }
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Match>)> {
        self.entries.iter().map(|(raw, m)| (raw.as_str(), m.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every distinct source name against `index`.
///
/// Deterministic for a given (names, index, cutoff): duplicates collapse, and
/// fuzzy ties go to the first key in index insertion order.
///
/// ```rust
/// use coffeemap_core::index::ReferenceIndex;
/// use coffeemap_core::matcher::{resolve, Cutoff};
///
/// let index = ReferenceIndex::build(["United States of America", "Bolivia"]);
/// let result = resolve(["United States", "Atlantis"], &index, Cutoff::default());
///
/// assert_eq!(result.reference("United States"), Some("United States of America"));
/// assert_eq!(result.reference("Atlantis"), None);
/// assert_eq!(result.location("Atlantis"), "Atlantis");
/// ```
pub fn resolve<'a, I>(source_names: I, index: &ReferenceIndex, cutoff: Cutoff) -> MatchResult
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = source_names.into_iter().collect();
    let entries = distinct
        .into_iter()
        .map(|raw| (raw.to_owned(), resolve_one(raw, index, cutoff)))
        .collect();
    MatchResult { entries }
}

/// Resolve a single raw name.
pub fn resolve_one(raw: &str, index: &ReferenceIndex, cutoff: Cutoff) -> Option<Match> {
    if index.contains_exact(raw) {
        debug!(raw, "exact match");
        return Some(Match {
            reference: raw.to_owned(),
            tier: MatchTier::Exact,
        });
    }

    let key = normalize(raw);
    if let Some(reference) = index.first_for_key(&key) {
        debug!(raw, key = key.as_str(), reference, "normalized match");
        return Some(Match {
            reference: reference.to_owned(),
            tier: MatchTier::Normalized,
        });
    }

    match best_fuzzy_key(&key, index, cutoff) {
        Some((candidate, score)) => {
            let reference = index.first_for_key(candidate)?;
            debug!(raw, key = key.as_str(), reference, score, "fuzzy match");
            Some(Match {
                reference: reference.to_owned(),
                tier: MatchTier::Fuzzy { score },
            })
        }
        None => {
            debug!(raw, key = key.as_str(), cutoff = cutoff.value(), "no match");
            None
        }
    }
}

/// Highest-scoring index key with `score >= cutoff`; the earliest key wins ties.
fn best_fuzzy_key<'i>(
    key: &str,
    index: &'i ReferenceIndex,
    cutoff: Cutoff,
) -> Option<(&'i str, f64)> {
    let floor = cutoff.value();
    let mut best: Option<(&str, f64)> = None;

    for candidate in index.keys() {
        // Cheap upper bounds first; they can only rule a candidate out.
        if real_quick_ratio(candidate, key) < floor || quick_ratio(candidate, key) < floor {
            continue;
        }
        let score = ratio(candidate, key);
        if score < floor {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best
}
