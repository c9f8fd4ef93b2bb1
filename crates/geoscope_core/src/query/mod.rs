//! Keyword and bounding-box queries over the active layer
//!
//! Both query kinds are a single linear pass over the already-downloaded
//! feature collection. They never reorder features: a [`QueryResult`] stores
//! indices into the collection in ascending order, alongside the wall-clock
//! time the filter pass took.

mod keyword;
mod range;
mod stats;

pub use keyword::{keyword_query, KeywordAliases, KeywordMatcher};
pub use range::range_query;
pub use stats::{format_stats, loading_text, IDLE_STATS};

use crate::error::QueryError;
use crate::types::Feature;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// How a keyword is compared against property values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The whole stringified value must equal the keyword.
    Exact,
    /// The keyword may appear anywhere in the stringified value.
    #[default]
    Contains,
}

impl FromStr for MatchMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "contains" => Ok(Self::Contains),
            other => Err(QueryError::UnknownMatchMode(other.to_string())),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Contains => f.write_str("contains"),
        }
    }
}

/// Which query produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    Keyword,
    Range,
}

impl QueryKind {
    /// Label shown in the statistics readout.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keyword => "Keyword query",
            Self::Range => "Range query",
        }
    }
}

/// The matching subset of the active collection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    kind: QueryKind,
    indices: Vec<usize>,
    elapsed: Duration,
}

impl QueryResult {
    pub fn new(kind: QueryKind, indices: Vec<usize>, elapsed: Duration) -> Self {
        Self {
            kind,
            indices,
            elapsed,
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Indices of the matching features, in collection order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Whether the feature at `index` is part of the result.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Resolves the result against the collection it was computed from.
    pub fn features<'a>(&'a self, features: &'a [Feature]) -> impl Iterator<Item = &'a Feature> + 'a {
        self.indices.iter().filter_map(move |&i| features.get(i))
    }
}

/// Runs `predicate` over every feature and times the pass.
pub(crate) fn timed_filter<F>(kind: QueryKind, features: &[Feature], mut predicate: F) -> QueryResult
where
    F: FnMut(&Feature) -> bool,
{
    let start = Instant::now();
    let indices: Vec<usize> = features
        .iter()
        .enumerate()
        .filter_map(|(i, f)| predicate(f).then_some(i))
        .collect();
    let elapsed = start.elapsed();

    tracing::debug!(
        kind = kind.label(),
        scanned = features.len(),
        matched = indices.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "query pass complete"
    );

    QueryResult::new(kind, indices, elapsed)
}
