//! Case-insensitive keyword matching over property values

use super::{timed_filter, MatchMode, QueryKind, QueryResult};
use crate::error::QueryError;
use crate::types::{Feature, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category aliases for keyword search.
///
/// A keyword listed here also matches, in `contains` mode, any value that
/// contains one of its alias terms. The default table maps the generic
/// "school" keyword onto the university category used by the POI tables.
/// Exact mode ignores aliases. Keys and terms are trimmed and lower-cased on
/// the way in, whether inserted directly or loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct KeywordAliases(BTreeMap<String, Vec<String>>);

impl KeywordAliases {
    /// A table with no aliases.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Registers `terms` as aliases of `keyword`. Blank terms are dropped,
    /// since an empty term would be contained in every value.
    pub fn insert(&mut self, keyword: &str, terms: impl IntoIterator<Item = impl Into<String>>) {
        let terms = terms
            .into_iter()
            .map(|t| t.into().trim().to_lowercase())
            .filter(|t| !t.is_empty());
        self.0
            .entry(keyword.trim().to_lowercase())
            .or_default()
            .extend(terms);
    }

    fn terms_for(&self, needle: &str) -> &[String] {
        self.0.get(needle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for KeywordAliases {
    fn from(table: BTreeMap<String, Vec<String>>) -> Self {
        let mut aliases = Self::empty();
        for (keyword, terms) in table {
            aliases.insert(&keyword, terms);
        }
        aliases
    }
}

impl From<KeywordAliases> for BTreeMap<String, Vec<String>> {
    fn from(aliases: KeywordAliases) -> Self {
        aliases.0
    }
}

impl Default for KeywordAliases {
    fn default() -> Self {
        let mut aliases = Self::empty();
        aliases.insert("学校", ["高等院校"]);
        aliases
    }
}

/// A prepared keyword: trimmed and lower-cased once, then tested against
/// every property value of every feature.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    needle: String,
    aliases: Vec<String>,
    mode: MatchMode,
}

impl KeywordMatcher {
    /// Prepares a keyword with no aliases. Blank keywords are refused.
    pub fn new(keyword: &str, mode: MatchMode) -> Result<Self, QueryError> {
        Self::with_aliases(keyword, mode, &KeywordAliases::empty())
    }

    /// Prepares a keyword, pulling its alias terms from `aliases`.
    pub fn with_aliases(
        keyword: &str,
        mode: MatchMode,
        aliases: &KeywordAliases,
    ) -> Result<Self, QueryError> {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyKeyword);
        }
        let needle = trimmed.to_lowercase();
        let aliases = match mode {
            MatchMode::Exact => Vec::new(),
            MatchMode::Contains => aliases.terms_for(&needle).to_vec(),
        };
        Ok(Self {
            needle,
            aliases,
            mode,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether any property value matches, regardless of property name.
    pub fn matches(&self, feature: &Feature) -> bool {
        feature.properties.values().any(|v| self.matches_value(v))
    }

    /// Filters `features`, timing the pass.
    pub fn run(&self, features: &[Feature]) -> QueryResult {
        timed_filter(QueryKind::Keyword, features, |f| self.matches(f))
    }

    fn matches_value(&self, value: &PropertyValue) -> bool {
        if value.is_blank() {
            return false;
        }
        let haystack = value.to_string().to_lowercase();
        match self.mode {
            MatchMode::Exact => haystack == self.needle,
            MatchMode::Contains => {
                haystack.contains(&self.needle)
                    || self.aliases.iter().any(|a| haystack.contains(a.as_str()))
            }
        }
    }
}

/// Returns every feature with a property value matching `keyword`.
pub fn keyword_query(
    features: &[Feature],
    keyword: &str,
    mode: MatchMode,
    aliases: &KeywordAliases,
) -> Result<QueryResult, QueryError> {
    Ok(KeywordMatcher::with_aliases(keyword, mode, aliases)?.run(features))
}
