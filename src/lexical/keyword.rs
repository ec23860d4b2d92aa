//! Contains the [`KeywordTable`] a grammar hands to the lexer.

use std::collections::HashMap;

use derive_more::{Deref, From};
use itertools::Itertools as _;

/// Caller defined identifier of a keyword.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From)]
pub struct KeywordId(pub u32);

/// A keyword spelling and the identifier the grammar assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeywordEntry {
    /// The spelling of the keyword, matched case-insensitively.
    pub name: String,
    /// The identifier returned when the keyword is found.
    pub id: KeywordId,
}

/// Immutable, case-insensitive mapping from keyword spelling to [`KeywordId`].
///
/// The table is built once by the grammar and borrowed by every lexer that uses it, so it may be
/// shared freely between lexers.
#[derive(Debug, Clone, Default, Deref)]
pub struct KeywordTable {
    #[deref]
    entries: Vec<KeywordEntry>,
    lookup: HashMap<String, KeywordId>,
}

impl KeywordTable {
    /// Builds a table from `(name, id)` pairs.
    ///
    /// When a spelling occurs more than once, ignoring case, the first entry wins.
    pub fn new<N, I>(entries: impl IntoIterator<Item = (N, I)>) -> Self
    where
        N: Into<String>,
        I: Into<KeywordId>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, id)| KeywordEntry {
                name: name.into(),
                id: id.into(),
            })
            .collect::<Vec<_>>();

        let mut lookup = HashMap::with_capacity(entries.len());
        for entry in &entries {
            lookup
                .entry(entry.name.to_ascii_lowercase())
                .or_insert(entry.id);
        }

        Self { entries, lookup }
    }

    /// Builds a table where each keyword's id is its index in `names`.
    #[must_use]
    pub fn from_names(names: &[&str]) -> Self {
        Self::new((0u32..).zip(names).map(|(id, name)| (*name, id)))
    }

    /// Looks up `text`, ignoring case.
    #[must_use]
    pub fn find_token(&self, text: &str) -> Option<KeywordId> {
        self.lookup.get(&text.to_ascii_lowercase()).copied()
    }

    /// Gets the spelling registered for `id`.
    #[must_use]
    pub fn name(&self, id: KeywordId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
    }

    /// Lists up to 8 keyword spellings close to `text`, the closest first.
    #[must_use]
    pub fn similar(&self, text: &str) -> Vec<&str> {
        let text = text.to_ascii_lowercase();
        self.entries
            .iter()
            .filter_map(|entry| {
                let name = entry.name.to_ascii_lowercase();
                let normalized_distance = strsim::normalized_damerau_levenshtein(&text, &name);
                (normalized_distance > 0.8 || strsim::damerau_levenshtein(&text, &name) < 3)
                    .then_some((normalized_distance, entry.name.as_str()))
            })
            .sorted_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, name)| name)
            .dedup()
            .take(8)
            .collect()
    }
}
