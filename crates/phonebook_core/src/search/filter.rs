//! Keyword and per-field filtered search.
//!
//! # Responsibility
//! - Match entries against a single free-text keyword.
//! - Match entries against per-field keyword sets.
//!
//! # Invariants
//! - Comparisons are exact per field and case-insensitive.
//! - Results preserve the relative order of the input sequence.
//! - A blank free-text keyword matches nothing.
//! - An empty keyword set for a field places no constraint on that field.

use crate::model::entry::{Entry, EntryField};
use std::collections::{BTreeMap, BTreeSet};

/// Per-field sets of accepted lowercase values.
///
/// Fields without keywords are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    keywords: BTreeMap<EntryField, BTreeSet<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds keywords for `field`, lowercasing each one.
    pub fn with<I, S>(mut self, field: EntryField, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.keywords.entry(field).or_default();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() {
                set.insert(keyword.to_lowercase());
            }
        }
        self
    }

    /// Splits raw console input on whitespace and adds every token for `field`.
    pub fn insert_keywords(&mut self, field: EntryField, raw: &str) {
        let set = self.keywords.entry(field).or_default();
        set.extend(raw.split_whitespace().map(str::to_lowercase));
    }

    /// Returns the accepted values for `field` (empty when unconstrained).
    pub fn keywords(&self, field: EntryField) -> impl Iterator<Item = &str> + '_ {
        self.keywords
            .get(&field)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Returns whether `entry` passes every per-field constraint.
    pub fn accepts(&self, entry: &Entry) -> bool {
        EntryField::ALL.into_iter().all(|field| {
            match self.keywords.get(&field) {
                Some(set) if !set.is_empty() => set.contains(&entry.get(field).to_lowercase()),
                _ => true,
            }
        })
    }
}

/// Returns entries where any field equals `keyword`, ignoring case.
///
/// A blank keyword returns no entries.
pub fn search_by_keyword<'a>(entries: &'a [Entry], keyword: &str) -> Vec<&'a Entry> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| entry.matches(&keyword))
        .collect()
}

/// Returns entries accepted by every per-field filter in `filters`.
pub fn filtered_search<'a>(entries: &'a [Entry], filters: &FilterSet) -> Vec<&'a Entry> {
    entries.iter().filter(|entry| filters.accepts(entry)).collect()
}
