//! Entry store use-case service.
//!
//! # Responsibility
//! - Own the ordered in-memory entry sequence for one session.
//! - Expose add/edit/query operations over it.
//! - Delegate persistence to an [`EntryRepository`] on explicit request.
//!
//! # Invariants
//! - Insertion order is display order; identity is the position index.
//! - `add` and `edit` never persist; callers call [`Store::persist`].
//! - A failed `edit` leaves the sequence untouched.

use crate::model::entry::{Entry, EntryPatch};
use crate::pagination::{paginate, Page, PaginationError};
use crate::repo::entry_repo::{EntryRepository, RepoResult};
use crate::search::filter::{self, FilterSet};
use log::{info, warn};

/// In-memory entry collection backed by a repository.
pub struct Store<R: EntryRepository> {
    repo: R,
    entries: Vec<Entry>,
}

impl<R: EntryRepository> Store<R> {
    /// Loads the persisted sequence and wraps it in a store.
    ///
    /// # Errors
    /// - Propagates repository load errors unchanged.
    pub fn open(repo: R) -> RepoResult<Self> {
        let entries = repo.load()?;
        Ok(Self { repo, entries })
    }

    /// Creates a store with an explicit initial sequence without loading.
    pub fn with_entries(repo: R, entries: Vec<Entry>) -> Self {
        Self { repo, entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Converts a 1-based display number into a valid 0-based index.
    pub fn index_from_display(&self, number: usize) -> Option<usize> {
        number
            .checked_sub(1)
            .filter(|index| *index < self.entries.len())
    }

    /// Appends `entry` at the end of the sequence.
    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
        info!(
            "event=entry_add module=store status=ok entries={}",
            self.entries.len()
        );
    }

    /// Applies `patch` to the entry at `index`.
    ///
    /// Returns `false` without mutating anything when `index` is out of range.
    pub fn edit(&mut self, index: usize, patch: &EntryPatch) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            warn!(
                "event=entry_edit module=store status=error error_code=invalid_index index={} entries={}",
                index,
                self.entries.len()
            );
            return false;
        };
        entry.update(patch);
        info!("event=entry_edit module=store status=ok index={}", index);
        true
    }

    /// Writes the full sequence through the repository.
    pub fn persist(&mut self) -> RepoResult<()> {
        self.repo.save(&self.entries)
    }

    /// Free-text search over all fields. A blank keyword matches nothing.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&Entry> {
        let hits = filter::search_by_keyword(&self.entries, keyword);
        info!(
            "event=search module=store status=ok mode=keyword hits={}",
            hits.len()
        );
        hits
    }

    /// Conjunctive per-field search.
    pub fn filtered_search(&self, filters: &FilterSet) -> Vec<&Entry> {
        let hits = filter::filtered_search(&self.entries, filters);
        info!(
            "event=search module=store status=ok mode=filtered hits={}",
            hits.len()
        );
        hits
    }

    /// Splits the sequence into display pages.
    pub fn pages(&self, page_size: usize) -> Result<Vec<Page<'_>>, PaginationError> {
        paginate(&self.entries, page_size)
    }
}
