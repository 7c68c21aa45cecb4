//! Fixed-size paging over an entry sequence.
//!
//! # Invariants
//! - Page numbers are 1-based; `start` offsets are 0-based.
//! - Page count is `ceil(len / page_size)`; only the last page may be short.

use crate::model::entry::Entry;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    ZeroPageSize,
}

impl Display for PaginationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page size must be greater than zero"),
        }
    }
}

impl Error for PaginationError {}

/// One display page borrowed from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    /// 0-based offset of the first entry on this page.
    pub start: usize,
    pub entries: &'a [Entry],
}

/// Splits `entries` into pages of `page_size`.
pub fn paginate(entries: &[Entry], page_size: usize) -> Result<Vec<Page<'_>>, PaginationError> {
    if page_size == 0 {
        return Err(PaginationError::ZeroPageSize);
    }
    Ok(entries
        .chunks(page_size)
        .enumerate()
        .map(|(index, chunk)| Page {
            number: index + 1,
            start: index * page_size,
            entries: chunk,
        })
        .collect())
}
