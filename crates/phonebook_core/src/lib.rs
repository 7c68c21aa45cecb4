//! Core domain logic for the phonebook.
//! This crate is the single source of truth for record and store invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod search;
pub mod service;
pub mod validation;

pub use config::{load_config, normalize_file_name, ConfigError, PhonebookConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    Entry, EntryField, EntryPatch, EntryValidationError, MalformedRecord, FIELD_COUNT,
};
pub use pagination::{paginate, Page, PaginationError};
pub use repo::entry_repo::{
    EntryRepository, InMemoryEntryRepository, MalformedLinePolicy, RepoError, RepoResult,
    TextFileEntryRepository, DEFAULT_DELIMITER,
};
pub use search::filter::{filtered_search, search_by_keyword, FilterSet};
pub use service::store::Store;
pub use validation::is_valid_phone;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
