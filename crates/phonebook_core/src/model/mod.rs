//! Contact record model.
//!
//! # Responsibility
//! - Define the canonical six-field record used by store, search and CLI.
//!
//! # Invariants
//! - Records have no stable key; identity is position within the store.

pub mod entry;
