//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-sequence load/save contract for entries.
//! - Isolate file format details from the store service.
//!
//! # Invariants
//! - Persistence is always a full rewrite; there is no partial save.

pub mod entry_repo;
