//! In-memory query entry points.
//!
//! # Responsibility
//! - Free-text keyword search and per-field filtered search over entries.
//! - Keep result ordering identical to store order.

pub mod filter;
