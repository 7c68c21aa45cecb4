//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and in-memory queries into session APIs.
//! - Keep console code decoupled from storage details.

pub mod store;
