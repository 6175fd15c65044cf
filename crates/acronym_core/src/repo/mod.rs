//! Repository layer for acronym persistence.
//!
//! # Responsibility
//! - Define the store contract used by the command router and interaction
//!   handler.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Every operation touches at most one row.
//! - Blank input is skipped at this layer, never written.

pub mod acronym_repo;
