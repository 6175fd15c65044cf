//! Domain model for crowdsourced acronym definitions.
//!
//! # Invariants
//! - Terms are stored uppercase; expansions are stored trimmed.
//! - Only the expansion of a record is ever mutated.
//! - Records are removed by id, never in bulk by term.

pub mod acronym;
