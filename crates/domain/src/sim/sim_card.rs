//! Canonical SIM comparison.
//!
//! SIM identifiers are alphanumeric codes: surrounding whitespace is dropped,
//! the rest compares exactly (case-sensitive). Every uniqueness check, update
//! and ledger query goes through these helpers.

use crate::error::DomainError;

pub fn normalize_sim(raw: &str) -> &str {
    raw.trim()
}

pub fn same_sim(a: &str, b: &str) -> bool {
    normalize_sim(a) == normalize_sim(b)
}

/// Normalize a SIM coming from user input, rejecting blank values
pub fn parse_sim(raw: &str) -> Result<String, DomainError> {
    let sim = normalize_sim(raw);
    if sim.is_empty() {
        return Err(DomainError::validation("simCard", "empty SIM"));
    }
    Ok(sim.to_string())
}
