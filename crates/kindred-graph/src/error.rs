//! Error types for the kindred-graph crate.
//!
//! Relationship operations absorb unknown identifiers as silent no-ops, so
//! the variants here are limited to explicit lookups, self-references, and
//! the strict date policy.

use kindred_types::{PersonId, RelationSlot};

/// Errors raised by the person store, the relationship engine, and the
/// family-tree facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No person with the given identifier exists in the store.
    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    /// A relationship operation tried to point a person at themselves.
    #[error("{person} cannot be their own {slot}")]
    SelfReference {
        /// The acting person.
        person: PersonId,
        /// The slot that would have held the self-reference.
        slot: RelationSlot,
    },

    /// A date did not match any recognized shape under the strict policy.
    #[error("unrecognized date {input:?}: expected YYYY, YYYY-MM, or YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input, trimmed.
        input: String,
    },
}
