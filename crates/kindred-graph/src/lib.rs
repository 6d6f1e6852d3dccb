//! Relationship-consistency core for the Kindred family-tree manager.
//!
//! This crate owns the in-memory graph of people and the rules that keep it
//! bidirectionally consistent. It performs no I/O; persistence lives in
//! `kindred-persist` and presentation in the `kindred` binary.
//!
//! # Modules
//!
//! - [`date`] -- Partial-date normalization and display forms
//! - [`store`] -- Identifier-keyed person records
//! - [`engine`] -- Reciprocal edge maintenance, marriage-date sync, cascading delete
//! - [`projector`] -- Names, relationship summaries, collated roster order, person cards
//! - [`candidates`] -- Who may fill a relationship slot
//! - [`tree`] -- The owned session facade used by hosting applications
//! - [`error`] -- Error types

pub mod candidates;
pub mod date;
pub mod engine;
pub mod error;
pub mod projector;
pub mod store;
pub mod tree;

pub use candidates::relationship_candidates;
pub use date::{DatePolicy, PartialDate, display_form, normalize, normalize_strict};
pub use engine::RelationshipEngine;
pub use error::GraphError;
pub use projector::{
    NameCollator, PersonCard, compare_names, full_name, full_name_with_dates, person_card,
    relationship_summary, sorted_roster,
};
pub use store::PersonStore;
pub use tree::FamilyTree;
