//! Shared type definitions for the Kindred family-tree manager.
//!
//! Every other crate in the workspace builds on these types. Types flow
//! downstream to `TypeScript` via `ts-rs` for a browser front end.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque person identifiers
//! - [`enums`] -- Gender and relationship slot enumerations
//! - [`structs`] -- The person record, its relationship block, and edit inputs

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{Gender, ParseEnumError, RelationSlot, SetSlot, SingularSlot};
pub use ids::{PERSON_ID_PREFIX, PersonId};
pub use structs::{NewPerson, Person, PersonUpdate, Relationships};
