//! Person identifiers.
//!
//! Identifiers are opaque strings. Fresh identifiers are generated from a
//! UUID v7 (time-ordered) with a `person_` prefix, but any string is accepted
//! when records are loaded so documents written by earlier versions keep
//! their identifiers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Prefix for freshly generated person identifiers.
pub const PERSON_ID_PREFIX: &str = "person_";

/// Unique identifier for a person in the family tree.
///
/// Assigned once at creation and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PersonId(String);

impl PersonId {
    /// Generate a new process-unique identifier.
    pub fn generate() -> Self {
        Self(format!("{PERSON_ID_PREFIX}{}", Uuid::now_v7().simple()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the inner [`String`].
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for PersonId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.0
    }
}

impl AsRef<str> for PersonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
