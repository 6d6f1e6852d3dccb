//! Enumeration types for the family tree.
//!
//! [`Gender`] drives parent-slot inference when a child edge is added or
//! removed. The slot enums name the five relationship fields a person carries.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Recorded gender of a person.
///
/// Serialized as `"Male"`, `"Female"`, or the empty string.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Gender {
    /// Recorded as male. Adding a child sets the child's father slot.
    Male,
    /// Recorded as female. Adding a child sets the child's mother slot.
    Female,
    /// Not recorded. Child edges carry no parent inference.
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl Gender {
    /// The label used in documents and display (`""` when unspecified).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unspecified => "",
        }
    }

    /// Read a stored label. Only the exact labels `Male` and `Female` are
    /// recognized; anything else, including other spellings, is
    /// [`Gender::Unspecified`] and so carries no parent inference.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "Male" => Self::Male,
            "Female" => Self::Female,
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "" | "unspecified" => Ok(Self::Unspecified),
            _ => Err(ParseEnumError::new("gender", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Relationship slots
// ---------------------------------------------------------------------------

/// A relationship field holding at most one person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SingularSlot {
    /// The person's father. Reciprocal: the father's `children`.
    Father,
    /// The person's mother. Reciprocal: the mother's `children`.
    Mother,
    /// The person's partner. Reciprocal: the partner's `partner`.
    Partner,
}

impl SingularSlot {
    /// All singular slots in display order.
    pub const ALL: [Self; 3] = [Self::Father, Self::Mother, Self::Partner];

    /// Lowercase field name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Partner => "partner",
        }
    }
}

impl fmt::Display for SingularSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SingularSlot {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "father" => Ok(Self::Father),
            "mother" => Ok(Self::Mother),
            "partner" => Ok(Self::Partner),
            _ => Err(ParseEnumError::new("singular slot", s)),
        }
    }
}

/// A relationship field holding an insertion-ordered set of people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SetSlot {
    /// Siblings. Reciprocal: the sibling's `siblings`.
    Siblings,
    /// Children. Reciprocal: the child's `father` or `mother`, inferred
    /// from the parent's gender.
    Children,
}

impl SetSlot {
    /// Lowercase field name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Siblings => "siblings",
            Self::Children => "children",
        }
    }
}

impl fmt::Display for SetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SetSlot {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "siblings" | "sibling" => Ok(Self::Siblings),
            "children" | "child" => Ok(Self::Children),
            _ => Err(ParseEnumError::new("set slot", s)),
        }
    }
}

/// Any of the five relationship fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationSlot {
    /// `father`, `mother`, or `partner`.
    Singular(SingularSlot),
    /// `siblings` or `children`.
    Set(SetSlot),
}

impl RelationSlot {
    /// Lowercase field name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Singular(slot) => slot.name(),
            Self::Set(slot) => slot.name(),
        }
    }
}

impl From<SingularSlot> for RelationSlot {
    fn from(slot: SingularSlot) -> Self {
        Self::Singular(slot)
    }
}

impl From<SetSlot> for RelationSlot {
    fn from(slot: SetSlot) -> Self {
        Self::Set(slot)
    }
}

impl fmt::Display for RelationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelationSlot {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(slot) = s.parse::<SingularSlot>() {
            return Ok(Self::Singular(slot));
        }
        s.parse::<SetSlot>()
            .map(Self::Set)
            .map_err(|e| ParseEnumError::new("relationship slot", &e.value))
    }
}
