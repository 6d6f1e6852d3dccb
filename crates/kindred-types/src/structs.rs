//! Core entity structs: the person record, its embedded relationship block,
//! and the typed inputs for creating and editing a person.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Gender, SetSlot, SingularSlot};
use crate::ids::PersonId;

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// The relationship block embedded in every person.
///
/// Singular slots hold at most one identifier. Set slots preserve insertion
/// order and never contain duplicates. Identifiers may dangle (name a person
/// that no longer exists); readers treat such entries as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Relationships {
    /// The person's father.
    pub father: Option<PersonId>,
    /// The person's mother.
    pub mother: Option<PersonId>,
    /// Siblings, in the order they were added.
    pub siblings: Vec<PersonId>,
    /// The person's partner.
    pub partner: Option<PersonId>,
    /// Children, in the order they were added.
    pub children: Vec<PersonId>,
}

impl Relationships {
    /// Read a singular slot.
    pub const fn singular(&self, slot: SingularSlot) -> Option<&PersonId> {
        match slot {
            SingularSlot::Father => self.father.as_ref(),
            SingularSlot::Mother => self.mother.as_ref(),
            SingularSlot::Partner => self.partner.as_ref(),
        }
    }

    /// Replace a singular slot, returning the previous value.
    pub fn replace_singular(
        &mut self,
        slot: SingularSlot,
        value: Option<PersonId>,
    ) -> Option<PersonId> {
        let field = match slot {
            SingularSlot::Father => &mut self.father,
            SingularSlot::Mother => &mut self.mother,
            SingularSlot::Partner => &mut self.partner,
        };
        core::mem::replace(field, value)
    }

    /// Members of a set slot in insertion order.
    pub fn members(&self, slot: SetSlot) -> &[PersonId] {
        match slot {
            SetSlot::Siblings => &self.siblings,
            SetSlot::Children => &self.children,
        }
    }

    /// Whether a set slot contains `id`.
    pub fn contains(&self, slot: SetSlot, id: &PersonId) -> bool {
        self.members(slot).contains(id)
    }

    /// Append `id` to a set slot. Returns `false` if it was already present.
    pub fn insert(&mut self, slot: SetSlot, id: PersonId) -> bool {
        let set = self.set_mut(slot);
        if set.contains(&id) {
            return false;
        }
        set.push(id);
        true
    }

    /// Remove `id` from a set slot. Returns `false` if it was absent.
    pub fn remove(&mut self, slot: SetSlot, id: &PersonId) -> bool {
        let set = self.set_mut(slot);
        let before = set.len();
        set.retain(|member| member != id);
        set.len() != before
    }

    /// Whether any slot refers to `id`.
    pub fn references(&self, id: &PersonId) -> bool {
        SingularSlot::ALL
            .iter()
            .any(|slot| self.singular(*slot) == Some(id))
            || self.siblings.contains(id)
            || self.children.contains(id)
    }

    /// Clear every reference to `id`. Returns `true` if anything changed.
    pub fn prune(&mut self, id: &PersonId) -> bool {
        let mut changed = false;
        for slot in SingularSlot::ALL {
            if self.singular(slot) == Some(id) {
                self.replace_singular(slot, None);
                changed = true;
            }
        }
        changed |= self.remove(SetSlot::Siblings, id);
        changed |= self.remove(SetSlot::Children, id);
        changed
    }

    /// Whether no relationship is recorded at all.
    pub const fn is_empty(&self) -> bool {
        self.father.is_none()
            && self.mother.is_none()
            && self.partner.is_none()
            && self.siblings.is_empty()
            && self.children.is_empty()
    }

    const fn set_mut(&mut self, slot: SetSlot) -> &mut Vec<PersonId> {
        match slot {
            SetSlot::Siblings => &mut self.siblings,
            SetSlot::Children => &mut self.children,
        }
    }
}

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// A person in the family tree.
///
/// Dates are canonical partial-date strings (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`)
/// or empty. Unrecognized date text is kept verbatim under the lenient date
/// policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Person {
    /// Immutable identifier.
    pub id: PersonId,
    /// Family name (may be empty).
    pub surname: String,
    /// Given names (may be empty).
    pub first_names: String,
    /// Date of birth.
    pub date_of_birth: String,
    /// Date of death.
    pub date_of_death: String,
    /// Date of marriage to the current partner.
    pub marriage_date: String,
    /// Recorded gender.
    pub gender: Gender,
    /// Embedded relationship block.
    pub relationships: Relationships,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record's attributes were last edited.
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Build a record with an empty relationship block, stamping both
    /// timestamps with `now`.
    pub fn new(id: PersonId, fields: NewPerson, now: DateTime<Utc>) -> Self {
        Self {
            id,
            surname: fields.surname,
            first_names: fields.first_names,
            date_of_birth: fields.date_of_birth,
            date_of_death: fields.date_of_death,
            marriage_date: fields.marriage_date,
            gender: fields.gender,
            relationships: Relationships::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the attributes present in `update`. Relationships and
    /// timestamps are left to the caller.
    pub fn apply(&mut self, update: PersonUpdate) {
        if let Some(surname) = update.surname {
            self.surname = surname;
        }
        if let Some(first_names) = update.first_names {
            self.first_names = first_names;
        }
        if let Some(date) = update.date_of_birth {
            self.date_of_birth = date;
        }
        if let Some(date) = update.date_of_death {
            self.date_of_death = date;
        }
        if let Some(date) = update.marriage_date {
            self.marriage_date = date;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Attributes for a new person. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewPerson {
    /// Family name.
    pub surname: String,
    /// Given names.
    pub first_names: String,
    /// Date of birth, as entered.
    pub date_of_birth: String,
    /// Date of death, as entered.
    pub date_of_death: String,
    /// Marriage date, as entered.
    pub marriage_date: String,
    /// Recorded gender.
    pub gender: Gender,
}

impl NewPerson {
    /// Start from a name; everything else empty.
    pub fn named(first_names: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            first_names: first_names.into(),
            surname: surname.into(),
            ..Self::default()
        }
    }

    /// Set the gender.
    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Set the date of birth.
    #[must_use]
    pub fn with_birth(mut self, date: impl Into<String>) -> Self {
        self.date_of_birth = date.into();
        self
    }

    /// Set the date of death.
    #[must_use]
    pub fn with_death(mut self, date: impl Into<String>) -> Self {
        self.date_of_death = date.into();
        self
    }

    /// Set the marriage date.
    #[must_use]
    pub fn with_marriage_date(mut self, date: impl Into<String>) -> Self {
        self.marriage_date = date.into();
        self
    }
}

/// An attribute edit. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PersonUpdate {
    /// New family name.
    pub surname: Option<String>,
    /// New given names.
    pub first_names: Option<String>,
    /// New date of birth.
    pub date_of_birth: Option<String>,
    /// New date of death.
    pub date_of_death: Option<String>,
    /// New marriage date.
    pub marriage_date: Option<String>,
    /// New gender.
    pub gender: Option<Gender>,
}

impl PersonUpdate {
    /// Whether the edit changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.surname.is_none()
            && self.first_names.is_none()
            && self.date_of_birth.is_none()
            && self.date_of_death.is_none()
            && self.marriage_date.is_none()
            && self.gender.is_none()
    }
}
