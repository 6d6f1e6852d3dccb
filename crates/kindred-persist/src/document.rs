//! On-disk document shapes.
//!
//! Both the storage blob and the export file carry `persons` as a sequence
//! of `[identifier, record]` pairs. The storage blob adds `lastUpdated`; the
//! export file adds `exportDate` and a `version` literal.
//!
//! Records are read leniently: any field may be missing or `null` and takes
//! the same default a freshly created person would. Readers never trust the
//! `id` inside a record; the pair's identifier wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kindred_types::{Gender, Person, PersonId, Relationships, SetSlot, SingularSlot};

/// `version` written into export files.
pub const EXPORT_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// The local storage document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDocument<'a> {
    /// Every person as an `[id, record]` pair.
    pub persons: Vec<(&'a PersonId, &'a Person)>,
    /// When the document was written.
    pub last_updated: DateTime<Utc>,
}

/// The export file document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    /// Every person as an `[id, record]` pair.
    pub persons: Vec<(&'a PersonId, &'a Person)>,
    /// When the export was produced.
    pub export_date: DateTime<Utc>,
    /// Always [`EXPORT_VERSION`].
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// A person record as found in a document, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonRecord {
    /// Family name.
    pub surname: Option<String>,
    /// Given names.
    pub first_names: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<String>,
    /// Date of death.
    pub date_of_death: Option<String>,
    /// Marriage date.
    pub marriage_date: Option<String>,
    /// Gender label; anything unrecognized reads as unspecified.
    pub gender: Option<String>,
    /// Relationship block.
    pub relationships: Option<RelationshipsRecord>,
    /// Creation time, RFC 3339.
    pub created_at: Option<String>,
    /// Last edit time, RFC 3339.
    pub updated_at: Option<String>,
}

/// A relationship block as found in a document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RelationshipsRecord {
    /// Father identifier.
    pub father: Option<String>,
    /// Mother identifier.
    pub mother: Option<String>,
    /// Partner identifier.
    pub partner: Option<String>,
    /// Sibling identifiers; `null` entries are ignored.
    pub siblings: Option<Vec<Option<String>>>,
    /// Child identifiers; `null` entries are ignored.
    pub children: Option<Vec<Option<String>>>,
}

impl PersonRecord {
    /// Build a [`Person`] keyed by `id`, filling gaps with defaults.
    ///
    /// Unparseable timestamps become `now`. Self-references are dropped and
    /// duplicate set members collapsed; the number of such repairs is
    /// returned alongside the person.
    pub fn into_person(self, id: PersonId, now: DateTime<Utc>) -> (Person, usize) {
        let (relationships, repairs) = self
            .relationships
            .unwrap_or_default()
            .into_relationships(&id);
        let gender = self
            .gender
            .as_deref()
            .map(Gender::parse_lenient)
            .unwrap_or_default();

        let person = Person {
            surname: self.surname.unwrap_or_default(),
            first_names: self.first_names.unwrap_or_default(),
            date_of_birth: self.date_of_birth.unwrap_or_default(),
            date_of_death: self.date_of_death.unwrap_or_default(),
            marriage_date: self.marriage_date.unwrap_or_default(),
            gender,
            relationships,
            created_at: parse_timestamp(self.created_at.as_deref(), now),
            updated_at: parse_timestamp(self.updated_at.as_deref(), now),
            id,
        };
        (person, repairs)
    }
}

impl RelationshipsRecord {
    fn into_relationships(self, owner: &PersonId) -> (Relationships, usize) {
        let mut rel = Relationships::default();
        let mut repairs: usize = 0;

        for (slot, value) in [
            (SingularSlot::Father, self.father),
            (SingularSlot::Mother, self.mother),
            (SingularSlot::Partner, self.partner),
        ] {
            match value.map(PersonId::from) {
                Some(id) if id == *owner => repairs = repairs.saturating_add(1),
                Some(id) => {
                    rel.replace_singular(slot, Some(id));
                }
                None => {}
            }
        }

        for (slot, values) in [
            (SetSlot::Siblings, self.siblings),
            (SetSlot::Children, self.children),
        ] {
            for id in values.unwrap_or_default().into_iter().flatten().map(PersonId::from) {
                if id == *owner || !rel.insert(slot, id) {
                    repairs = repairs.saturating_add(1);
                }
            }
        }

        (rel, repairs)
    }
}

fn parse_timestamp(value: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map_or(fallback, |parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_gets_creation_defaults() {
        let now = Utc::now();
        let (person, repairs) = PersonRecord::default().into_person(PersonId::from("p"), now);
        assert_eq!(repairs, 0);
        assert_eq!(person.id.as_str(), "p");
        assert_eq!(person.surname, "");
        assert_eq!(person.gender, Gender::Unspecified);
        assert!(person.relationships.is_empty());
        assert_eq!(person.created_at, now);
    }

    #[test]
    fn nulls_and_unknown_values_are_tolerated() {
        let record: PersonRecord = serde_json::from_str(
            r#"{"surname": null, "gender": "Other", "createdAt": "yesterday",
                "updatedAt": "2024-01-02T03:04:05.000Z",
                "relationships": {"father": null, "siblings": null, "children": ["c", null]}}"#,
        )
        .unwrap();
        let now = Utc::now();
        let (person, _) = record.into_person(PersonId::from("p"), now);

        assert_eq!(person.surname, "");
        assert_eq!(person.gender, Gender::Unspecified);
        assert_eq!(person.created_at, now);
        assert_eq!(person.updated_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert_eq!(person.relationships.children, vec![PersonId::from("c")]);
    }

    #[test]
    fn only_exact_gender_labels_are_recognized() {
        for (label, expected) in [
            ("Male", Gender::Male),
            ("Female", Gender::Female),
            ("male", Gender::Unspecified),
            ("F", Gender::Unspecified),
        ] {
            let record: PersonRecord =
                serde_json::from_value(serde_json::json!({ "gender": label })).unwrap();
            let (person, _) = record.into_person(PersonId::from("p"), Utc::now());
            assert_eq!(person.gender, expected, "{label}");
        }
    }

    #[test]
    fn self_references_and_duplicates_are_repaired() {
        let record: PersonRecord = serde_json::from_str(
            r#"{"relationships": {"partner": "p", "siblings": ["s", "s", "p"], "children": ["c"]}}"#,
        )
        .unwrap();
        let (person, repairs) = record.into_person(PersonId::from("p"), Utc::now());

        assert_eq!(repairs, 3);
        assert_eq!(person.relationships.partner, None);
        assert_eq!(person.relationships.siblings, vec![PersonId::from("s")]);
        assert_eq!(person.relationships.children, vec![PersonId::from("c")]);
    }
}
