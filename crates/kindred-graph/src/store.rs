//! The person store: identifier-keyed records with no relationship side
//! effects.
//!
//! Deleting a record here does not prune references held by other people;
//! [`RelationshipEngine::cascade_delete`](crate::engine::RelationshipEngine::cascade_delete)
//! does that. Callers outside this crate only ever see shared references,
//! so relationship fields cannot be edited around the engine.

use std::collections::BTreeMap;

use chrono::Utc;

use kindred_types::{NewPerson, Person, PersonId, PersonUpdate};

use crate::error::GraphError;

/// Owns every person record, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonStore {
    /// All records. Iteration order is identifier order.
    persons: BTreeMap<PersonId, Person>,
}

impl PersonStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            persons: BTreeMap::new(),
        }
    }

    /// Build a store from existing records, keyed by each record's `id`.
    ///
    /// Later records replace earlier ones with the same identifier.
    pub fn from_persons(persons: impl IntoIterator<Item = Person>) -> Self {
        Self {
            persons: persons
                .into_iter()
                .map(|person| (person.id.clone(), person))
                .collect(),
        }
    }

    /// Create a record with a fresh identifier and an empty relationship
    /// block, stamping both timestamps with the current time.
    pub fn create(&mut self, fields: NewPerson) -> &Person {
        let mut id = PersonId::generate();
        while self.persons.contains_key(&id) {
            id = PersonId::generate();
        }
        let person = Person::new(id.clone(), fields, Utc::now());
        tracing::debug!(person = %id, "person created");
        self.persons.entry(id).or_insert(person)
    }

    /// Look up a record.
    pub fn get(&self, id: &PersonId) -> Option<&Person> {
        self.persons.get(id)
    }

    /// Whether a record with this identifier exists.
    pub fn contains(&self, id: &PersonId) -> bool {
        self.persons.contains_key(id)
    }

    /// Merge `fields` over an existing record and re-stamp `updated_at`.
    /// Relationships are not touched.
    pub fn update(&mut self, id: &PersonId, fields: PersonUpdate) -> Result<&Person, GraphError> {
        let person = self
            .persons
            .get_mut(id)
            .ok_or_else(|| GraphError::PersonNotFound(id.clone()))?;
        person.apply(fields);
        person.updated_at = Utc::now();
        tracing::debug!(person = %id, "person updated");
        Ok(person)
    }

    /// Remove a record without pruning references to it.
    pub fn delete(&mut self, id: &PersonId) -> Option<Person> {
        self.persons.remove(id)
    }

    /// Every record, in identifier order.
    pub fn all(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// Every identifier, in order.
    pub fn ids(&self) -> impl Iterator<Item = &PersonId> {
        self.persons.keys()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Consume the store, yielding its records in identifier order.
    pub fn into_persons(self) -> impl Iterator<Item = Person> {
        self.persons.into_values()
    }

    pub(crate) fn get_mut(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.persons.get_mut(id)
    }

    pub(crate) fn all_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.persons.values_mut()
    }
}
