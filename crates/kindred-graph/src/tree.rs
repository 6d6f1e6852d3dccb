//! The family-tree session: one owned store plus the rules that apply when
//! people are entered through a form or command line.
//!
//! [`FamilyTree`] is the entry point for hosting applications. It normalizes
//! dates under a [`DatePolicy`] before they reach the store, keeps partner
//! marriage dates in step after edits, and reports unknown identifiers as
//! [`GraphError::PersonNotFound`] rather than absorbing them.

use kindred_types::{NewPerson, Person, PersonId, PersonUpdate, RelationSlot};

use crate::candidates::relationship_candidates;
use crate::date::DatePolicy;
use crate::engine::RelationshipEngine;
use crate::error::GraphError;
use crate::projector::{PersonCard, person_card, sorted_roster};
use crate::store::PersonStore;

/// An explicitly owned family tree.
#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    /// Every person record.
    store: PersonStore,
    /// How entered dates are normalized.
    date_policy: DatePolicy,
    /// Records that received a partner's marriage date when opened.
    synced_on_open: usize,
}

impl FamilyTree {
    /// An empty tree.
    pub const fn new(date_policy: DatePolicy) -> Self {
        Self {
            store: PersonStore::new(),
            date_policy,
            synced_on_open: 0,
        }
    }

    /// Take ownership of a loaded store and synchronize marriage dates for
    /// every partner pair.
    pub fn open(mut store: PersonStore, date_policy: DatePolicy) -> Self {
        let synced_on_open = RelationshipEngine::new(&mut store).sync_all_marriage_dates();
        tracing::debug!(persons = store.len(), synced_on_open, "family tree opened");
        Self {
            store,
            date_policy,
            synced_on_open,
        }
    }

    /// How many records were changed by [`FamilyTree::open`]. A non-zero
    /// value means the store differs from what was loaded.
    pub const fn synced_on_open(&self) -> usize {
        self.synced_on_open
    }

    /// The active date policy.
    pub const fn date_policy(&self) -> DatePolicy {
        self.date_policy
    }

    /// Read access to the store.
    pub const fn store(&self) -> &PersonStore {
        &self.store
    }

    /// Give up the store, e.g. to persist it.
    pub fn into_store(self) -> PersonStore {
        self.store
    }

    /// Swap in a whole new store, as an import does. Marriage dates are not
    /// synchronized; the imported records are taken as they are.
    pub fn replace_store(&mut self, store: PersonStore) -> PersonStore {
        core::mem::replace(&mut self.store, store)
    }

    /// A relationship engine over this tree's store.
    pub const fn engine(&mut self) -> RelationshipEngine<'_> {
        RelationshipEngine::new(&mut self.store)
    }

    // -----------------------------------------------------------------------
    // People
    // -----------------------------------------------------------------------

    /// Look up a person.
    pub fn person(&self, id: &PersonId) -> Result<&Person, GraphError> {
        self.store
            .get(id)
            .ok_or_else(|| GraphError::PersonNotFound(id.clone()))
    }

    /// Create a person, normalizing the three date fields first.
    pub fn create_person(&mut self, mut fields: NewPerson) -> Result<&Person, GraphError> {
        fields.date_of_birth = self.date_policy.apply(&fields.date_of_birth)?;
        fields.date_of_death = self.date_policy.apply(&fields.date_of_death)?;
        fields.marriage_date = self.date_policy.apply(&fields.marriage_date)?;
        Ok(self.store.create(fields))
    }

    /// Edit a person's attributes, normalizing any dates supplied, then
    /// synchronize marriage dates with their partner if they have one.
    pub fn update_person(
        &mut self,
        id: &PersonId,
        mut update: PersonUpdate,
    ) -> Result<&Person, GraphError> {
        let policy = self.date_policy;
        for date in [
            &mut update.date_of_birth,
            &mut update.date_of_death,
            &mut update.marriage_date,
        ]
        .into_iter()
        .flatten()
        {
            *date = policy.apply(date)?;
        }

        let partner = self.store.update(id, update)?.relationships.partner.clone();
        if let Some(partner) = partner {
            self.engine().synchronize_marriage_dates(id, &partner);
        }
        self.person(id)
    }

    /// Delete a person and every reference to them.
    pub fn delete_person(&mut self, id: &PersonId) -> Result<Person, GraphError> {
        self.engine()
            .cascade_delete(id)
            .ok_or_else(|| GraphError::PersonNotFound(id.clone()))
    }

    // -----------------------------------------------------------------------
    // Relationships
    // -----------------------------------------------------------------------

    /// Set a singular slot or add to a set slot. Both people must exist.
    pub fn link(
        &mut self,
        person: &PersonId,
        slot: RelationSlot,
        target: &PersonId,
    ) -> Result<bool, GraphError> {
        self.person(person)?;
        self.person(target)?;
        self.engine().link(person, slot, target)
    }

    /// Clear a singular slot or remove from a set slot. The acting person
    /// must exist; the target may already be gone.
    pub fn unlink(
        &mut self,
        person: &PersonId,
        slot: RelationSlot,
        target: Option<&PersonId>,
    ) -> Result<bool, GraphError> {
        self.person(person)?;
        self.engine().unlink(person, slot, target)
    }

    /// People selectable for `person`'s `slot`.
    pub fn candidates(
        &self,
        person: &PersonId,
        slot: RelationSlot,
    ) -> Result<Vec<&Person>, GraphError> {
        self.person(person)?;
        Ok(relationship_candidates(&self.store, person, slot))
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The display card for one person.
    pub fn card(&self, id: &PersonId) -> Result<PersonCard, GraphError> {
        Ok(person_card(self.person(id)?, &self.store))
    }

    /// Cards for everyone, in roster order.
    pub fn roster(&self) -> Vec<PersonCard> {
        sorted_roster(&self.store)
            .into_iter()
            .map(|person| person_card(person, &self.store))
            .collect()
    }
}
