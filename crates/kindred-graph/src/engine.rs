//! The relationship engine: the only path by which relationship fields
//! change.
//!
//! Every edge has a reciprocal:
//!
//! | Edge on A            | Reciprocal on B                  |
//! |----------------------|----------------------------------|
//! | `father`/`mother` = B | B's `children` contains A       |
//! | `partner` = B        | B's `partner` = A                |
//! | `siblings` has B     | B's `siblings` has A             |
//! | `children` has B     | B's `father`/`mother` = A, by A's gender |
//!
//! Each public operation leaves both sides consistent before it returns.
//! Unknown identifiers are absorbed as no-ops (logged at debug level) and
//! self-references are rejected.
//!
//! When a reciprocal slot is cleared on a former target, it is cleared only
//! if it still names the acting person, so one person's edit never erases a
//! link that belongs to somebody else.

use kindred_types::{Gender, Person, PersonId, RelationSlot, SetSlot, SingularSlot};

use crate::error::GraphError;
use crate::store::PersonStore;

/// Applies and retracts relationship edges on a borrowed [`PersonStore`].
#[derive(Debug)]
pub struct RelationshipEngine<'a> {
    store: &'a mut PersonStore,
}

impl<'a> RelationshipEngine<'a> {
    /// Wrap a store for the duration of one or more edits.
    pub const fn new(store: &'a mut PersonStore) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &PersonStore {
        self.store
    }

    // -----------------------------------------------------------------------
    // Singular slots
    // -----------------------------------------------------------------------

    /// Point `person`'s `slot` at `target`, or clear it with `None`.
    ///
    /// The previous occupant loses its reciprocal link first. A target that
    /// does not resolve is treated as `None`. Assigning a partner also
    /// releases the target's previous partner and synchronizes marriage
    /// dates for the new pair.
    ///
    /// Returns `Ok(false)` if `person` does not exist.
    pub fn set_singular(
        &mut self,
        person: &PersonId,
        slot: SingularSlot,
        target: Option<&PersonId>,
    ) -> Result<bool, GraphError> {
        if target == Some(person) {
            return Err(GraphError::SelfReference {
                person: person.clone(),
                slot: slot.into(),
            });
        }
        let Some(current) = self.store.get(person) else {
            tracing::debug!(person = %person, %slot, "set ignored: unknown person");
            return Ok(false);
        };

        let new_target = match target {
            Some(id) if self.store.contains(id) => Some(id.clone()),
            Some(id) => {
                tracing::debug!(person = %person, %slot, target = %id, "unresolved target treated as clear");
                None
            }
            None => None,
        };
        let old_target = current.relationships.singular(slot).cloned();

        if let Some(old) = old_target.as_ref().filter(|old| Some(*old) != new_target.as_ref()) {
            self.release_reciprocal(person, slot, old);
        }

        if let Some(record) = self.store.get_mut(person) {
            record.relationships.replace_singular(slot, new_target.clone());
        }

        if let Some(new) = new_target.as_ref() {
            self.link_reciprocal(person, slot, new);
        }

        tracing::debug!(
            person = %person,
            %slot,
            target = new_target.as_ref().map_or("", PersonId::as_str),
            "singular slot set"
        );
        Ok(true)
    }

    /// Clear `person`'s `slot` and the reciprocal link on its occupant.
    pub fn clear_singular(
        &mut self,
        person: &PersonId,
        slot: SingularSlot,
    ) -> Result<bool, GraphError> {
        self.set_singular(person, slot, None)
    }

    /// Undo the reciprocal of `person.slot = old`.
    fn release_reciprocal(&mut self, person: &PersonId, slot: SingularSlot, old: &PersonId) {
        let Some(old_record) = self.store.get_mut(old) else {
            return;
        };
        match slot {
            SingularSlot::Partner => {
                if old_record.relationships.partner.as_ref() == Some(person) {
                    old_record.relationships.partner = None;
                }
            }
            SingularSlot::Father | SingularSlot::Mother => {
                old_record.relationships.remove(SetSlot::Children, person);
            }
        }
    }

    /// Establish the reciprocal of `person.slot = target`.
    fn link_reciprocal(&mut self, person: &PersonId, slot: SingularSlot, target: &PersonId) {
        match slot {
            SingularSlot::Partner => {
                let displaced = self
                    .store
                    .get(target)
                    .and_then(|record| record.relationships.partner.clone())
                    .filter(|previous| previous != person);
                if let Some(previous) = displaced {
                    self.release_reciprocal(target, SingularSlot::Partner, &previous);
                    tracing::debug!(person = %target, released = %previous, "previous partner released");
                }
                if let Some(record) = self.store.get_mut(target) {
                    record.relationships.partner = Some(person.clone());
                }
                self.synchronize_marriage_dates(person, target);
            }
            SingularSlot::Father | SingularSlot::Mother => {
                if let Some(record) = self.store.get_mut(target) {
                    record.relationships.insert(SetSlot::Children, person.clone());
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Set slots
    // -----------------------------------------------------------------------

    /// Add `target` to `person`'s `slot`.
    ///
    /// For `siblings` the target gains `person` as a sibling. For `children`
    /// the child's `father` (male acting person) or `mother` (female) is set
    /// to `person`, replacing any previous parent in that slot. An
    /// unspecified gender records no parent on the child.
    ///
    /// Returns `Ok(false)` if either person is unknown or the edge already
    /// exists.
    pub fn add_to_set(
        &mut self,
        person: &PersonId,
        slot: SetSlot,
        target: &PersonId,
    ) -> Result<bool, GraphError> {
        if target == person {
            return Err(GraphError::SelfReference {
                person: person.clone(),
                slot: slot.into(),
            });
        }
        if !self.store.contains(target) {
            tracing::debug!(person = %person, %slot, target = %target, "add ignored: unknown target");
            return Ok(false);
        }
        let Some(record) = self.store.get_mut(person) else {
            tracing::debug!(person = %person, %slot, "add ignored: unknown person");
            return Ok(false);
        };
        if !record.relationships.insert(slot, target.clone()) {
            return Ok(false);
        }
        let gender = record.gender;

        match slot {
            SetSlot::Siblings => {
                if let Some(sibling) = self.store.get_mut(target) {
                    sibling.relationships.insert(SetSlot::Siblings, person.clone());
                }
            }
            SetSlot::Children => {
                if let Some(parent_slot) = parent_slot_for(gender) {
                    self.set_singular(target, parent_slot, Some(person))?;
                }
            }
        }

        tracing::debug!(person = %person, %slot, target = %target, "set member added");
        Ok(true)
    }

    /// Remove `target` from `person`'s `slot`.
    ///
    /// For `siblings` the target loses `person` as a sibling. For `children`
    /// the child's `father` or `mother` is chosen by the acting person's
    /// current gender and cleared only if it names `person`. This differs
    /// from an unconditional clear on purpose: a slot that already names
    /// another parent keeps that parent, whose `children` still lists the
    /// child. With an unspecified gender the child's parent slots are left
    /// untouched.
    ///
    /// Returns `true` if any record changed.
    pub fn remove_from_set(&mut self, person: &PersonId, slot: SetSlot, target: &PersonId) -> bool {
        let Some(record) = self.store.get_mut(person) else {
            tracing::debug!(person = %person, %slot, "remove ignored: unknown person");
            return false;
        };
        let mut changed = record.relationships.remove(slot, target);
        let gender = record.gender;

        if let Some(other) = self.store.get_mut(target) {
            match slot {
                SetSlot::Siblings => {
                    changed |= other.relationships.remove(SetSlot::Siblings, person);
                }
                SetSlot::Children => {
                    if let Some(parent_slot) = parent_slot_for(gender)
                        && other.relationships.singular(parent_slot) == Some(person)
                    {
                        other.relationships.replace_singular(parent_slot, None);
                        changed = true;
                    }
                }
            }
        }

        if changed {
            tracing::debug!(person = %person, %slot, target = %target, "set member removed");
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Slot-agnostic entry points
    // -----------------------------------------------------------------------

    /// Set a singular slot or add to a set slot, whichever `slot` names.
    pub fn link(
        &mut self,
        person: &PersonId,
        slot: RelationSlot,
        target: &PersonId,
    ) -> Result<bool, GraphError> {
        match slot {
            RelationSlot::Singular(slot) => self.set_singular(person, slot, Some(target)),
            RelationSlot::Set(slot) => self.add_to_set(person, slot, target),
        }
    }

    /// Clear a singular slot, or remove `target` from a set slot.
    ///
    /// For singular slots `target` is optional; when given, the slot is
    /// cleared only if it currently holds that identifier. Set slots require
    /// a target and are left alone without one.
    pub fn unlink(
        &mut self,
        person: &PersonId,
        slot: RelationSlot,
        target: Option<&PersonId>,
    ) -> Result<bool, GraphError> {
        match slot {
            RelationSlot::Singular(slot) => {
                let holds = self
                    .store
                    .get(person)
                    .and_then(|record| record.relationships.singular(slot));
                if holds.is_none() || target.is_some_and(|t| holds != Some(t)) {
                    return Ok(false);
                }
                self.clear_singular(person, slot)
            }
            RelationSlot::Set(slot) => {
                Ok(target.is_some_and(|target| self.remove_from_set(person, slot, target)))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Marriage dates
    // -----------------------------------------------------------------------

    /// If exactly one of the pair has a marriage date, copy it to the other.
    ///
    /// Two different non-empty dates are left as they are. Returns `true` if
    /// a date was copied.
    pub fn synchronize_marriage_dates(&mut self, a: &PersonId, b: &PersonId) -> bool {
        let (Some(first), Some(second)) = (self.store.get(a), self.store.get(b)) else {
            return false;
        };
        let (receiver, date) = match (first.marriage_date.is_empty(), second.marriage_date.is_empty()) {
            (false, true) => (b, first.marriage_date.clone()),
            (true, false) => (a, second.marriage_date.clone()),
            _ => return false,
        };
        let Some(record) = self.store.get_mut(receiver) else {
            return false;
        };
        tracing::debug!(person = %receiver, date = %date, "marriage date copied from partner");
        record.marriage_date = date;
        true
    }

    /// Synchronize marriage dates for every resolvable partner pair.
    ///
    /// Returns the number of records that received a date.
    pub fn sync_all_marriage_dates(&mut self) -> usize {
        let pairs: Vec<(PersonId, PersonId)> = self
            .store
            .all()
            .filter_map(|person| {
                person
                    .relationships
                    .partner
                    .as_ref()
                    .filter(|partner| self.store.contains(partner))
                    .map(|partner| (person.id.clone(), partner.clone()))
            })
            .collect();

        let copied = pairs
            .iter()
            .filter(|(a, b)| self.synchronize_marriage_dates(a, b))
            .count();
        if copied > 0 {
            tracing::info!(copied, "marriage dates synchronized");
        }
        copied
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Remove `person` from the store after clearing every reference to it
    /// held by anyone else.
    pub fn cascade_delete(&mut self, person: &PersonId) -> Option<Person> {
        let mut pruned: usize = 0;
        for record in self.store.all_mut() {
            if record.id != *person && record.relationships.prune(person) {
                pruned = pruned.saturating_add(1);
            }
        }
        let removed = self.store.delete(person);
        if removed.is_some() {
            tracing::debug!(person = %person, pruned, "person deleted");
        }
        removed
    }
}

/// The child-side slot implied by a parent's gender.
const fn parent_slot_for(gender: Gender) -> Option<SingularSlot> {
    match gender {
        Gender::Male => Some(SingularSlot::Father),
        Gender::Female => Some(SingularSlot::Mother),
        Gender::Unspecified => None,
    }
}
