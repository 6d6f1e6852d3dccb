//! Who may be chosen for a relationship slot.

use kindred_types::{Gender, Person, PersonId, RelationSlot, SingularSlot};

use crate::projector::sorted_roster;
use crate::store::PersonStore;

/// People selectable for `person`'s `slot`, in roster order.
///
/// Fathers must be recorded as male and mothers as female. Any other person
/// may be a partner. Siblings and children exclude people already in the
/// set. The person themselves is never a candidate. An unknown `person`
/// yields no candidates.
pub fn relationship_candidates<'s>(
    store: &'s PersonStore,
    person: &PersonId,
    slot: RelationSlot,
) -> Vec<&'s Person> {
    let Some(subject) = store.get(person) else {
        return Vec::new();
    };
    sorted_roster(store)
        .into_iter()
        .filter(|other| other.id != *person)
        .filter(|other| match slot {
            RelationSlot::Singular(SingularSlot::Father) => other.gender == Gender::Male,
            RelationSlot::Singular(SingularSlot::Mother) => other.gender == Gender::Female,
            RelationSlot::Singular(SingularSlot::Partner) => true,
            RelationSlot::Set(set) => !subject.relationships.contains(set, &other.id),
        })
        .collect()
}
