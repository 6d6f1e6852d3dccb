//! Read-only views derived from the store.
//!
//! Nothing here mutates. Dangling identifiers are skipped silently, so a
//! reference to a deleted person never shows up in output.

use core::cmp::Ordering;

use feruca::{Collator, Locale, Tailoring};

use kindred_types::{Gender, Person, PersonId};

use crate::date::display_form;
use crate::store::PersonStore;

/// `first_names surname`, trimmed.
pub fn full_name(person: &Person) -> String {
    format!("{} {}", person.first_names, person.surname)
        .trim()
        .to_owned()
}

/// [`full_name`] with a lifespan annotation: `(b. D)`, `(d. D)`, or
/// `(B - D)`, using display-form dates. No annotation when both are empty.
pub fn full_name_with_dates(person: &Person) -> String {
    let name = full_name(person);
    match (person.date_of_birth.is_empty(), person.date_of_death.is_empty()) {
        (false, false) => format!(
            "{name} ({} - {})",
            display_form(&person.date_of_birth),
            display_form(&person.date_of_death)
        ),
        (false, true) => format!("{name} (b. {})", display_form(&person.date_of_birth)),
        (true, false) => format!("{name} (d. {})", display_form(&person.date_of_death)),
        (true, true) => name,
    }
}

/// Human-readable relationship lines in fixed order: father, mother,
/// partner (with the person's marriage date, if any), siblings, children.
pub fn relationship_summary(person: &Person, store: &PersonStore) -> Vec<String> {
    let rel = &person.relationships;
    let resolve = |id: Option<&PersonId>| id.and_then(|id| store.get(id));
    let mut lines = Vec::new();

    if let Some(father) = resolve(rel.father.as_ref()) {
        lines.push(format!("Father: {}", full_name_with_dates(father)));
    }
    if let Some(mother) = resolve(rel.mother.as_ref()) {
        lines.push(format!("Mother: {}", full_name_with_dates(mother)));
    }
    if let Some(partner) = resolve(rel.partner.as_ref()) {
        let mut line = format!("Partner: {}", full_name_with_dates(partner));
        if !person.marriage_date.is_empty() {
            line.push_str(&format!(" (m. {})", display_form(&person.marriage_date)));
        }
        lines.push(line);
    }
    if let Some(line) = joined_line("Siblings", &rel.siblings, store) {
        lines.push(line);
    }
    if let Some(line) = joined_line("Children", &rel.children, store) {
        lines.push(line);
    }
    lines
}

fn joined_line(label: &str, ids: &[PersonId], store: &PersonStore) -> Option<String> {
    let names: Vec<String> = ids
        .iter()
        .filter_map(|id| store.get(id))
        .map(full_name_with_dates)
        .collect();
    (!names.is_empty()).then(|| format!("{label}: {}", names.join(", ")))
}

/// Every person, sorted by surname then given names.
///
/// Names are collated with [`NameCollator`]. The sort is stable, so exact
/// ties keep store order.
pub fn sorted_roster(store: &PersonStore) -> Vec<&Person> {
    let mut collator = NameCollator::new();
    let mut roster: Vec<&Person> = store.all().collect();
    roster.sort_by(|a, b| {
        collator
            .compare(&a.surname, &b.surname)
            .then_with(|| collator.compare(&a.first_names, &b.first_names))
    });
    roster
}

/// Compare two names in CLDR root collation order. See [`NameCollator`].
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NameCollator::new().compare(a, b)
}

/// Locale-aware name comparison.
///
/// Uses the Unicode Collation Algorithm with the CLDR root table, so
/// accented letters sort with their base letter (`Écrivain` between
/// `Eagle` and `Zimmer`) and lowercase precedes uppercase when names differ
/// only in case. Strings with identical collation keys fall back to
/// lowercase-first, then code point order.
#[derive(Debug, Clone)]
pub struct NameCollator {
    collator: Collator,
}

impl NameCollator {
    /// A collator for the CLDR root locale.
    pub fn new() -> Self {
        Self {
            collator: Collator::new(Tailoring::Cldr(Locale::Root), true, false),
        }
    }

    /// Compare `a` with `b`.
    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        self.collator
            .collate(a, b)
            .then_with(|| {
                a.chars()
                    .map(char::is_uppercase)
                    .cmp(b.chars().map(char::is_uppercase))
            })
            .then_with(|| a.cmp(b))
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Person card
// ---------------------------------------------------------------------------

/// Everything needed to render one person in a roster or detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCard {
    /// The person's identifier.
    pub id: PersonId,
    /// Full name without dates.
    pub name: String,
    /// Recorded gender.
    pub gender: Gender,
    /// `Born: ...`, `Died: ...`, `Married: ...` lines for non-empty dates.
    pub details: Vec<String>,
    /// The [`relationship_summary`] lines.
    pub relationships: Vec<String>,
}

/// Build the card for `person`.
pub fn person_card(person: &Person, store: &PersonStore) -> PersonCard {
    let details = [
        ("Born", &person.date_of_birth),
        ("Died", &person.date_of_death),
        ("Married", &person.marriage_date),
    ]
    .into_iter()
    .filter(|(_, date)| !date.is_empty())
    .map(|(label, date)| format!("{label}: {}", display_form(date)))
    .collect();

    PersonCard {
        id: person.id.clone(),
        name: full_name(person),
        gender: person.gender,
        details,
        relationships: relationship_summary(person, store),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::RelationshipEngine;
    use kindred_types::{NewPerson, SetSlot, SingularSlot};

    #[test]
    fn names_and_lifespans() {
        let mut store = PersonStore::new();
        let both = store.create(NewPerson::named("Ada", "Lovelace").with_birth("1815-12-10").with_death("1852-11-27")).clone();
        let born = store.create(NewPerson::named("Kid", "").with_birth("2001")).clone();
        let died = store.create(NewPerson::named("", "Old").with_death("1900-02")).clone();
        let none = store.create(NewPerson::named("  ", "")).clone();

        assert_eq!(full_name_with_dates(&both), "Ada Lovelace (10 Dec 1815 - 27 Nov 1852)");
        assert_eq!(full_name_with_dates(&born), "Kid (b. 2001)");
        assert_eq!(full_name_with_dates(&died), "Old (d. Feb 1900)");
        assert_eq!(full_name(&none), "");
    }

    #[test]
    fn summary_order_and_marriage_annotation() {
        let mut store = PersonStore::new();
        let me = store.create(NewPerson::named("Me", "X").with_marriage_date("2010-06-01")).id.clone();
        let dad = store.create(NewPerson::named("Dad", "X")).id.clone();
        let mum = store.create(NewPerson::named("Mum", "Y")).id.clone();
        let wife = store.create(NewPerson::named("Wife", "Z")).id.clone();
        let sis = store.create(NewPerson::named("Sis", "X")).id.clone();
        let bro = store.create(NewPerson::named("Bro", "X")).id.clone();
        let mut engine = RelationshipEngine::new(&mut store);
        engine.set_singular(&me, SingularSlot::Father, Some(&dad)).unwrap();
        engine.set_singular(&me, SingularSlot::Mother, Some(&mum)).unwrap();
        engine.set_singular(&me, SingularSlot::Partner, Some(&wife)).unwrap();
        engine.add_to_set(&me, SetSlot::Siblings, &sis).unwrap();
        engine.add_to_set(&me, SetSlot::Siblings, &bro).unwrap();

        let person = store.get(&me).unwrap();
        assert_eq!(
            relationship_summary(person, &store),
            vec![
                "Father: Dad X",
                "Mother: Mum Y",
                "Partner: Wife Z (m. 1 Jun 2010)",
                "Siblings: Sis X, Bro X",
            ]
        );
    }

    #[test]
    fn dangling_references_are_skipped() {
        let mut store = PersonStore::new();
        let me = store.create(NewPerson::named("Me", "X")).id.clone();
        let mut person = store.get(&me).unwrap().clone();
        person.relationships.father = Some(PersonId::from("gone"));
        person.relationships.children = vec![PersonId::from("gone-too")];

        assert!(relationship_summary(&person, &store).is_empty());
    }

    #[test]
    fn roster_sorts_by_surname_then_first_names() {
        // Surnames differing only in case are already ordered, so given
        // names are not consulted for them.
        let mut store = PersonStore::new();
        store.create(NewPerson::named("Zoe", "brown"));
        store.create(NewPerson::named("Adam", "Smith"));
        store.create(NewPerson::named("Amy", "Brown"));
        store.create(NewPerson::named("Bea", "Adams"));

        let names: Vec<String> = sorted_roster(&store).into_iter().map(full_name).collect();
        assert_eq!(names, vec!["Bea Adams", "Zoe brown", "Amy Brown", "Adam Smith"]);
    }

    #[test]
    fn lowercase_sorts_before_uppercase_on_ties() {
        assert_eq!(compare_names("smith", "Smith"), Ordering::Less);
        assert_eq!(compare_names("Smith", "smith"), Ordering::Greater);
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Smith", "Smith"), Ordering::Equal);
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        assert_eq!(compare_names("Écrivain", "Eagle"), Ordering::Greater);
        assert_eq!(compare_names("Écrivain", "Zimmer"), Ordering::Less);
        assert_eq!(compare_names("Ångström", "Andersen"), Ordering::Greater);
        assert_eq!(compare_names("Ångström", "Avery"), Ordering::Less);
    }

    #[test]
    fn roster_collates_accented_surnames() {
        let mut store = PersonStore::new();
        store.create(NewPerson::named("Zed", "Zimmer"));
        store.create(NewPerson::named("Emile", "Écrivain"));
        store.create(NewPerson::named("Adam", "Eagle"));
        store.create(NewPerson::named("Anders", "Ångström"));
        store.create(NewPerson::named("Ann", "Avery"));
        store.create(NewPerson::named("Hans", "Andersen"));

        let names: Vec<String> = sorted_roster(&store).into_iter().map(full_name).collect();
        assert_eq!(
            names,
            vec![
                "Hans Andersen",
                "Anders Ångström",
                "Ann Avery",
                "Adam Eagle",
                "Emile Écrivain",
                "Zed Zimmer",
            ]
        );
    }

    #[test]
    fn card_lists_only_present_dates() {
        let mut store = PersonStore::new();
        let id = store
            .create(NewPerson::named("Ada", "Lovelace").with_birth("1815").with_marriage_date("1835-07-08"))
            .id
            .clone();
        let card = person_card(store.get(&id).unwrap(), &store);

        assert_eq!(card.name, "Ada Lovelace");
        assert_eq!(card.details, vec!["Born: 1815", "Married: 8 Jul 1835"]);
        assert!(card.relationships.is_empty());
    }
}
