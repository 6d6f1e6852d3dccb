//! Round-trip and import behavior of the persistence gateway.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use kindred_graph::{DatePolicy, FamilyTree, PersonStore};
use kindred_persist::{FileBlobStore, PersistenceGateway, deserialize, export, serialize};
use kindred_types::{Gender, NewPerson, PersonId, SetSlot, SingularSlot};

fn sample_tree() -> FamilyTree {
    let mut tree = FamilyTree::new(DatePolicy::Lenient);
    let dad = tree
        .create_person(
            NewPerson::named("John", "Smith")
                .with_gender(Gender::Male)
                .with_birth("1950-2-1")
                .with_marriage_date("1975"),
        )
        .unwrap()
        .id
        .clone();
    let mum = tree
        .create_person(NewPerson::named("Mary", "Jones").with_gender(Gender::Female))
        .unwrap()
        .id
        .clone();
    let kid = tree
        .create_person(NewPerson::named("Sam", "Smith").with_death("about 2020"))
        .unwrap()
        .id
        .clone();
    let sib = tree.create_person(NewPerson::named("Alex", "Smith")).unwrap().id.clone();

    tree.link(&dad, SingularSlot::Partner.into(), &mum).unwrap();
    tree.link(&dad, SetSlot::Children.into(), &kid).unwrap();
    tree.link(&mum, SetSlot::Children.into(), &kid).unwrap();
    tree.link(&kid, SetSlot::Siblings.into(), &sib).unwrap();
    tree
}

#[test]
fn storage_round_trip_preserves_every_field() {
    let tree = sample_tree();
    let bytes = serialize(tree.store()).unwrap();
    let restored = deserialize(&bytes).unwrap();
    assert_eq!(&restored, tree.store());
}

#[test]
fn export_can_be_imported() {
    let tree = sample_tree();
    let bytes = export(tree.store()).unwrap();
    let restored = deserialize(&bytes).unwrap();
    assert_eq!(&restored, tree.store());
}

#[test]
fn file_gateway_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family_tree.json");
    let tree = sample_tree();

    let mut gateway = PersistenceGateway::new(FileBlobStore::new(&path));
    gateway.save_store(tree.store()).unwrap();

    let reopened = PersistenceGateway::new(FileBlobStore::new(&path));
    let store = reopened.load_store().unwrap();
    assert_eq!(&store, tree.store());
}

#[test]
fn legacy_partial_records_are_completed() {
    let legacy = br#"{
        "persons": [
            ["person_1700000000000_abc123def", {
                "id": "person_1700000000000_abc123def",
                "surname": "Smith",
                "firstNames": "John",
                "gender": "Male",
                "relationships": {"partner": "person_1700000000001_xyz", "siblings": [], "children": []}
            }],
            ["person_1700000000001_xyz", {
                "surname": "Jones",
                "gender": "Female",
                "marriageDate": "1975",
                "relationships": {"partner": "person_1700000000000_abc123def"}
            }]
        ],
        "lastUpdated": "2023-11-14T22:13:20.000Z"
    }"#;

    let store = deserialize(legacy).unwrap();
    let john = store.get(&PersonId::from("person_1700000000000_abc123def")).unwrap();
    assert_eq!(john.first_names, "John");
    assert_eq!(john.date_of_birth, "");
    assert_eq!(john.marriage_date, "");

    // Opening the tree copies the partner's marriage date across.
    let tree = FamilyTree::open(store, DatePolicy::Lenient);
    assert_eq!(tree.synced_on_open(), 1);
    assert_eq!(
        tree.person(&PersonId::from("person_1700000000000_abc123def"))
            .unwrap()
            .marriage_date,
        "1975"
    );
}

#[test]
fn empty_store_round_trips() {
    let store = PersonStore::new();
    assert!(deserialize(&serialize(&store).unwrap()).unwrap().is_empty());
}
