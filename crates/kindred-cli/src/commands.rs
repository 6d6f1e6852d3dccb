//! Command execution against a loaded family tree.
//!
//! A [`Session`] owns the tree and the gateway it was loaded from. Every
//! command that changes the tree saves it before returning, so a failed
//! save surfaces as the command's error.

use std::path::{Path, PathBuf};

use chrono::Utc;

use kindred_graph::{DatePolicy, FamilyTree, PersonCard, full_name_with_dates};
use kindred_persist::{
    BlobStore, FileBlobStore, PersistenceGateway, deserialize, export, export_file_name,
};
use kindred_types::{NewPerson, PersonId, PersonUpdate, RelationSlot};

use crate::cli::Command;
use crate::error::CliError;

/// What a command produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A person was created.
    Added(PersonCard),
    /// One person's card.
    Card(PersonCard),
    /// Cards in roster order.
    Cards(Vec<PersonCard>),
    /// People selectable for a slot, with their dated names.
    Candidates(Vec<(PersonId, String)>),
    /// A one-line status message.
    Message(String),
}

/// A family tree bound to the store it is saved to.
#[derive(Debug)]
pub struct Session<B> {
    tree: FamilyTree,
    gateway: PersistenceGateway<B>,
    export_dir: PathBuf,
}

impl<B: BlobStore> Session<B> {
    /// Load the tree from `blob`. If opening changed any marriage dates,
    /// the repaired tree is saved straight away.
    pub fn open(
        blob: B,
        date_policy: DatePolicy,
        export_dir: impl Into<PathBuf>,
    ) -> Result<Self, CliError> {
        let gateway = PersistenceGateway::new(blob);
        let store = gateway.load_store()?;
        let tree = FamilyTree::open(store, date_policy);
        let mut session = Self {
            tree,
            gateway,
            export_dir: export_dir.into(),
        };
        if session.tree.synced_on_open() > 0 {
            tracing::info!(
                synced = session.tree.synced_on_open(),
                "marriage dates synchronized on load"
            );
            session.save()?;
        }
        Ok(session)
    }

    /// The loaded tree.
    pub const fn tree(&self) -> &FamilyTree {
        &self.tree
    }

    /// The gateway the tree is saved through.
    pub const fn gateway(&self) -> &PersistenceGateway<B> {
        &self.gateway
    }

    fn save(&mut self) -> Result<(), CliError> {
        self.gateway.save_store(self.tree.store())?;
        Ok(())
    }

    /// Run one command.
    pub fn run(&mut self, command: Command) -> Result<Outcome, CliError> {
        match command {
            Command::Add(args) => self.add(args.into()),
            Command::Edit(args) => {
                let (id, update) = args.into_update();
                self.edit(&id, update)
            }
            Command::Delete { id } => self.delete(&id),
            Command::Show { id } => Ok(Outcome::Card(self.tree.card(&id)?)),
            Command::List => Ok(Outcome::Cards(self.tree.roster())),
            Command::Link { id, slot, target } => self.link(&id, slot, &target),
            Command::Unlink { id, slot, target } => self.unlink(&id, slot, target.as_ref()),
            Command::Candidates { id, slot } => self.candidates(&id, slot),
            Command::Export { out } => {
                let dir = out.unwrap_or_else(|| self.export_dir.clone());
                self.export_to(&dir)
            }
            Command::Import { file } => self.import_from(&file),
        }
    }

    // -----------------------------------------------------------------------
    // People
    // -----------------------------------------------------------------------

    fn add(&mut self, fields: NewPerson) -> Result<Outcome, CliError> {
        let id = self.tree.create_person(fields)?.id.clone();
        tracing::info!(person = %id, "person added");
        let card = self.tree.card(&id)?;
        self.save()?;
        Ok(Outcome::Added(card))
    }

    fn edit(&mut self, id: &PersonId, update: PersonUpdate) -> Result<Outcome, CliError> {
        if update.is_empty() {
            self.tree.person(id)?;
            return Ok(Outcome::Message(String::from("Nothing to change.")));
        }
        self.tree.update_person(id, update)?;
        tracing::info!(person = %id, "person updated");
        self.save()?;
        Ok(Outcome::Card(self.tree.card(id)?))
    }

    fn delete(&mut self, id: &PersonId) -> Result<Outcome, CliError> {
        let removed = self.tree.delete_person(id)?;
        tracing::info!(person = %id, "person deleted");
        self.save()?;
        Ok(Outcome::Message(format!(
            "Deleted {}.",
            full_name_with_dates(&removed)
        )))
    }

    // -----------------------------------------------------------------------
    // Relationships
    // -----------------------------------------------------------------------

    fn link(
        &mut self,
        id: &PersonId,
        slot: RelationSlot,
        target: &PersonId,
    ) -> Result<Outcome, CliError> {
        if !self.tree.link(id, slot, target)? {
            return Ok(Outcome::Message(String::from("Already linked.")));
        }
        tracing::info!(person = %id, %slot, target = %target, "relationship linked");
        self.save()?;
        Ok(Outcome::Card(self.tree.card(id)?))
    }

    fn unlink(
        &mut self,
        id: &PersonId,
        slot: RelationSlot,
        target: Option<&PersonId>,
    ) -> Result<Outcome, CliError> {
        if !self.tree.unlink(id, slot, target)? {
            return Ok(Outcome::Message(String::from("Nothing to unlink.")));
        }
        tracing::info!(person = %id, %slot, "relationship unlinked");
        self.save()?;
        Ok(Outcome::Card(self.tree.card(id)?))
    }

    fn candidates(&self, id: &PersonId, slot: RelationSlot) -> Result<Outcome, CliError> {
        let listed = self
            .tree
            .candidates(id, slot)?
            .into_iter()
            .map(|person| (person.id.clone(), full_name_with_dates(person)))
            .collect();
        Ok(Outcome::Candidates(listed))
    }

    // -----------------------------------------------------------------------
    // Export / import
    // -----------------------------------------------------------------------

    fn export_to(&self, dir: &Path) -> Result<Outcome, CliError> {
        let path = dir.join(export_file_name(Utc::now().date_naive()));
        let bytes = export(self.tree.store())?;
        FileBlobStore::new(&path).save(&bytes)?;
        Ok(Outcome::Message(format!(
            "Exported {} people to {}.",
            self.tree.store().len(),
            path.display()
        )))
    }

    fn import_from(&mut self, file: &Path) -> Result<Outcome, CliError> {
        let Some(bytes) = FileBlobStore::new(file).load()? else {
            return Err(CliError::MissingFile {
                path: file.to_path_buf(),
            });
        };
        let store = deserialize(&bytes)?;
        let count = store.len();
        let previous = self.tree.replace_store(store);
        tracing::info!(
            persons = count,
            replaced = previous.len(),
            file = %file.display(),
            "family tree imported"
        );
        self.save()?;
        Ok(Outcome::Message(format!("Imported {count} people.")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::unreachable)]
mod tests {
    use super::*;
    use crate::cli::{AddArgs, EditArgs};
    use kindred_graph::PersonStore;
    use kindred_persist::MemoryBlobStore;
    use kindred_types::{Gender, SetSlot, SingularSlot};

    fn session() -> Session<MemoryBlobStore> {
        Session::open(MemoryBlobStore::new(), DatePolicy::Lenient, ".").unwrap()
    }

    fn add(session: &mut Session<MemoryBlobStore>, first: &str, gender: Gender) -> PersonId {
        let outcome = session
            .run(Command::Add(AddArgs {
                surname: String::from("Smith"),
                first_names: first.to_owned(),
                born: String::new(),
                died: String::new(),
                married: String::new(),
                gender: Some(gender),
            }))
            .unwrap();
        let Outcome::Added(card) = outcome else {
            unreachable!("add returns the new card");
        };
        card.id
    }

    fn saved(session: &Session<MemoryBlobStore>) -> PersonStore {
        deserialize(session.gateway().blob().bytes().unwrap()).unwrap()
    }

    #[test]
    fn mutations_are_saved() {
        let mut session = session();
        assert!(session.gateway().blob().bytes().is_none());

        let dad = add(&mut session, "John", Gender::Male);
        let kid = add(&mut session, "Tim", Gender::Unspecified);
        session
            .run(Command::Link {
                id: dad.clone(),
                slot: SetSlot::Children.into(),
                target: kid.clone(),
            })
            .unwrap();

        let stored = saved(&session);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.get(&kid).unwrap().relationships.father, Some(dad));
    }

    #[test]
    fn reads_do_not_save() {
        let mut session = session();
        session.run(Command::List).unwrap();
        assert!(session.gateway().blob().bytes().is_none());
    }

    #[test]
    fn empty_edit_changes_nothing() {
        let mut session = session();
        let id = add(&mut session, "Ann", Gender::Female);
        let before = session.gateway().blob().bytes().map(<[u8]>::to_vec);

        let outcome = session
            .run(Command::Edit(EditArgs {
                id,
                surname: None,
                first_names: None,
                born: None,
                died: None,
                married: None,
                gender: None,
            }))
            .unwrap();

        assert_eq!(outcome, Outcome::Message(String::from("Nothing to change.")));
        assert_eq!(session.gateway().blob().bytes().map(<[u8]>::to_vec), before);
    }

    #[test]
    fn unknown_person_is_an_error() {
        let mut session = session();
        let result = session.run(Command::Show {
            id: PersonId::from("ghost"),
        });
        assert!(matches!(result, Err(CliError::Graph { .. })));
    }

    #[test]
    fn repeated_link_reports_no_change() {
        let mut session = session();
        let a = add(&mut session, "A", Gender::Male);
        let b = add(&mut session, "B", Gender::Female);
        let link = || Command::Link {
            id: a.clone(),
            slot: SingularSlot::Partner.into(),
            target: b.clone(),
        };
        assert!(matches!(session.run(link()).unwrap(), Outcome::Card(_)));
        assert_eq!(
            session.run(link()).unwrap(),
            Outcome::Message(String::from("Already linked."))
        );
    }

    #[test]
    fn open_saves_when_marriage_dates_were_synced() {
        let mut store = PersonStore::new();
        store.create(NewPerson::named("A", "X").with_marriage_date("1970"));
        store.create(NewPerson::named("B", "X"));
        let mut persons: Vec<_> = store.into_persons().collect();
        let (a, b) = (persons[0].id.clone(), persons[1].id.clone());
        persons[0].relationships.partner = Some(b);
        persons[1].relationships.partner = Some(a);
        let store = PersonStore::from_persons(persons);
        let blob = MemoryBlobStore::with_bytes(kindred_persist::serialize(&store).unwrap());

        let session = Session::open(blob, DatePolicy::Lenient, ".").unwrap();

        assert!(saved(&session).all().all(|person| person.marriage_date == "1970"));
    }

    #[test]
    fn export_then_import_replaces_tree() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = session();
        add(&mut source, "Ann", Gender::Female);
        add(&mut source, "Bob", Gender::Male);
        source
            .run(Command::Export {
                out: Some(dir.path().to_path_buf()),
            })
            .unwrap();
        let file = dir
            .path()
            .join(export_file_name(Utc::now().date_naive()));
        assert!(file.exists());

        let mut target = session();
        add(&mut target, "Zed", Gender::Male);
        let outcome = target.run(Command::Import { file }).unwrap();

        assert_eq!(outcome, Outcome::Message(String::from("Imported 2 people.")));
        assert_eq!(target.tree().store(), source.tree().store());
        assert_eq!(saved(&target), *source.tree().store());
    }

    #[test]
    fn import_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        let result = session.run(Command::Import {
            file: dir.path().join("absent.json"),
        });
        assert!(matches!(result, Err(CliError::MissingFile { .. })));
    }

    #[test]
    fn rejected_import_keeps_current_tree() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"{"people": []}"#).unwrap();

        let mut session = session();
        add(&mut session, "Ann", Gender::Female);
        let tree_before = session.tree().store().clone();
        let saved_before = session.gateway().blob().bytes().map(<[u8]>::to_vec);
        let result = session.run(Command::Import { file });

        assert!(matches!(result, Err(CliError::Persist { .. })));
        assert_eq!(session.tree().store(), &tree_before);
        assert_eq!(session.gateway().blob().bytes().map(<[u8]>::to_vec), saved_before);
    }
}
