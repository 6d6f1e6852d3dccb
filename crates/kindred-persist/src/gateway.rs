//! Encoding the person store to bytes and back.
//!
//! The same decoder serves local storage and imported files: it checks the
//! document shape before building anything, so a rejected payload never
//! touches the caller's store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use kindred_graph::PersonStore;
use kindred_types::{Person, PersonId};

use crate::blob::BlobStore;
use crate::document::{EXPORT_VERSION, ExportDocument, PersonRecord, StorageDocument};
use crate::error::PersistError;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn pairs(store: &PersonStore) -> Vec<(&PersonId, &Person)> {
    store.all().map(|person| (&person.id, person)).collect()
}

/// Encode the store as a storage document stamped with the current time.
pub fn serialize(store: &PersonStore) -> Result<Vec<u8>, PersistError> {
    serialize_at(store, Utc::now())
}

/// Encode the store as a storage document stamped with `at`.
pub fn serialize_at(store: &PersonStore, at: DateTime<Utc>) -> Result<Vec<u8>, PersistError> {
    let document = StorageDocument {
        persons: pairs(store),
        last_updated: at,
    };
    Ok(serde_json::to_vec(&document)?)
}

/// Encode the store as a pretty-printed export document.
pub fn export(store: &PersonStore) -> Result<Vec<u8>, PersistError> {
    export_at(store, Utc::now())
}

/// Encode the store as a pretty-printed export document stamped with `at`.
pub fn export_at(store: &PersonStore, at: DateTime<Utc>) -> Result<Vec<u8>, PersistError> {
    let document = ExportDocument {
        persons: pairs(store),
        export_date: at,
        version: EXPORT_VERSION,
    };
    let bytes = serde_json::to_vec_pretty(&document)?;
    tracing::info!(persons = store.len(), "store exported");
    Ok(bytes)
}

/// `family_tree_YYYY-MM-DD.json` for the given date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("family_tree_{}.json", date.format("%Y-%m-%d"))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a storage or export document.
///
/// Fails with [`PersistError::Format`] unless the document has a `persons`
/// sequence of `[identifier, record]` pairs. Extra fields, including
/// `version`, are ignored. Partial records take creation defaults.
pub fn deserialize(bytes: &[u8]) -> Result<PersonStore, PersistError> {
    deserialize_at(bytes, Utc::now())
}

/// Like [`deserialize`], with `now` standing in for missing timestamps.
pub fn deserialize_at(bytes: &[u8], now: DateTime<Utc>) -> Result<PersonStore, PersistError> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;
    let entries = document
        .get("persons")
        .ok_or_else(|| PersistError::format("missing `persons` field"))?
        .as_array()
        .ok_or_else(|| PersistError::format("`persons` is not a sequence"))?;

    let mut persons = Vec::with_capacity(entries.len());
    let mut repairs: usize = 0;
    for (index, entry) in entries.iter().enumerate() {
        let Some([id, record, ..]) = entry.as_array().map(Vec::as_slice) else {
            return Err(PersistError::format(format!(
                "entry {index} is not an [id, record] pair"
            )));
        };
        let Some(id) = id.as_str() else {
            return Err(PersistError::format(format!(
                "entry {index} has a non-string identifier"
            )));
        };
        if !record.is_object() {
            return Err(PersistError::format(format!(
                "record for {id} is not an object"
            )));
        }
        let record = PersonRecord::deserialize(record).map_err(|e| {
            PersistError::format(format!("record for {id}: {e}"))
        })?;
        let (person, repaired) = record.into_person(PersonId::from(id), now);
        repairs = repairs.saturating_add(repaired);
        persons.push(person);
    }

    let count = persons.len();
    let store = PersonStore::from_persons(persons);
    if store.len() != count {
        tracing::warn!(
            entries = count,
            persons = store.len(),
            "duplicate identifiers in document, later entries kept"
        );
    }
    if repairs > 0 {
        tracing::warn!(repairs, "repaired self-references and duplicate set members");
    }
    Ok(store)
}

// ---------------------------------------------------------------------------
// PersistenceGateway
// ---------------------------------------------------------------------------

/// Loads and saves the whole store through a [`BlobStore`].
#[derive(Debug, Clone, Default)]
pub struct PersistenceGateway<B> {
    blob: B,
}

impl<B: BlobStore> PersistenceGateway<B> {
    /// Wrap a blob store.
    pub const fn new(blob: B) -> Self {
        Self { blob }
    }

    /// The underlying blob store.
    pub const fn blob(&self) -> &B {
        &self.blob
    }

    /// Load the saved store, or an empty one if nothing has been saved.
    pub fn load_store(&self) -> Result<PersonStore, PersistError> {
        let Some(bytes) = self.blob.load()? else {
            tracing::info!("no saved family tree, starting empty");
            return Ok(PersonStore::new());
        };
        let store = deserialize(&bytes)?;
        tracing::info!(persons = store.len(), "family tree loaded");
        Ok(store)
    }

    /// Replace the saved store.
    pub fn save_store(&mut self, store: &PersonStore) -> Result<(), PersistError> {
        let bytes = serialize(store)?;
        self.blob.save(&bytes)?;
        tracing::debug!(persons = store.len(), "family tree saved");
        Ok(())
    }
}
