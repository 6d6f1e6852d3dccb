//! Persistence for the Kindred family-tree manager.
//!
//! The whole person store is encoded as one JSON document and kept in an
//! opaque [`BlobStore`]. Export files use the same encoding with a version
//! literal, so an export can be imported back or dropped in as local
//! storage.
//!
//! # Modules
//!
//! - [`document`] -- Storage and export document shapes, lenient record reader
//! - [`gateway`] -- Encode/decode functions and the [`PersistenceGateway`]
//! - [`blob`] -- File-backed and in-memory blob stores
//! - [`error`] -- Error types

pub mod blob;
pub mod document;
pub mod error;
pub mod gateway;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use document::EXPORT_VERSION;
pub use error::PersistError;
pub use gateway::{
    PersistenceGateway, deserialize, deserialize_at, export, export_at, export_file_name,
    serialize, serialize_at,
};
