//! Storage error types.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage
//! layer: database errors, entity-not-found variants for each entity type,
//! and the uniqueness violations the schema enforces.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No person with the given id.
    #[error("person not found: {0}")]
    PersonNotFound(i64),

    /// No album with the given id.
    #[error("album not found: {0}")]
    AlbumNotFound(i64),

    /// No picture with the given id.
    #[error("picture not found: {0}")]
    PictureNotFound(i64),

    /// A person with this name already exists.
    #[error("name is already taken: {name}")]
    NameTaken { name: String },

    /// The owner already has an album with this name.
    #[error("owner {owner} already has an album named '{name}'")]
    DuplicateAlbumName { owner: i64, name: String },

    /// A picture with this name already exists.
    #[error("a picture named '{name}' already exists")]
    DuplicatePictureName { name: String },
}
