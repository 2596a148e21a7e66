//! Domain entities.
//!
//! These are the persistence-shaped records. `Person` carries the bcrypt
//! password hash and therefore deliberately does not derive `Serialize`;
//! the wire projections live in [`crate::view`].

use crate::id::{AlbumId, PersonId, PictureId};

/// A registered account. Owns zero or more albums.
#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    /// Globally unique display name.
    pub name: String,
    /// bcrypt hash of the account password. Never serialized.
    pub password: String,
}

/// A named container of pictures, owned by exactly one person.
///
/// Album names are unique per owner, not globally.
#[derive(Debug, Clone)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub person_id: PersonId,
}

/// An uploaded image record belonging to exactly one album.
///
/// The effective owner of a picture is its album's `person_id`; every
/// authorization check walks that chain.
#[derive(Debug, Clone)]
pub struct Picture {
    pub id: PictureId,
    /// Globally unique picture name.
    pub name: String,
    pub album_id: AlbumId,
    /// Relative storage key (`<uuid>.<ext>`), opaque outside the blob store.
    pub path: String,
}
