//! Core domain model for the picbox photo-album service.
//!
//! Defines the entity id newtypes, the Person/Album/Picture entities, and
//! the public read-model views used on the wire. Entities may carry private
//! fields (the password hash); views are the only serializable projection
//! and never include them.

pub mod entity;
pub mod id;
pub mod view;

pub use entity::{Album, Person, Picture};
pub use id::{AlbumId, PersonId, PictureId};
pub use view::{AlbumView, PersonView, PictureView};
