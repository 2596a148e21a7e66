//! HTTP handler modules for the picbox API.
//!
//! Each sub-module implements thin handlers that parse the request, resolve
//! the session token, acquire the service lock, and delegate to
//! [`crate::service::AlbumService`]. No business logic lives in handlers.

pub mod albums;
pub mod meta;
pub mod persons;
pub mod pictures;
pub mod session;
