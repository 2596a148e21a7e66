//! HTTP/JSON API server for the picbox photo-album service.
//!
//! Users register and authenticate, create albums, and upload pictures into
//! albums they own. Every write walks the Person -> Album -> Picture
//! ownership chain before it mutates anything. This crate contains the
//! server framework, API schema types, session handling, blob storage, and
//! route definitions.

pub mod auth;
pub mod blob;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
