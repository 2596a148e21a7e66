//! API schema types for request/response definitions.
//!
//! Entity views come from `picbox-core`; this module holds the form inputs
//! and the fixed success/info bodies. Types use serde derives for JSON and
//! urlencoded-form (de)serialization.

pub mod albums;
pub mod common;
pub mod session;
