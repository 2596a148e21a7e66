//! Album form inputs.

use serde::Deserialize;

/// Form body for `POST /createAlbum`.
///
/// The owner is never taken from the form: it is always the authenticated
/// session's person.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlbumForm {
    #[serde(default)]
    pub name: Option<String>,
}
