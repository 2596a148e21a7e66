//! Wire-format read models.
//!
//! Every entity is rendered as a mapping of column name to *string* value --
//! numeric ids included -- because existing clients pin that shape (see the
//! `/person` list contract). The password hash has no field here and can
//! never leak into a response.

use serde::Serialize;

use crate::entity::{Album, Person, Picture};

/// Public projection of a [`Person`]. Omits the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonView {
    pub id: String,
    pub name: String,
}

impl From<&Person> for PersonView {
    fn from(p: &Person) -> Self {
        PersonView {
            id: p.id.to_string(),
            name: p.name.clone(),
        }
    }
}

/// Public projection of an [`Album`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumView {
    pub id: String,
    pub name: String,
    pub person_id: String,
}

impl From<&Album> for AlbumView {
    fn from(a: &Album) -> Self {
        AlbumView {
            id: a.id.to_string(),
            name: a.name.clone(),
            person_id: a.person_id.to_string(),
        }
    }
}

/// Public projection of a [`Picture`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureView {
    pub id: String,
    pub name: String,
    pub album_id: String,
    pub path: String,
}

impl From<&Picture> for PictureView {
    fn from(p: &Picture) -> Self {
        PictureView {
            id: p.id.to_string(),
            name: p.name.clone(),
            album_id: p.album_id.to_string(),
            path: p.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{AlbumId, PersonId, PictureId};

    #[test]
    fn person_view_renders_string_ids_and_omits_password() {
        let person = Person {
            id: PersonId(1),
            name: "Alice".to_string(),
            password: "$2b$12$secret-hash".to_string(),
        };
        let json = serde_json::to_value(PersonView::from(&person)).unwrap();
        assert_eq!(json, serde_json::json!({"id": "1", "name": "Alice"}));
        assert!(json.get("password").is_none());
    }

    #[test]
    fn album_view_renders_owner_as_string() {
        let album = Album {
            id: AlbumId(2),
            name: "Summer".to_string(),
            person_id: PersonId(1),
        };
        let json = serde_json::to_value(AlbumView::from(&album)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "2", "name": "Summer", "person_id": "1"})
        );
    }

    #[test]
    fn picture_view_includes_storage_key() {
        let picture = Picture {
            id: PictureId(3),
            name: "testImg1".to_string(),
            album_id: AlbumId(2),
            path: "ab12.jpg".to_string(),
        };
        let json = serde_json::to_value(PictureView::from(&picture)).unwrap();
        assert_eq!(json["album_id"], "2");
        assert_eq!(json["path"], "ab12.jpg");
    }
}
