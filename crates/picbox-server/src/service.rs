//! AlbumService: the single coordinator between HTTP handlers and the
//! storage/blob layers.
//!
//! All business logic flows through [`AlbumService`]. Handlers are thin
//! wrappers that resolve the request's session token, acquire the service
//! lock, and delegate here. Authorization walks the ownership chain
//! (Person -> Album -> Picture) before any mutation.

use uuid::Uuid;

use picbox_core::{AlbumId, AlbumView, Person, PersonId, PersonView, PictureId, PictureView};
use picbox_storage::SqliteStore;

use crate::auth;
use crate::blob::BlobStore;
use crate::error::ApiError;

/// The central service coordinating credentials, sessions, the ownership
/// graph, and blob persistence.
pub struct AlbumService {
    store: SqliteStore,
    blobs: BlobStore,
}

impl AlbumService {
    /// Creates a service backed by a SQLite database at `db_path` and a
    /// media directory at `media_dir`.
    pub fn new(db_path: &str, media_dir: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::Internal(format!("failed to open database: {e}")))?;
        let blobs = BlobStore::new(media_dir)
            .map_err(|e| ApiError::Internal(format!("failed to open media dir: {e}")))?;
        Ok(AlbumService { store, blobs })
    }

    /// Creates a service with an in-memory database (for testing).
    pub fn in_memory(media_dir: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()
            .map_err(|e| ApiError::Internal(format!("failed to open database: {e}")))?;
        let blobs = BlobStore::new(media_dir)
            .map_err(|e| ApiError::Internal(format!("failed to open media dir: {e}")))?;
        Ok(AlbumService { store, blobs })
    }

    // -----------------------------------------------------------------------
    // Session state
    // -----------------------------------------------------------------------

    /// Resolves a session token to its person, if the session is live.
    fn current_person(&self, token: Option<&str>) -> Result<Option<Person>, ApiError> {
        match token {
            Some(token) => Ok(self.store.session_person(token)?),
            None => Ok(None),
        }
    }

    /// Auth gate: the caller must be authenticated.
    fn require_person(&self, token: Option<&str>) -> Result<Person, ApiError> {
        self.current_person(token)?.ok_or(ApiError::LoginRequired)
    }

    /// Inverse gate: the caller must *not* be authenticated.
    fn require_anonymous(&self, token: Option<&str>) -> Result<(), ApiError> {
        match self.current_person(token)? {
            Some(person) => Err(ApiError::AuthState(format!(
                "already logged in as '{}'",
                person.name
            ))),
            None => Ok(()),
        }
    }

    /// Registers a new account. Only valid while anonymous.
    pub fn register(
        &mut self,
        token: Option<&str>,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), ApiError> {
        self.require_anonymous(token)?;
        let (name, password) = match (nonblank(name), nonblank(password)) {
            (Some(name), Some(password)) => (name, password),
            _ => {
                return Err(ApiError::MissingFields(
                    "name and password are required".to_string(),
                ))
            }
        };
        let hash = auth::hash_password(password)?;
        let id = self.store.create_person(name, &hash)?;
        tracing::info!(person = %id, name, "registered");
        Ok(())
    }

    /// Logs in, returning the new session token. Only valid while anonymous.
    pub fn login(
        &mut self,
        token: Option<&str>,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<String, ApiError> {
        self.require_anonymous(token)?;
        let (name, password) = match (nonblank(name), nonblank(password)) {
            (Some(name), Some(password)) => (name, password),
            _ => {
                return Err(ApiError::MissingFields(
                    "name and password are required".to_string(),
                ))
            }
        };
        let person = self
            .store
            .person_by_name(name)?
            .ok_or_else(|| ApiError::AuthState("unknown account".to_string()))?;
        if !auth::verify_password(password, &person.password) {
            return Err(ApiError::AuthState("invalid password".to_string()));
        }
        // Bind a fresh token to the person; the person record is untouched.
        let session = Uuid::new_v4().to_string();
        self.store.create_session(&session, person.id)?;
        tracing::info!(person = %person.id, "logged in");
        Ok(session)
    }

    /// Logs out, destroying the session. Requires an authenticated caller.
    pub fn logout(&mut self, token: Option<&str>) -> Result<(), ApiError> {
        self.require_person(token)?;
        if let Some(token) = token {
            self.store.delete_session(token)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persons
    // -----------------------------------------------------------------------

    pub fn list_persons(&self) -> Result<Vec<PersonView>, ApiError> {
        Ok(self.store.list_persons()?.iter().map(Into::into).collect())
    }

    pub fn get_person(&self, id: i64) -> Result<PersonView, ApiError> {
        Ok((&self.store.get_person(PersonId(id))?).into())
    }

    /// Deletes an account. Only the person themself may do this; albums,
    /// pictures, and sessions cascade, and picture blobs are removed.
    pub fn delete_person(&mut self, token: Option<&str>, id: i64) -> Result<(), ApiError> {
        let caller = self.require_person(token)?;
        // 404 before 403: the target must exist either way.
        let target = self.store.get_person(PersonId(id))?;
        if caller.id != target.id {
            return Err(ApiError::Forbidden(
                "only the account owner may delete it".to_string(),
            ));
        }
        let keys = self.store.delete_person(target.id)?;
        self.remove_blobs(&keys);
        tracing::info!(person = %target.id, "deleted account");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Albums
    // -----------------------------------------------------------------------

    pub fn list_albums(&self) -> Result<Vec<AlbumView>, ApiError> {
        Ok(self.store.list_albums()?.iter().map(Into::into).collect())
    }

    pub fn get_album(&self, id: i64) -> Result<AlbumView, ApiError> {
        Ok((&self.store.get_album(AlbumId(id))?).into())
    }

    pub fn album_pictures(&self, id: i64) -> Result<Vec<PictureView>, ApiError> {
        Ok(self
            .store
            .pictures_in_album(AlbumId(id))?
            .iter()
            .map(Into::into)
            .collect())
    }

    /// Creates an album owned by the session's person, never by form input.
    pub fn create_album(
        &mut self,
        token: Option<&str>,
        name: Option<&str>,
    ) -> Result<(), ApiError> {
        let owner = self.require_person(token)?;
        let name = nonblank(name)
            .ok_or_else(|| ApiError::MissingFields("album name is required".to_string()))?;
        let id = self.store.create_album(owner.id, name)?;
        tracing::info!(album = %id, owner = %owner.id, "created album");
        Ok(())
    }

    /// Deletes an album the caller owns; its pictures and blobs go with it.
    pub fn delete_album(&mut self, token: Option<&str>, id: i64) -> Result<(), ApiError> {
        let caller = self.require_person(token)?;
        let album = self.store.get_album(AlbumId(id))?;
        if album.person_id != caller.id {
            return Err(ApiError::Forbidden(
                "only the album owner may delete it".to_string(),
            ));
        }
        let keys = self.store.delete_album(album.id)?;
        self.remove_blobs(&keys);
        tracing::info!(album = %album.id, "deleted album");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pictures
    // -----------------------------------------------------------------------

    pub fn list_pictures(&self) -> Result<Vec<PictureView>, ApiError> {
        Ok(self.store.list_pictures()?.iter().map(Into::into).collect())
    }

    pub fn get_picture(&self, id: i64) -> Result<PictureView, ApiError> {
        Ok((&self.store.get_picture(PictureId(id))?).into())
    }

    /// Adds a picture to an album the caller owns.
    ///
    /// A nonexistent album answers 403, the same as one owned by somebody
    /// else: write paths do not reveal whether a resource exists.
    pub fn add_picture(
        &mut self,
        token: Option<&str>,
        album_id: i64,
        name: Option<&str>,
        payload: &[u8],
        original_filename: &str,
    ) -> Result<(), ApiError> {
        let caller = self.require_person(token)?;
        let album = self
            .store
            .find_album(AlbumId(album_id))?
            .filter(|album| album.person_id == caller.id)
            .ok_or_else(|| {
                ApiError::Forbidden("cannot add pictures to this album".to_string())
            })?;
        let name = nonblank(name)
            .ok_or_else(|| ApiError::MissingFields("picture name is required".to_string()))?;
        if payload.is_empty() {
            return Err(ApiError::MissingFields(
                "an image payload is required".to_string(),
            ));
        }
        let key = self.blobs.save(payload, original_filename)?;
        match self.store.create_picture(album.id, name, &key) {
            Ok(id) => {
                tracing::info!(picture = %id, album = %album.id, "added picture");
                Ok(())
            }
            Err(e) => {
                // The row never landed; don't strand the blob.
                self.remove_blobs(std::slice::from_ref(&key));
                Err(e.into())
            }
        }
    }

    /// Deletes a picture from an album the caller owns.
    pub fn delete_picture(&mut self, token: Option<&str>, id: i64) -> Result<(), ApiError> {
        let caller = self.require_person(token)?;
        let picture = self.store.get_picture(PictureId(id))?;
        let album = self.store.get_album(picture.album_id)?;
        if album.person_id != caller.id {
            return Err(ApiError::Forbidden(
                "only the album owner may delete its pictures".to_string(),
            ));
        }
        let key = self.store.delete_picture(picture.id)?;
        self.remove_blobs(std::slice::from_ref(&key));
        tracing::info!(picture = %picture.id, "deleted picture");
        Ok(())
    }

    /// Best-effort blob cleanup after a committed delete. A failed removal
    /// leaves an orphan file, not an inconsistent database.
    fn remove_blobs(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.blobs.remove(key) {
                tracing::warn!(key = %key, error = %e, "failed to remove blob");
            }
        }
    }
}

/// Treats absent and all-whitespace form values alike.
fn nonblank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
