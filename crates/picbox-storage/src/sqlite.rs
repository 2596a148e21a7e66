//! The [`SqliteStore`] implementation.
//!
//! Every mutation runs inside a transaction so uniqueness checks and their
//! paired inserts commit-or-fail as a unit. Deletes return the storage keys
//! of any pictures removed by the cascade so the caller can clean up blobs.

use rusqlite::{params, Connection, OptionalExtension, Row};

use picbox_core::{Album, AlbumId, Person, PersonId, Picture, PictureId};

use crate::error::StorageError;

/// SQLite-backed store for persons, albums, pictures, and sessions.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Row mappers
    // -----------------------------------------------------------------------

    fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
        Ok(Person {
            id: PersonId(row.get(0)?),
            name: row.get(1)?,
            password: row.get(2)?,
        })
    }

    fn album_from_row(row: &Row<'_>) -> rusqlite::Result<Album> {
        Ok(Album {
            id: AlbumId(row.get(0)?),
            name: row.get(1)?,
            person_id: PersonId(row.get(2)?),
        })
    }

    fn picture_from_row(row: &Row<'_>) -> rusqlite::Result<Picture> {
        Ok(Picture {
            id: PictureId(row.get(0)?),
            name: row.get(1)?,
            album_id: AlbumId(row.get(2)?),
            path: row.get(3)?,
        })
    }

    // -----------------------------------------------------------------------
    // Persons
    // -----------------------------------------------------------------------

    /// Inserts a new person with a pre-hashed password.
    ///
    /// The name-taken check and the insert share one transaction.
    pub fn create_person(
        &mut self,
        name: &str,
        password_hash: &str,
    ) -> Result<PersonId, StorageError> {
        let tx = self.conn.transaction()?;
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM person WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StorageError::NameTaken {
                name: name.to_string(),
            });
        }
        tx.execute(
            "INSERT INTO person (name, password) VALUES (?1, ?2)",
            params![name, password_hash],
        )?;
        let id = PersonId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(id)
    }

    /// Fetches a person by id.
    pub fn get_person(&self, id: PersonId) -> Result<Person, StorageError> {
        self.conn
            .query_row(
                "SELECT id, name, password FROM person WHERE id = ?1",
                params![id.0],
                Self::person_from_row,
            )
            .optional()?
            .ok_or(StorageError::PersonNotFound(id.0))
    }

    /// Fetches a person by exact display name, hash included.
    pub fn person_by_name(&self, name: &str) -> Result<Option<Person>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, password FROM person WHERE name = ?1",
                params![name],
                Self::person_from_row,
            )
            .optional()?)
    }

    /// Lists all persons in id order.
    pub fn list_persons(&self) -> Result<Vec<Person>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, password FROM person ORDER BY id")?;
        let rows = stmt.query_map([], Self::person_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Deletes a person; albums, pictures, and sessions cascade.
    ///
    /// Returns the storage keys of every picture removed by the cascade.
    pub fn delete_person(&mut self, id: PersonId) -> Result<Vec<String>, StorageError> {
        let tx = self.conn.transaction()?;
        let keys = {
            let mut stmt = tx.prepare(
                "SELECT picture.path FROM picture
                 JOIN album ON picture.album_id = album.id
                 WHERE album.person_id = ?1",
            )?;
            let rows = stmt.query_map(params![id.0], |row| row.get::<_, String>(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        let affected = tx.execute("DELETE FROM person WHERE id = ?1", params![id.0])?;
        if affected == 0 {
            return Err(StorageError::PersonNotFound(id.0));
        }
        tx.commit()?;
        Ok(keys)
    }

    // -----------------------------------------------------------------------
    // Albums
    // -----------------------------------------------------------------------

    /// Inserts a new album for `owner`.
    ///
    /// Album names are unique per owner; the duplicate check and the insert
    /// share one transaction (the UNIQUE constraint backstops it).
    pub fn create_album(&mut self, owner: PersonId, name: &str) -> Result<AlbumId, StorageError> {
        let tx = self.conn.transaction()?;
        let duplicate: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM album WHERE person_id = ?1 AND name = ?2)",
            params![owner.0, name],
            |row| row.get(0),
        )?;
        if duplicate {
            return Err(StorageError::DuplicateAlbumName {
                owner: owner.0,
                name: name.to_string(),
            });
        }
        tx.execute(
            "INSERT INTO album (name, person_id) VALUES (?1, ?2)",
            params![name, owner.0],
        )?;
        let id = AlbumId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(id)
    }

    /// Fetches an album by id.
    pub fn get_album(&self, id: AlbumId) -> Result<Album, StorageError> {
        self.conn
            .query_row(
                "SELECT id, name, person_id FROM album WHERE id = ?1",
                params![id.0],
                Self::album_from_row,
            )
            .optional()?
            .ok_or(StorageError::AlbumNotFound(id.0))
    }

    /// Looks up an album without treating absence as an error.
    pub fn find_album(&self, id: AlbumId) -> Result<Option<Album>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, person_id FROM album WHERE id = ?1",
                params![id.0],
                Self::album_from_row,
            )
            .optional()?)
    }

    /// Lists all albums in id order.
    pub fn list_albums(&self) -> Result<Vec<Album>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, person_id FROM album ORDER BY id")?;
        let rows = stmt.query_map([], Self::album_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Lists the pictures inside one album. Fails if the album is unknown.
    pub fn pictures_in_album(&self, id: AlbumId) -> Result<Vec<Picture>, StorageError> {
        self.get_album(id)?;
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, album_id, path FROM picture WHERE album_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![id.0], Self::picture_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Deletes an album; its pictures cascade.
    ///
    /// Returns the storage keys of the cascaded pictures.
    pub fn delete_album(&mut self, id: AlbumId) -> Result<Vec<String>, StorageError> {
        let tx = self.conn.transaction()?;
        let keys = {
            let mut stmt = tx.prepare("SELECT path FROM picture WHERE album_id = ?1")?;
            let rows = stmt.query_map(params![id.0], |row| row.get::<_, String>(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        let affected = tx.execute("DELETE FROM album WHERE id = ?1", params![id.0])?;
        if affected == 0 {
            return Err(StorageError::AlbumNotFound(id.0));
        }
        tx.commit()?;
        Ok(keys)
    }

    // -----------------------------------------------------------------------
    // Pictures
    // -----------------------------------------------------------------------

    /// Inserts a new picture into `album` with the given storage key.
    ///
    /// Picture names are unique globally.
    pub fn create_picture(
        &mut self,
        album: AlbumId,
        name: &str,
        path: &str,
    ) -> Result<PictureId, StorageError> {
        let tx = self.conn.transaction()?;
        let album_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM album WHERE id = ?1)",
            params![album.0],
            |row| row.get(0),
        )?;
        if !album_exists {
            return Err(StorageError::AlbumNotFound(album.0));
        }
        let duplicate: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM picture WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        if duplicate {
            return Err(StorageError::DuplicatePictureName {
                name: name.to_string(),
            });
        }
        tx.execute(
            "INSERT INTO picture (name, album_id, path) VALUES (?1, ?2, ?3)",
            params![name, album.0, path],
        )?;
        let id = PictureId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(id)
    }

    /// Fetches a picture by id.
    pub fn get_picture(&self, id: PictureId) -> Result<Picture, StorageError> {
        self.conn
            .query_row(
                "SELECT id, name, album_id, path FROM picture WHERE id = ?1",
                params![id.0],
                Self::picture_from_row,
            )
            .optional()?
            .ok_or(StorageError::PictureNotFound(id.0))
    }

    /// Lists all pictures in id order.
    pub fn list_pictures(&self) -> Result<Vec<Picture>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, album_id, path FROM picture ORDER BY id")?;
        let rows = stmt.query_map([], Self::picture_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Deletes a picture, returning its storage key.
    pub fn delete_picture(&mut self, id: PictureId) -> Result<String, StorageError> {
        let tx = self.conn.transaction()?;
        let key: Option<String> = tx
            .query_row(
                "SELECT path FROM picture WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()?;
        let key = key.ok_or(StorageError::PictureNotFound(id.0))?;
        tx.execute("DELETE FROM picture WHERE id = ?1", params![id.0])?;
        tx.commit()?;
        Ok(key)
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Records a session token for a person.
    pub fn create_session(&mut self, token: &str, person: PersonId) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO session (token, person_id) VALUES (?1, ?2)",
            params![token, person.0],
        )?;
        Ok(())
    }

    /// Resolves a session token to its person, if the session exists.
    pub fn session_person(&self, token: &str) -> Result<Option<Person>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT person.id, person.name, person.password FROM session
                 JOIN person ON session.person_id = person.id
                 WHERE session.token = ?1",
                params![token],
                Self::person_from_row,
            )
            .optional()?)
    }

    /// Removes a session token. Unknown tokens are not an error.
    pub fn delete_session(&mut self, token: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM session WHERE token = ?1", params![token])?;
        Ok(())
    }
}
