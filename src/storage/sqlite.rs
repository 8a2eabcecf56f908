//! SQLite blob backend: every user's document is one row in a `blobs` table.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Error;

use super::{BlobStore, StorageLocation};

/// SQLite-backed blob store.
pub struct SqliteBlobStore {
    conn: Connection,
}

/// Initialize database schema.
fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS blobs (
            location TEXT PRIMARY KEY,
            data BLOB NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
}

impl SqliteBlobStore {
    /// Open or create a SQLite database at the given path.
    ///
    /// Initializes the schema if the database is new.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or schema initialization fails.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore {
    fn load(&self, location: &StorageLocation) -> Result<Option<Vec<u8>>, Error> {
        let data = self
            .conn
            .query_row(
                "SELECT data FROM blobs WHERE location = ?1",
                [location.as_str()],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(data)
    }

    fn save(&self, location: &StorageLocation, bytes: &[u8]) -> Result<(), Error> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO blobs (location, data, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(location) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            "#,
            params![location.as_str(), bytes, &now],
        )?;
        Ok(())
    }

    fn delete(&self, location: &StorageLocation) -> Result<(), Error> {
        self.conn
            .execute("DELETE FROM blobs WHERE location = ?1", [location.as_str()])?;
        Ok(())
    }
}
