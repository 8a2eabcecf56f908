//! Persistence gateway: per-user blobs addressed by an opaque storage location.
//!
//! This module provides:
//! - `BlobStore`: the load/save/delete contract the memory engine depends on
//! - `StorageLocation`: deterministic per-identity key
//! - `fs`, `sqlite`, `memory`: the shipped backends

pub mod fs;
pub mod memory;
pub mod sqlite;

use std::fmt;

use sha2::{Digest, Sha256};

use crate::errors::Error;

pub use self::fs::FsBlobStore;
pub use self::memory::InMemoryBlobStore;
pub use self::sqlite::SqliteBlobStore;

/// File name of the memory document inside a user's storage area.
const MEMORY_DOCUMENT: &str = "__long-memories/data.json";

/// Opaque key identifying where one user's memory collection lives.
///
/// Always a relative, `/`-separated path without `..` components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageLocation(String);

impl StorageLocation {
    /// Derive the location for an identity.
    ///
    /// The identity is hashed, so credentials never appear in paths or keys.
    pub fn for_identity(identity: &str) -> Self {
        let digest = Sha256::digest(identity.as_bytes());
        Self(format!("users/{}/{}", hex::encode(digest), MEMORY_DOCUMENT))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Blob storage keyed by user identity.
///
/// Implementations treat a missing blob as `Ok(None)` on load and as success
/// on delete. Saves overwrite the whole blob.
pub trait BlobStore: Send {
    /// Resolve the storage location for an opaque identity. Deterministic.
    fn resolve_location(&self, identity: &str) -> Result<StorageLocation, Error> {
        if identity.trim().is_empty() {
            return Err(Error::InvalidInput("Identity cannot be empty".to_string()));
        }
        Ok(StorageLocation::for_identity(identity))
    }

    fn load(&self, location: &StorageLocation) -> Result<Option<Vec<u8>>, Error>;

    fn save(&self, location: &StorageLocation, bytes: &[u8]) -> Result<(), Error>;

    fn delete(&self, location: &StorageLocation) -> Result<(), Error>;
}
