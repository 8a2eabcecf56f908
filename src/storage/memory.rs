//! In-process blob backend.
//!
//! Clones share the same underlying map, so a test can hand one clone to the
//! engine and inspect or corrupt blobs through another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::Error;

use super::{BlobStore, StorageLocation};

#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<StorageLocation, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<StorageLocation, Vec<u8>>>, Error> {
        self.blobs
            .lock()
            .map_err(|_| Error::Storage("In-memory blob store lock poisoned".to_string()))
    }
}

impl BlobStore for InMemoryBlobStore {
    fn load(&self, location: &StorageLocation) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.lock()?.get(location).cloned())
    }

    fn save(&self, location: &StorageLocation, bytes: &[u8]) -> Result<(), Error> {
        self.lock()?.insert(location.clone(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, location: &StorageLocation) -> Result<(), Error> {
        self.lock()?.remove(location);
        Ok(())
    }
}
