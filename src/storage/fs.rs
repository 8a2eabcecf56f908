//! Filesystem blob backend: one file per storage location under a root directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::errors::Error;

use super::{BlobStore, StorageLocation};

/// Stores each blob at `root/<location>`.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. The directory is created lazily on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, location: &StorageLocation) -> Result<PathBuf, Error> {
        let relative = Path::new(location.as_str());
        // Locations are generated internally, but a custom resolver must not escape the root.
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(Error::Storage(format!(
                "Invalid storage location: {}",
                location
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for FsBlobStore {
    fn load(&self, location: &StorageLocation) -> Result<Option<Vec<u8>>, Error> {
        let path = self.path_for(location)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, location: &StorageLocation, bytes: &[u8]) -> Result<(), Error> {
        let path = self.path_for(location)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write then rename so readers never observe a half-written document.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, location: &StorageLocation) -> Result<(), Error> {
        let path = self.path_for(location)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
