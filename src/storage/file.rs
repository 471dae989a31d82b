//! File-backed storage

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{SnapshotStorage, StorageError, validate_key};

/// Stores each key as `<key>.json` inside a directory.
///
/// Writes land in a hidden temporary file that is then renamed over the
/// target, so readers only ever see a complete snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;

        Ok(Self { dir })
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(io_error(key)(source)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = self.dir.join(format!(".{key}.tmp"));

        fs::write(&staging, value).map_err(io_error(key))?;

        if let Err(source) = fs::rename(&staging, &path) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                debug!(path = %staging.display(), %cleanup, "failed to remove staging file");
            }

            return Err(io_error(key)(source));
        }

        debug!(path = %path.display(), bytes = value.len(), "wrote snapshot");

        Ok(())
    }
}
