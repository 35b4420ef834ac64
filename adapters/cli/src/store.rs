//! Progress persisted as a small JSON document.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use creepydom_core::ProgressStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or writing the progress file.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    /// The file could not be read or written.
    #[error("progress file {} is not accessible", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file did not contain a progress document.
    #[error("progress file {} is malformed", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgressFile {
    unlocked: u32,
}

/// [`ProgressStore`] backed by a JSON file.
#[derive(Debug)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
    unlocked: u32,
}

impl JsonFileStore {
    /// Opens the store; a missing file means nothing has been won yet.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let unlocked = match fs::read_to_string(&path) {
            Ok(contents) => {
                let file: ProgressFile =
                    serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
                        path: path.clone(),
                        source,
                    })?;
                file.unlocked
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => 1,
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, unlocked })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    type Error = StoreError;

    fn get(&self) -> u32 {
        self.unlocked
    }

    fn set(&mut self, unlocked: u32) -> Result<(), Self::Error> {
        let contents = serde_json::to_string_pretty(&ProgressFile { unlocked }).map_err(
            |source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            },
        )?;
        fs::write(&self.path, contents).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.unlocked = unlocked;
        Ok(())
    }
}
