//! One JSON document per collection.
//!
//! A [`JsonFile`] reads a whole collection at session start and writes it back
//! in one piece. Writes go to a sibling staging file first and are renamed over
//! the target, so a failed save leaves the previous document intact.
//!
//! A document that exists but cannot be read or parsed is never overwritten
//! in place: the first write after such a load moves it to `<file>.corrupt`.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use self::error::PersistenceError;

pub mod error;

const STAGING_SUFFIX: &str = ".tmp";
const CORRUPT_SUFFIX: &str = ".corrupt";

/// What a read found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot<T> {
    /// No file at the path.
    Missing,
    /// The file holds nothing but whitespace.
    Empty,
    Found(T),
}

/// Handle on the file backing one collection.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    /// Set when the last read found a file it could not use.
    quarantine: bool,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quarantine: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if the file on disk could not be loaded and has not been moved aside yet.
    #[must_use]
    pub const fn is_quarantined(&self) -> bool {
        self.quarantine
    }

    /// Moves the current document aside on the next write, as if it had
    /// failed to load.
    pub const fn mark_for_backup(&mut self) {
        self.quarantine = true;
    }

    /// Path the unusable document is moved to before it is overwritten.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.path, CORRUPT_SUFFIX)
    }

    /// Reads and decodes the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Read`] if the file exists but cannot be
    /// read (invalid UTF-8 included), and [`PersistenceError::Malformed`] if
    /// its content is not a valid document. Either way the file is marked for
    /// quarantine.
    pub fn read<T: DeserializeOwned>(&mut self) -> Result<Snapshot<T>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no file, starting empty");
                return Ok(Snapshot::Missing);
            }
            Err(source) => {
                self.quarantine = true;
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %self.path.display(), "empty file, starting empty");
            return Ok(Snapshot::Empty);
        }

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Snapshot::Found(value)),
            Err(source) => {
                self.quarantine = true;
                Err(PersistenceError::Malformed {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Encodes `value` and replaces the document with it.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Encode`] if `value` cannot be encoded and
    /// [`PersistenceError::Write`] if the directory, the backup of a
    /// quarantined file, or the document itself cannot be written.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Encode {
            path: self.path.clone(),
            source,
        })?;

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| PersistenceError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        if self.quarantine {
            self.move_aside()?;
        }

        let staging = sibling(&self.path, STAGING_SUFFIX);
        if let Err(source) = fs::write(&staging, &bytes) {
            return Err(PersistenceError::Write {
                path: staging,
                source,
            });
        }
        if let Err(source) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(PersistenceError::Write {
                path: self.path.clone(),
                source,
            });
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "file written");
        Ok(())
    }

    fn move_aside(&mut self) -> Result<(), PersistenceError> {
        let backup = self.backup_path();
        match fs::rename(&self.path, &backup) {
            Ok(()) => {
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "moved malformed file aside before overwriting it"
                );
            }
            // Removed by someone else in the meantime; nothing left to keep.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(PersistenceError::Write {
                    path: backup,
                    source,
                })
            }
        }
        self.quarantine = false;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
