use std::fmt::{Display, Formatter, Result};
use std::io;
use std::path::PathBuf;

/// A collection file could not be read, parsed or written.
#[derive(Debug)]
pub enum PersistenceError {
    /// The file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
    /// The file was read but does not hold the expected JSON document.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The collection could not be encoded.
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The file, its directory or its backup could not be written.
    Write { path: PathBuf, source: io::Error },
}

impl PersistenceError {
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Malformed { path, .. }
            | Self::Encode { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "malformed data in {}: {source}", path.display())
            }
            Self::Encode { path, source } => {
                write!(f, "cannot encode data for {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Malformed { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}
