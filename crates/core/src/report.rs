use derive_more::Display;

use crate::persistence::error::PersistenceError;
use crate::record::{Book, Isbn, User, UserId};

/// One of the three persisted collections.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Collection {
    #[display("books")]
    Books,
    #[display("users")]
    Users,
    #[display("assignments")]
    Assignments,
}

/// Outcome of loading one collection.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded { records: usize },
    /// No file yet.
    Missing,
    /// The file held only whitespace.
    Empty,
    /// Unreadable or malformed; the collection starts empty.
    Failed(PersistenceError),
}

impl LoadStatus {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// What [`RecordManager::load`](crate::RecordManager::load) found on disk.
#[derive(Debug)]
pub struct LoadReport {
    pub books: LoadStatus,
    pub users: LoadStatus,
    pub assignments: LoadStatus,
    /// Loans referring to a book or user that was not loaded.
    pub dangling: Vec<(Isbn, UserId)>,
    /// Books left out because another entry in the file has the same ISBN.
    /// The file is moved aside on the next save.
    pub duplicate_books: Vec<Book>,
    /// Users left out because another entry in the file has the same id.
    pub duplicate_users: Vec<User>,
}

impl LoadReport {
    pub fn statuses(&self) -> impl Iterator<Item = (Collection, &LoadStatus)> {
        [
            (Collection::Books, &self.books),
            (Collection::Users, &self.users),
            (Collection::Assignments, &self.assignments),
        ]
        .into_iter()
    }

    pub fn failures(&self) -> impl Iterator<Item = (Collection, &PersistenceError)> {
        self.statuses().filter_map(|(collection, status)| match status {
            LoadStatus::Failed(err) => Some((collection, err)),
            _ => None,
        })
    }

    /// `true` if every collection loaded (or was absent), no loan dangles
    /// and no record was left out.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
            && self.dangling.is_empty()
            && self.duplicate_books.is_empty()
            && self.duplicate_users.is_empty()
    }
}

/// Outcome of saving one collection.
#[derive(Debug)]
pub enum SaveStatus {
    Saved { records: usize },
    /// The manager has no backing file.
    Skipped,
    Failed(PersistenceError),
}

/// Per-collection result of [`RecordManager::save`](crate::RecordManager::save).
#[derive(Debug)]
pub struct SaveReport {
    pub books: SaveStatus,
    pub users: SaveStatus,
    pub assignments: SaveStatus,
}

impl SaveReport {
    pub fn statuses(&self) -> impl Iterator<Item = (Collection, &SaveStatus)> {
        [
            (Collection::Books, &self.books),
            (Collection::Users, &self.users),
            (Collection::Assignments, &self.assignments),
        ]
        .into_iter()
    }

    pub fn failures(&self) -> impl Iterator<Item = (Collection, &PersistenceError)> {
        self.statuses().filter_map(|(collection, status)| match status {
            SaveStatus::Failed(err) => Some((collection, err)),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}
