use core::hash::Hash;
use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::assignment::{AssignmentTracker, Availability};
use crate::config::StoreConfig;
use crate::error::{Conflict, Result};
use crate::persistence::{JsonFile, Snapshot};
use crate::record::{Book, Isbn, User, UserId};
use crate::report::{Collection, LoadReport, LoadStatus, SaveReport, SaveStatus};
use crate::store::{BookStore, Registry, UserStore};

/// How to look books up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookQuery {
    Title(String),
    Author(String),
    Isbn(String),
}

/// How to look users up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    Id(String),
    Name(String),
}

#[derive(Debug)]
struct Files {
    books: JsonFile,
    users: JsonFile,
    assignments: JsonFile,
}

/// Books, users and loans behind one facade.
///
/// The manager owns the three stores and is the only place where they meet:
/// loans are validated against the catalogue and the user registry, and books
/// or users with an active loan cannot be deleted.
#[derive(Debug, Default)]
pub struct RecordManager {
    books: BookStore,
    users: UserStore,
    loans: AssignmentTracker,
    /// `None` for a manager that lives only in memory.
    files: Option<Files>,
}

impl RecordManager {
    /// An empty manager with no backing files. [`save`](Self::save) skips
    /// every collection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// An in-memory manager over existing stores.
    #[must_use]
    pub const fn from_stores(books: BookStore, users: UserStore, loans: AssignmentTracker) -> Self {
        Self {
            books,
            users,
            loans,
            files: None,
        }
    }

    /// Loads the three collections named by `config`.
    ///
    /// Each collection is loaded on its own. A missing, blank, unreadable or
    /// malformed file leaves that collection empty and is recorded in the
    /// report; it never prevents the others from loading. Records that share
    /// an id with another record in the same file are left out and reported,
    /// and the file is moved aside before the next save overwrites it.
    #[must_use]
    pub fn load(config: &StoreConfig) -> (Self, LoadReport) {
        let mut files = Files {
            books: JsonFile::new(config.books_path()),
            users: JsonFile::new(config.users_path()),
            assignments: JsonFile::new(config.assignments_path()),
        };

        let (books, books_status) = load_table(&mut files.books, Collection::Books);
        let (users, users_status) = load_table(&mut files.users, Collection::Users);
        let (loans, loans_status) = load_table(&mut files.assignments, Collection::Assignments);

        let (books, duplicate_books) = BookStore::from_table(books);
        if !duplicate_books.is_empty() {
            files.books.mark_for_backup();
        }
        let (users, duplicate_users) = UserStore::from_table(users);
        if !duplicate_users.is_empty() {
            files.users.mark_for_backup();
        }
        let loans = AssignmentTracker::from_table(loans);

        let dangling: Vec<(Isbn, UserId)> = loans
            .dangling(&books, &users)
            .into_iter()
            .map(|(isbn, user_id)| (isbn.clone(), user_id.clone()))
            .collect();
        for (isbn, user_id) in &dangling {
            tracing::warn!(%isbn, %user_id, "loan refers to a missing book or user");
        }

        tracing::info!(
            dir = %config.data_dir.display(),
            books = books.len(),
            users = users.len(),
            loans = loans.len(),
            "records loaded"
        );

        let report = LoadReport {
            books: books_status,
            users: users_status,
            assignments: loans_status,
            dangling,
            duplicate_books,
            duplicate_users,
        };
        let manager = Self {
            books,
            users,
            loans,
            files: Some(files),
        };
        (manager, report)
    }

    /// Writes all three collections.
    ///
    /// A failed write is reported and the remaining collections are still
    /// attempted.
    pub fn save(&mut self) -> SaveReport {
        let Some(files) = self.files.as_mut() else {
            tracing::debug!("in-memory records, nothing to save");
            return SaveReport {
                books: SaveStatus::Skipped,
                users: SaveStatus::Skipped,
                assignments: SaveStatus::Skipped,
            };
        };

        let report = SaveReport {
            books: save_table(&mut files.books, Collection::Books, &self.books.table()),
            users: save_table(&mut files.users, Collection::Users, &self.users.table()),
            assignments: save_table(
                &mut files.assignments,
                Collection::Assignments,
                &self.loans.table(),
            ),
        };
        if report.is_clean() {
            tracing::info!("records saved");
        }
        report
    }

    #[must_use]
    pub const fn books(&self) -> &BookStore {
        &self.books
    }

    #[must_use]
    pub const fn users(&self) -> &UserStore {
        &self.users
    }

    #[must_use]
    pub const fn assignments(&self) -> &AssignmentTracker {
        &self.loans
    }

    /// # Errors
    ///
    /// See [`BookStore::add`].
    pub fn add_book(&mut self, book: Book) -> Result<()> {
        self.books.add(book)
    }

    /// # Errors
    ///
    /// See [`BookStore::update`].
    pub fn update_book(&mut self, book: Book) -> Result<()> {
        self.books.update(book)
    }

    /// Deletes a book that is not on loan.
    ///
    /// # Errors
    ///
    /// [`NotFound::Book`](crate::NotFound::Book) for an unknown ISBN,
    /// [`Conflict::BookOnLoan`] while somebody holds it.
    pub fn delete_book(&mut self, isbn: &str) -> Result<Book> {
        if self.books.exists(isbn) {
            if let Some(holder) = self.loans.holder(isbn) {
                return Err(Conflict::BookOnLoan {
                    isbn: isbn.into(),
                    holder: holder.clone(),
                }
                .into());
            }
        }
        self.books.remove(isbn)
    }

    /// Exact-match search. An ISBN query yields at most one entry.
    #[must_use]
    pub fn search_books(&self, query: &BookQuery) -> BTreeMap<&Isbn, &Book> {
        match query {
            BookQuery::Title(title) => self.books.search_by_title(title),
            BookQuery::Author(author) => self.books.search_by_author(author),
            BookQuery::Isbn(isbn) => self
                .books
                .search_by_isbn(isbn)
                .map(|book| (&book.isbn, book))
                .into_iter()
                .collect(),
        }
    }

    /// # Errors
    ///
    /// See [`UserStore::add`].
    pub fn add_user(&mut self, user: User) -> Result<()> {
        self.users.add(user)
    }

    /// # Errors
    ///
    /// See [`UserStore::update_password`].
    pub fn update_password(&mut self, user_id: &str, password: impl Into<String>) -> Result<()> {
        self.users.update_password(user_id, password)
    }

    /// Deletes a user who holds no book.
    ///
    /// # Errors
    ///
    /// [`NotFound::User`](crate::NotFound::User) for an unknown id,
    /// [`Conflict::UserHasLoans`] while the user holds any book.
    pub fn delete_user(&mut self, user_id: &str) -> Result<User> {
        if self.users.exists(user_id) {
            let loans = self.loans.loans_of(user_id).len();
            if loans > 0 {
                return Err(Conflict::UserHasLoans {
                    user_id: user_id.into(),
                    loans,
                }
                .into());
            }
        }
        self.users.remove(user_id)
    }

    /// Exact-match search. An id query yields at most one entry.
    #[must_use]
    pub fn search_users(&self, query: &UserQuery) -> BTreeMap<&UserId, &User> {
        match query {
            UserQuery::Id(user_id) => self
                .users
                .search_by_id(user_id)
                .map(|user| (&user.user_id, user))
                .into_iter()
                .collect(),
            UserQuery::Name(name) => self.users.search_by_name(name),
        }
    }

    #[must_use]
    pub fn verify_user(&self, user_id: &str, password: &str) -> bool {
        self.users.verify(user_id, password)
    }

    /// # Errors
    ///
    /// See [`AssignmentTracker::checkout`].
    pub fn checkout(&mut self, isbn: &str, user_id: &str) -> Result<()> {
        self.loans.checkout(isbn, user_id, &self.books, &self.users)
    }

    /// # Errors
    ///
    /// See [`AssignmentTracker::checkin`].
    pub fn checkin(&mut self, isbn: &str, user_id: &str) -> Result<()> {
        self.loans.checkin(isbn, user_id)
    }

    /// `false` for a lent book and for an unknown ISBN alike.
    #[must_use]
    pub fn is_available(&self, isbn: &str) -> bool {
        self.loans.is_available(isbn, &self.books)
    }

    #[must_use]
    pub fn availability(&self, isbn: &str) -> Availability {
        self.loans.availability(isbn, &self.books)
    }

    #[must_use]
    pub fn holder(&self, isbn: &str) -> Option<&UserId> {
        self.loans.holder(isbn)
    }

    #[must_use]
    pub fn loans_of(&self, user_id: &str) -> Vec<&Isbn> {
        self.loans.loans_of(user_id)
    }
}

fn load_table<K, V>(file: &mut JsonFile, collection: Collection) -> (HashMap<K, V>, LoadStatus)
where
    K: DeserializeOwned + Eq + Hash,
    V: DeserializeOwned,
{
    match file.read::<HashMap<K, V>>() {
        Ok(Snapshot::Found(table)) => {
            let records = table.len();
            tracing::debug!(%collection, records, path = %file.path().display(), "collection loaded");
            (table, LoadStatus::Loaded { records })
        }
        Ok(Snapshot::Missing) => (HashMap::new(), LoadStatus::Missing),
        Ok(Snapshot::Empty) => (HashMap::new(), LoadStatus::Empty),
        Err(err) => {
            tracing::warn!(%collection, error = %err, "cannot load collection, starting empty");
            (HashMap::new(), LoadStatus::Failed(err))
        }
    }
}

fn save_table<K, V>(file: &mut JsonFile, collection: Collection, table: &BTreeMap<K, V>) -> SaveStatus
where
    K: Serialize,
    V: Serialize,
{
    match file.write(table) {
        Ok(()) => SaveStatus::Saved {
            records: table.len(),
        },
        Err(err) => {
            tracing::warn!(%collection, error = %err, "cannot save collection");
            SaveStatus::Failed(err)
        }
    }
}
