use derive_more::{Display, From};

use crate::persistence::error::PersistenceError;
use crate::record::{Isbn, UserId};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum NotFound {
    #[display("no book with ISBN {_0}")]
    Book(Isbn),
    #[display("no user with id {_0}")]
    User(UserId),
    /// The book exists (or existed) but nobody holds it.
    #[display("book {_0} is not checked out")]
    Loan(Isbn),
}

/// The request contradicts the current state of a store.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Conflict {
    #[display("a book with ISBN {_0} already exists")]
    DuplicateBook(Isbn),
    #[display("a user with id {_0} already exists")]
    DuplicateUser(UserId),
    #[display("book {isbn} is already checked out to {holder}")]
    CheckedOut { isbn: Isbn, holder: UserId },
    /// Only the holder may return a book.
    #[display("book {isbn} is checked out to {holder}, not {claimant}")]
    WrongHolder {
        isbn: Isbn,
        holder: UserId,
        claimant: UserId,
    },
    #[display("the new password for {_0} is the same as the current one")]
    PasswordUnchanged(UserId),
    #[display("book {isbn} is checked out to {holder} and cannot be deleted")]
    BookOnLoan { isbn: Isbn, holder: UserId },
    #[display("user {user_id} still holds {loans} book(s) and cannot be deleted")]
    UserHasLoans { user_id: UserId, loans: usize },
}

/// Error returned by every fallible store, tracker and manager operation.
#[derive(Debug, Display, From)]
pub enum Error {
    NotFound(NotFound),
    Conflict(Conflict),
    Persistence(PersistenceError),
}

/// Coarse classification of an [`Error`], for callers that branch on cause.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    PersistenceFailure,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
        }
    }
}

impl std::error::Error for NotFound {}

impl std::error::Error for Conflict {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(err) => Some(err),
            Self::Conflict(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}
