//! Loan bookkeeping: which user holds which book.
//!
//! Each ISBN is in one of two states, unassigned or assigned to exactly one
//! user. The only transitions are
//!
//! - unassigned → assigned to `u`, by a successful [`checkout`] naming an
//!   existing book and an existing user `u`;
//! - assigned to `u` → unassigned, by a successful [`checkin`] by `u`.
//!
//! Every other request is rejected without touching the map.
//!
//! [`checkout`]: AssignmentTracker::checkout
//! [`checkin`]: AssignmentTracker::checkin

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::error::{Conflict, NotFound, Result};
use crate::record::{Isbn, UserId};
use crate::store::Registry;

/// Lending state of an ISBN as seen by [`AssignmentTracker::availability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// No such book in the catalogue.
    Unknown,
    CheckedOut(UserId),
    Available,
}

impl Availability {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// The ISBN → holder map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentTracker {
    loans: HashMap<Isbn, UserId>,
}

impl AssignmentTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tracker from a persisted table. No reference checks are done
    /// here; see [`dangling`](Self::dangling).
    #[must_use]
    pub const fn from_table(loans: HashMap<Isbn, UserId>) -> Self {
        Self { loans }
    }

    #[must_use]
    pub fn table(&self) -> BTreeMap<&Isbn, &UserId> {
        self.loans.iter().collect()
    }

    /// `true` only if the book exists in `books` and nobody holds it.
    ///
    /// An unknown ISBN and a lent book both answer `false`; use
    /// [`availability`](Self::availability) to tell them apart.
    pub fn is_available<B>(&self, isbn: &str, books: &B) -> bool
    where
        B: Registry + ?Sized,
    {
        self.availability(isbn, books).is_available()
    }

    pub fn availability<B>(&self, isbn: &str, books: &B) -> Availability
    where
        B: Registry + ?Sized,
    {
        if let Some(holder) = self.loans.get(isbn) {
            Availability::CheckedOut(holder.clone())
        } else if books.exists(isbn) {
            Availability::Available
        } else {
            Availability::Unknown
        }
    }

    /// Lends `isbn` to `user_id`.
    ///
    /// # Errors
    ///
    /// - [`NotFound::Book`] if `books` has no such ISBN,
    /// - [`NotFound::User`] if `users` has no such user,
    /// - [`Conflict::CheckedOut`] if anybody, `user_id` included, already
    ///   holds the book.
    ///
    /// The map is unchanged on error.
    pub fn checkout<B, U>(&mut self, isbn: &str, user_id: &str, books: &B, users: &U) -> Result<()>
    where
        B: Registry + ?Sized,
        U: Registry + ?Sized,
    {
        if !books.exists(isbn) {
            tracing::debug!(%isbn, %user_id, "checkout refused: unknown book");
            return Err(NotFound::Book(isbn.into()).into());
        }
        if !users.exists(user_id) {
            tracing::debug!(%isbn, %user_id, "checkout refused: unknown user");
            return Err(NotFound::User(user_id.into()).into());
        }
        if let Some(holder) = self.loans.get(isbn) {
            tracing::debug!(%isbn, %user_id, %holder, "checkout refused: already lent");
            return Err(Conflict::CheckedOut {
                isbn: isbn.into(),
                holder: holder.clone(),
            }
            .into());
        }

        self.loans.insert(isbn.into(), user_id.into());
        tracing::debug!(%isbn, %user_id, "checked out");
        Ok(())
    }

    /// Returns `isbn` on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// - [`NotFound::Loan`] if nobody holds the book,
    /// - [`Conflict::WrongHolder`] if somebody other than `user_id` holds it.
    pub fn checkin(&mut self, isbn: &str, user_id: &str) -> Result<()> {
        match self.loans.get(isbn) {
            None => {
                tracing::debug!(%isbn, %user_id, "checkin refused: not lent");
                Err(NotFound::Loan(isbn.into()).into())
            }
            Some(holder) if holder != user_id => {
                tracing::debug!(%isbn, %user_id, %holder, "checkin refused: wrong holder");
                Err(Conflict::WrongHolder {
                    isbn: isbn.into(),
                    holder: holder.clone(),
                    claimant: user_id.into(),
                }
                .into())
            }
            Some(_) => {
                self.loans.remove(isbn);
                tracing::debug!(%isbn, %user_id, "checked in");
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn holder(&self, isbn: &str) -> Option<&UserId> {
        self.loans.get(isbn)
    }

    /// ISBNs held by `user_id`, in order.
    #[must_use]
    pub fn loans_of(&self, user_id: &str) -> Vec<&Isbn> {
        let mut held: Vec<_> = self
            .iter()
            .filter(|(_, holder)| *holder == user_id)
            .map(|(isbn, _)| isbn)
            .collect();
        held.sort_unstable();
        held
    }

    /// Loans that point at a book or user no longer present, in ISBN order.
    ///
    /// Checkout never creates these, but files edited outside a session can.
    #[must_use]
    pub fn dangling<B, U>(&self, books: &B, users: &U) -> Vec<(&Isbn, &UserId)>
    where
        B: Registry + ?Sized,
        U: Registry + ?Sized,
    {
        self.table()
            .into_iter()
            .filter(|(isbn, user_id)| {
                !books.exists(isbn.as_str()) || !users.exists(user_id.as_str())
            })
            .collect()
    }

    /// Every loan, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Isbn, &UserId)> {
        self.loans.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    fn registry(keys: &[&str]) -> HashMap<String, ()> {
        keys.iter().map(|key| ((*key).to_owned(), ())).collect()
    }

    #[test]
    fn unknown_and_lent_books_are_both_unavailable() {
        let books = registry(&["111", "222"]);
        let users = registry(&["u1"]);
        let mut tracker = AssignmentTracker::new();
        tracker.checkout("222", "u1", &books, &users).unwrap();

        assert!(tracker.is_available("111", &books));
        assert!(!tracker.is_available("222", &books));
        assert!(!tracker.is_available("999", &books));

        assert_eq!(tracker.availability("111", &books), Availability::Available);
        assert_eq!(
            tracker.availability("222", &books),
            Availability::CheckedOut(UserId::from("u1"))
        );
        assert_eq!(tracker.availability("999", &books), Availability::Unknown);
    }

    #[test]
    fn checkout_validates_references_without_mutating() {
        let books = registry(&["111"]);
        let users = registry(&["u1"]);
        let mut tracker = AssignmentTracker::new();

        let err = tracker.checkout("999", "u1", &books, &users).unwrap_err();
        assert!(matches!(err, Error::NotFound(NotFound::Book(_))));
        let err = tracker.checkout("111", "ghost", &books, &users).unwrap_err();
        assert!(matches!(err, Error::NotFound(NotFound::User(_))));
        assert!(tracker.is_empty());
    }

    #[test]
    fn no_double_checkout_even_by_holder() {
        let books = registry(&["111"]);
        let users = registry(&["u1", "u2"]);
        let mut tracker = AssignmentTracker::new();
        tracker.checkout("111", "u1", &books, &users).unwrap();

        for user in ["u1", "u2"] {
            let err = tracker.checkout("111", user, &books, &users).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conflict);
        }
        assert_eq!(tracker.holder("111").unwrap(), "u1");
    }

    #[test]
    fn only_holder_checks_in_and_only_once() {
        let books = registry(&["111"]);
        let users = registry(&["u1", "u2"]);
        let mut tracker = AssignmentTracker::new();
        tracker.checkout("111", "u1", &books, &users).unwrap();

        let err = tracker.checkin("111", "u2").unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict(Conflict::WrongHolder { ref holder, .. }) if holder == "u1"
        ));

        tracker.checkin("111", "u1").unwrap();
        let err = tracker.checkin("111", "u1").unwrap_err();
        assert!(matches!(err, Error::NotFound(NotFound::Loan(_))));
        assert!(tracker.is_available("111", &books));
    }

    #[test]
    fn loans_of_and_dangling() {
        let books = registry(&["111", "222", "333"]);
        let users = registry(&["u1", "u2"]);
        let mut tracker = AssignmentTracker::new();
        tracker.checkout("333", "u1", &books, &users).unwrap();
        tracker.checkout("111", "u1", &books, &users).unwrap();
        tracker.checkout("222", "u2", &books, &users).unwrap();

        assert_eq!(tracker.loans_of("u1"), ["111", "333"]);
        assert!(tracker.loans_of("u3").is_empty());

        let mut all: Vec<_> = tracker.iter().map(|(isbn, user)| (isbn.as_str(), user.as_str())).collect();
        all.sort_unstable();
        assert_eq!(all, [("111", "u1"), ("222", "u2"), ("333", "u1")]);

        let fewer_books = registry(&["111", "222"]);
        let fewer_users = registry(&["u1"]);
        let dangling: Vec<_> = tracker
            .dangling(&fewer_books, &fewer_users)
            .into_iter()
            .map(|(isbn, user)| (isbn.as_str(), user.as_str()))
            .collect();
        assert_eq!(dangling, [("222", "u2"), ("333", "u1")]);
    }
}
