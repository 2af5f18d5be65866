use std::collections::BTreeMap;

use hashbrown::HashMap;

use super::Registry;
use crate::error::{Conflict, NotFound, Result};
use crate::record::{Book, Isbn};

/// The book catalogue, keyed by ISBN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookStore {
    books: HashMap<Isbn, Book>,
}

impl BookStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a persisted table.
    ///
    /// Records are keyed by their own ISBN; a table entry filed under a
    /// different key is re-keyed. Records that lose to another record with
    /// the same ISBN are returned alongside the store.
    #[must_use]
    pub fn from_table(table: HashMap<Isbn, Book>) -> (Self, Vec<Book>) {
        let (books, dropped) = super::rekey(table, |book| &book.isbn);
        (Self { books }, dropped)
    }

    /// Sorted view used for persisting and listing.
    #[must_use]
    pub fn table(&self) -> BTreeMap<&Isbn, &Book> {
        self.books.iter().collect()
    }

    /// Adds a new book.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::DuplicateBook`] if the ISBN is taken; the stored
    /// record is left untouched.
    pub fn add(&mut self, book: Book) -> Result<()> {
        if self.books.contains_key(&book.isbn) {
            return Err(Conflict::DuplicateBook(book.isbn).into());
        }
        tracing::debug!(isbn = %book.isbn, "book added");
        self.books.insert(book.isbn.clone(), book);
        Ok(())
    }

    /// Replaces the whole record filed under `book.isbn`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Book`] if no book has that ISBN.
    pub fn update(&mut self, book: Book) -> Result<()> {
        let Some(stored) = self.books.get_mut(&book.isbn) else {
            return Err(NotFound::Book(book.isbn).into());
        };
        tracing::debug!(isbn = %book.isbn, "book updated");
        *stored = book;
        Ok(())
    }

    /// Removes a book and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Book`] if no book has that ISBN.
    pub fn remove(&mut self, isbn: &str) -> Result<Book> {
        let book = self
            .books
            .remove(isbn)
            .ok_or_else(|| NotFound::Book(isbn.into()))?;
        tracing::debug!(%isbn, "book removed");
        Ok(book)
    }

    #[must_use]
    pub fn search_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// All books whose title equals `title` exactly.
    #[must_use]
    pub fn search_by_title(&self, title: &str) -> BTreeMap<&Isbn, &Book> {
        self.matching(|book| book.title == title)
    }

    /// All books whose author equals `author` exactly.
    #[must_use]
    pub fn search_by_author(&self, author: &str) -> BTreeMap<&Isbn, &Book> {
        self.matching(|book| book.author == author)
    }

    fn matching(&self, predicate: impl Fn(&Book) -> bool) -> BTreeMap<&Isbn, &Book> {
        self.books
            .iter()
            .filter(|(_, book)| predicate(book))
            .collect()
    }

    /// Books ordered by ISBN.
    pub fn list(&self) -> impl Iterator<Item = &Book> {
        self.table().into_values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl Registry for BookStore {
    type Record = Book;

    fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }
}
