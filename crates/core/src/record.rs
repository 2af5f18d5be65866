use core::borrow::Borrow;
use core::fmt::{Debug, Formatter, Result};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Unique identifier of a book.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From, Display)]
#[serde(transparent)]
pub struct Isbn(String);

/// Unique identifier of a library user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From, Display)]
#[serde(transparent)]
pub struct UserId(String);

macro_rules! string_key {
    ($key:ident) => {
        impl $key {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $key {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl Borrow<str> for $key {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $key {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $key {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $key {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_key!(Isbn);
string_key!(UserId);

/// A book in the catalogue. The ISBN never changes once the book is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
}

impl Book {
    #[must_use]
    pub fn new(
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }
}

/// A registered library user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub password: String,
    pub name: String,
}

impl User {
    #[must_use]
    pub fn new(
        user_id: impl Into<UserId>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

// Keeps passwords out of logs.
impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_serialize_as_plain_strings() {
        let book = Book::new("111", "A", "X");
        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"{"title":"A","author":"X","isbn":"111"}"#);
    }

    #[test]
    fn user_debug_hides_password() {
        let user = User::new("u1", "hunter2", "Ann");
        let shown = format!("{user:?}");
        assert!(shown.contains("u1"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn keys_compare_with_str() {
        let isbn = Isbn::from("978-0");
        assert_eq!(isbn, "978-0");
        assert_eq!(isbn.to_string(), "978-0");
        assert_eq!(UserId::from(String::from("u1")).as_str(), "u1");
    }
}
