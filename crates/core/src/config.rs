use std::path::PathBuf;

use typed_builder::TypedBuilder;

pub const BOOKS_FILE: &str = "books.json";
pub const USERS_FILE: &str = "users.json";
pub const ASSIGNMENTS_FILE: &str = "assignments.json";

/// Where a session keeps its three collection files.
///
/// ```rust,ignore
/// let config = StoreConfig::builder()
///     .data_dir("/var/lib/shelfkeep")
///     .books_file("catalogue.json")
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct StoreConfig {
    #[builder(setter(into))]
    pub data_dir: PathBuf,
    #[builder(default = BOOKS_FILE.to_owned(), setter(into))]
    pub books_file: String,
    #[builder(default = USERS_FILE.to_owned(), setter(into))]
    pub users_file: String,
    #[builder(default = ASSIGNMENTS_FILE.to_owned(), setter(into))]
    pub assignments_file: String,
}

impl StoreConfig {
    /// Default file names inside `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::builder().data_dir(data_dir).build()
    }

    #[must_use]
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    #[must_use]
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    #[must_use]
    pub fn assignments_path(&self) -> PathBuf {
        self.data_dir.join(&self.assignments_file)
    }
}
