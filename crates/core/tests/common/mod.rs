#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shelfkeep_core::StoreConfig;

/// Fixture macro for an in-memory [`RecordManager`](shelfkeep_core::RecordManager).
///
/// # Syntax
///
/// ```ignore
/// library! {
///     books: [("111", "A", "X"), ("222", "B", "Y")],
///     users: [("u1", "pw", "Ann")],
///     loans: [("111", "u1")],
/// }
/// ```
///
/// - `books` entries are `(isbn, title, author)`,
/// - `users` entries are `(user_id, password, name)`,
/// - `loans` (optional) are `(isbn, user_id)` and go through a regular
///   checkout, so they must name listed books and users.
#[macro_export]
macro_rules! library {
    (
        books: [$(($isbn:expr, $title:expr, $author:expr)),* $(,)?],
        users: [$(($user:expr, $password:expr, $name:expr)),* $(,)?]
        $(, loans: [$(($loan_isbn:expr, $loan_user:expr)),* $(,)?])?
        $(,)?
    ) => {{
        let mut manager = shelfkeep_core::RecordManager::in_memory();
        $(
            manager
                .add_book(shelfkeep_core::Book::new($isbn, $title, $author))
                .unwrap();
        )*
        $(
            manager
                .add_user(shelfkeep_core::User::new($user, $password, $name))
                .unwrap();
        )*
        $($(
            manager.checkout($loan_isbn, $loan_user).unwrap();
        )*)?
        manager
    }};
}

/// A directory under the system temp dir, emptied on creation and removed on drop.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(name: &str) -> Self {
        let path = env::temp_dir().join(format!("shelfkeep_it_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> StoreConfig {
        StoreConfig::in_dir(&self.path)
    }

    pub fn write(&self, file: &str, content: &str) {
        fs::write(self.path.join(file), content).unwrap();
    }

    pub fn read(&self, file: &str) -> String {
        fs::read_to_string(self.path.join(file)).unwrap()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
