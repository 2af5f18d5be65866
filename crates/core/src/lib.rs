//! Record keeping for a small lending library.
//!
//! `shelfkeep_core` tracks three collections and keeps them consistent with
//! each other:
//!
//! 1. **Books** -- [`BookStore`], keyed by ISBN.
//! 2. **Users** -- [`UserStore`], keyed by user id.
//! 3. **Loans** -- [`AssignmentTracker`], mapping an ISBN to the single user
//!    currently holding it.
//!
//! The tracker is the only component with invariants that span collections: a
//! checkout must name an existing book and an existing user, a book is lent to
//! at most one user at a time, and only the holder can check a book back in.
//! It reads the other two stores through the [`Registry`] trait and never
//! mutates them.
//!
//! # Entry point
//!
//! [`Session::open`] loads every collection from a data directory described by
//! a [`StoreConfig`] and hands out a [`RecordManager`]. Closing the session, or
//! dropping it on any exit path, writes all three collections back.
//!
//! ```rust,ignore
//! use shelfkeep_core::{Book, Session, StoreConfig, User};
//!
//! let mut session = Session::open(&StoreConfig::in_dir("data"));
//! session.add_book(Book::new("111", "A", "X"))?;
//! session.add_user(User::new("u1", "secret", "Ann"))?;
//! session.checkout("111", "u1")?;
//! assert!(!session.is_available("111"));
//! let report = session.close();
//! assert!(report.is_clean());
//! ```
//!
//! Every fallible operation returns [`Result`] carrying an [`Error`] whose
//! [`ErrorKind`] tells apart missing records, conflicting requests and storage
//! failures. Storage failures never abort a session: a collection that cannot
//! be read starts empty, and a collection that cannot be written is reported
//! while the remaining ones are still saved.
//!
//! # Known limitations
//!
//! The data files are not locked. Two processes working on the same directory
//! overwrite each other's changes.

pub mod assignment;
pub mod config;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod record;
pub mod report;
pub mod session;
pub mod store;

pub use assignment::{AssignmentTracker, Availability};
pub use config::StoreConfig;
pub use error::{Conflict, Error, ErrorKind, NotFound, Result};
pub use manager::{BookQuery, RecordManager, UserQuery};
pub use record::{Book, Isbn, User, UserId};
pub use report::{Collection, LoadReport, LoadStatus, SaveReport, SaveStatus};
pub use session::Session;
pub use store::{BookStore, Registry, UserStore};
