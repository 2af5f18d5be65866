/// Loading and saving the three collection files.
mod common;

use common::ScratchDir;
use shelfkeep_core::{
    Book, Collection, LoadStatus, RecordManager, Registry, SaveStatus, Session, User, UserId,
};

fn stock(manager: &mut RecordManager) {
    manager.add_book(Book::new("111", "A", "X")).unwrap();
    manager.add_book(Book::new("222", "B", "Y")).unwrap();
    manager.add_user(User::new("u1", "pw1", "Ann")).unwrap();
    manager.add_user(User::new("u2", "pw2", "Bob")).unwrap();
    manager.checkout("222", "u2").unwrap();
}

/// Save then reload with nothing in between gives back the same tables.
#[test]
fn save_and_reload_round_trip() {
    let dir = ScratchDir::new("round_trip");

    let (mut first, report) = RecordManager::load(&dir.config());
    assert!(matches!(report.books, LoadStatus::Missing));
    assert!(report.is_clean());
    stock(&mut first);
    let saved = first.save();
    assert!(saved.is_clean(), "{saved:?}");
    assert!(matches!(saved.assignments, SaveStatus::Saved { records: 1 }));

    let (second, report) = RecordManager::load(&dir.config());
    assert!(matches!(report.books, LoadStatus::Loaded { records: 2 }));
    assert!(matches!(report.users, LoadStatus::Loaded { records: 2 }));
    assert!(matches!(report.assignments, LoadStatus::Loaded { records: 1 }));

    assert_eq!(first.books(), second.books());
    assert_eq!(first.users(), second.users());
    assert_eq!(first.assignments(), second.assignments());
    assert_eq!(second.holder("222").map(UserId::as_str), Some("u2"));
}

/// The documents keep the layout other tools read: objects keyed by id.
#[test]
fn files_are_keyed_json_objects() {
    let dir = ScratchDir::new("layout");
    let (mut manager, _) = RecordManager::load(&dir.config());
    stock(&mut manager);
    assert!(manager.save().is_clean());

    let books: serde_json::Value = serde_json::from_str(&dir.read("books.json")).unwrap();
    assert_eq!(
        books["111"],
        serde_json::json!({ "title": "A", "author": "X", "isbn": "111" })
    );
    let users: serde_json::Value = serde_json::from_str(&dir.read("users.json")).unwrap();
    assert_eq!(
        users["u2"],
        serde_json::json!({ "user_id": "u2", "password": "pw2", "name": "Bob" })
    );
    let loans: serde_json::Value = serde_json::from_str(&dir.read("assignments.json")).unwrap();
    assert_eq!(loans, serde_json::json!({ "222": "u2" }));
}

/// A malformed file empties only its own collection, and is moved aside
/// rather than silently overwritten.
#[test]
fn malformed_file_is_isolated_and_preserved() {
    let dir = ScratchDir::new("malformed");
    dir.write(
        "books.json",
        r#"{ "111": { "title": "A", "author": "X", "isbn": "111" } }"#,
    );
    dir.write("users.json", "[1, 2,");
    dir.write("assignments.json", "   ");

    let (mut manager, report) = RecordManager::load(&dir.config());
    assert!(matches!(report.books, LoadStatus::Loaded { records: 1 }));
    assert!(report.users.is_failed());
    assert!(matches!(report.assignments, LoadStatus::Empty));
    assert_eq!(
        report.failures().map(|(collection, _)| collection).collect::<Vec<_>>(),
        [Collection::Users]
    );
    assert!(manager.users().is_empty());
    assert!(manager.books().exists("111"));

    assert!(manager.save().is_clean());
    assert_eq!(dir.read("users.json.corrupt"), "[1, 2,");
    assert_eq!(dir.read("users.json").trim(), "{}");
}

/// A file that is not valid UTF-8 starts empty and survives as a backup.
#[test]
fn undecodable_file_is_preserved() {
    let dir = ScratchDir::new("not_utf8");
    let original = b"{ \"111\": { \"title\": \"Caf\xE9\", \"author\": \"X\", \"isbn\": \"111\" } }";
    std::fs::write(dir.path().join("books.json"), original).unwrap();

    let (mut manager, report) = RecordManager::load(&dir.config());
    assert!(report.books.is_failed());
    assert!(manager.books().is_empty());
    manager.add_book(Book::new("222", "B", "Y")).unwrap();

    assert!(manager.save().is_clean());
    assert_eq!(
        std::fs::read(dir.path().join("books.json.corrupt")).unwrap(),
        original
    );
    let (reloaded, _) = RecordManager::load(&dir.config());
    assert!(reloaded.books().exists("222"));
}

/// Two entries claiming the same id: one is kept, the other is reported and
/// the original file is backed up before it is rewritten.
#[test]
fn clashing_ids_are_reported_and_backed_up() {
    let dir = ScratchDir::new("clash");
    let books = r#"{
        "111": { "title": "A", "author": "X", "isbn": "111" },
        "old": { "title": "A2", "author": "X", "isbn": "111" }
    }"#;
    dir.write("books.json", books);
    dir.write(
        "users.json",
        r#"{ "a": { "user_id": "u1", "password": "p", "name": "Ann" },
             "b": { "user_id": "u1", "password": "q", "name": "Anne" } }"#,
    );

    let (mut manager, report) = RecordManager::load(&dir.config());
    assert!(!report.is_clean());
    assert_eq!(manager.books().get("111").map(|b| b.title.as_str()), Some("A"));
    assert_eq!(report.duplicate_books, [Book::new("111", "A2", "X")]);
    assert_eq!(report.duplicate_users.len(), 1);
    assert_eq!(manager.users().get("u1").map(|u| u.name.as_str()), Some("Ann"));

    assert!(manager.save().is_clean());
    assert_eq!(dir.read("books.json.corrupt"), books);
    assert!(dir.path().join("users.json.corrupt").exists());
}

/// Loans left behind by hand edits are kept and reported.
#[test]
fn dangling_loans_are_reported() {
    let dir = ScratchDir::new("dangling");
    dir.write("assignments.json", r#"{ "111": "u1" }"#);

    let (mut manager, report) = RecordManager::load(&dir.config());
    assert!(!report.is_clean());
    assert_eq!(report.dangling.len(), 1);
    assert_eq!(report.dangling[0].0, "111");

    // The recorded holder can still return it.
    assert!(manager.checkin("111", "u1").is_ok());
}

/// One collection failing to save does not stop the other two.
#[test]
fn failed_save_does_not_block_the_rest() {
    let dir = ScratchDir::new("partial_save");
    let (mut manager, _) = RecordManager::load(&dir.config());
    stock(&mut manager);

    // A directory where the users file should be makes that write fail.
    std::fs::create_dir_all(dir.path().join("users.json")).unwrap();

    let report = manager.save();
    assert!(!report.is_clean());
    assert!(matches!(report.users, SaveStatus::Failed(_)));
    assert!(matches!(report.books, SaveStatus::Saved { records: 2 }));
    assert!(matches!(report.assignments, SaveStatus::Saved { records: 1 }));
}

/// Dropping a session without closing it still writes the records.
#[test]
fn dropped_session_saves() {
    let dir = ScratchDir::new("session_drop");
    {
        let mut session = Session::open(&dir.config());
        stock(&mut session);
    }

    let session = Session::open(&dir.config());
    assert_eq!(session.books().len(), 2);
    assert_eq!(session.loans_of("u2").len(), 1);
    assert!(session.close().is_clean());
}

/// A panic that unwinds through an open session still saves it.
#[test]
fn session_saves_when_a_panic_unwinds() {
    let dir = ScratchDir::new("session_panic");
    let config = dir.config();

    let result = std::panic::catch_unwind(|| {
        let mut session = Session::open(&config);
        stock(&mut session);
        panic!("menu handler failed");
    });
    assert!(result.is_err());

    let (reloaded, report) = RecordManager::load(&config);
    assert!(report.is_clean());
    assert_eq!(reloaded.books().len(), 2);
    assert_eq!(reloaded.holder("222").map(UserId::as_str), Some("u2"));
}

#[test]
fn closed_session_reports_and_reloads() {
    let dir = ScratchDir::new("session_close");
    let mut session = Session::open(&dir.config());
    assert!(session.load_report().is_clean());
    stock(&mut session);
    session.checkin("222", "u2").unwrap();

    let report = session.close();
    assert!(report.is_clean());

    let (reloaded, _) = RecordManager::load(&dir.config());
    assert!(reloaded.assignments().is_empty());
    assert!(reloaded.is_available("222"));
}
