//! The interactive menu loop.
//!
//! Field values are collected in full before anything reaches the records:
//! a blank required field is asked for again, and an interrupt or end of input
//! in the middle of an entry ends the loop with nothing from that entry
//! committed.

use std::io::{self, Write};

use shelfkeep_core::{
    Availability, Book, BookQuery, LoadReport, LoadStatus, RecordManager, SaveReport, SaveStatus,
    User, UserQuery,
};

use crate::input::{LineSource, ReadError};
use crate::menu::MenuChoice;

const RULE: &str = "----------------------------------------";

/// Why the loop ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The exit command was chosen.
    Exit,
    Interrupted,
    EndOfInput,
}

/// Anything that ends the loop early.
enum Halt {
    Input(ReadError),
    Output(io::Error),
}

impl From<io::Error> for Halt {
    fn from(err: io::Error) -> Self {
        Self::Output(err)
    }
}

type Step<T = ()> = Result<T, Halt>;

/// Menu loop over a record manager.
pub struct Shell<'a, I, W> {
    records: &'a mut RecordManager,
    input: I,
    out: W,
}

impl<'a, I, W> Shell<'a, I, W>
where
    I: LineSource,
    W: Write,
{
    pub fn new(records: &'a mut RecordManager, input: I, out: W) -> Self {
        Self {
            records,
            input,
            out,
        }
    }

    /// Runs until the exit command, an interrupt or the end of input.
    ///
    /// # Errors
    ///
    /// Fails when the input cannot be read or the output cannot be written.
    pub fn run(&mut self) -> io::Result<Outcome> {
        loop {
            let step = self.print_menu().and_then(|()| self.next_command());
            match step {
                Ok(Some(MenuChoice::Exit)) => {
                    writeln!(self.out, "Exiting the system. Goodbye!")?;
                    return Ok(Outcome::Exit);
                }
                Ok(Some(choice)) => {
                    tracing::debug!(?choice, "menu command");
                    if let Err(halt) = self.execute(choice) {
                        return self.halted(halt);
                    }
                }
                Ok(None) => {}
                Err(halt) => return self.halted(halt),
            }
        }
    }

    fn halted(&mut self, halt: Halt) -> io::Result<Outcome> {
        match halt {
            Halt::Input(ReadError::Interrupted) => {
                writeln!(self.out, "\nInterrupted, unfinished entry discarded. Gracefully exiting....")?;
                Ok(Outcome::Interrupted)
            }
            Halt::Input(ReadError::Eof) => {
                writeln!(self.out, "\nEnd of input. Gracefully exiting....")?;
                Ok(Outcome::EndOfInput)
            }
            Halt::Input(ReadError::Io(err)) | Halt::Output(err) => Err(err),
        }
    }

    fn print_menu(&mut self) -> Step {
        writeln!(self.out, "\n--- Library Management System ---")?;
        writeln!(self.out, "Please choose an option:")?;
        for choice in MenuChoice::ALL {
            writeln!(self.out, "{choice}")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn next_command(&mut self) -> Step<Option<MenuChoice>> {
        let line = self.read("Enter your choice: ")?;
        match line.parse::<MenuChoice>() {
            Ok(choice) => Ok(Some(choice)),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                Ok(None)
            }
        }
    }

    fn read(&mut self, prompt: &str) -> Step<String> {
        self.out.flush()?;
        self.input.read_line(prompt).map_err(Halt::Input)
    }

    /// Asks for `field` until a non-blank value is entered.
    fn required(&mut self, prompt: &str, field: &str) -> Step<String> {
        loop {
            let value = self.read(prompt)?.trim().to_owned();
            if !value.is_empty() {
                return Ok(value);
            }
            writeln!(self.out, "The {field} is required.")?;
        }
    }

    fn execute(&mut self, choice: MenuChoice) -> Step {
        match choice {
            MenuChoice::AddBook => self.add_book(),
            MenuChoice::UpdateBook => self.update_book(),
            MenuChoice::DeleteBook => self.delete_book(),
            MenuChoice::ListBooks => self.list_books(),
            MenuChoice::SearchBooks => self.search_books(),
            MenuChoice::AddUser => self.add_user(),
            MenuChoice::UpdateUser => self.update_user(),
            MenuChoice::DeleteUser => self.delete_user(),
            MenuChoice::ListUsers => self.list_users(),
            MenuChoice::SearchUsers => self.search_users(),
            MenuChoice::CheckOut => self.check_out(),
            MenuChoice::CheckIn => self.check_in(),
            MenuChoice::TrackAvailability => self.track_availability(),
            MenuChoice::VerifyUser => self.verify_user(),
            MenuChoice::Save => {
                let report = self.records.save();
                print_save_report(&mut self.out, &report)?;
                Ok(())
            }
            // Handled by the loop.
            MenuChoice::Exit => Ok(()),
        }
    }

    fn book_form(&mut self) -> Step<Book> {
        let title = self.required("Please enter book title: ", "title")?;
        let author = self.required("Please enter book author: ", "author")?;
        let isbn = self.required("Please enter book isbn: ", "ISBN")?;
        Ok(Book::new(isbn, title, author))
    }

    fn loan_form(&mut self) -> Step<(String, String)> {
        let isbn = self.required("Please enter isbn of book: ", "ISBN")?;
        let user_id = self.required("Please enter your user id: ", "user id")?;
        Ok((isbn, user_id))
    }

    fn outcome(&mut self, result: shelfkeep_core::Result<()>, done: &str) -> Step {
        match result {
            Ok(()) => writeln!(self.out, "{done}")?,
            Err(err) => writeln!(self.out, "Failed: {err}.")?,
        }
        Ok(())
    }

    fn add_book(&mut self) -> Step {
        let book = self.book_form()?;
        let done = format!("Book with ISBN {} added.", book.isbn);
        let result = self.records.add_book(book);
        self.outcome(result, &done)
    }

    fn update_book(&mut self) -> Step {
        let book = self.book_form()?;
        let done = format!("Book with ISBN {} updated.", book.isbn);
        let result = self.records.update_book(book);
        self.outcome(result, &done)
    }

    fn delete_book(&mut self) -> Step {
        let isbn = self.required("Please enter book isbn: ", "ISBN")?;
        let result = self.records.delete_book(&isbn).map(drop);
        self.outcome(result, &format!("Book with ISBN {isbn} deleted."))
    }

    fn list_books(&mut self) -> Step {
        if self.records.books().is_empty() {
            writeln!(self.out, "No books found.")?;
            return Ok(());
        }
        for (index, book) in self.records.books().list().enumerate() {
            let status = match self.records.holder(book.isbn.as_str()) {
                Some(holder) => format!("checked out to {holder}"),
                None => "available".to_owned(),
            };
            writeln!(
                self.out,
                "Book {}\nISBN: {}\nTitle: {}\nAuthor: {}\nStatus: {status}\n{RULE}",
                index + 1,
                book.isbn,
                book.title,
                book.author,
            )?;
        }
        Ok(())
    }

    fn search_books(&mut self) -> Step {
        let mode = self.read(
            "Enter 1 for search by title\nEnter 2 for search by author\nEnter 3 for search by isbn: ",
        )?;
        let query = match mode.trim() {
            "1" => BookQuery::Title(self.required("Enter title of book: ", "title")?),
            "2" => BookQuery::Author(self.required("Enter author of book: ", "author")?),
            "3" => BookQuery::Isbn(self.required("Enter isbn of book: ", "ISBN")?),
            _ => {
                writeln!(self.out, "Invalid input")?;
                return Ok(());
            }
        };

        let found = self.records.search_books(&query);
        if found.is_empty() {
            writeln!(self.out, "No matching books.")?;
        }
        for book in found.values() {
            writeln!(
                self.out,
                "ISBN: {}\nTitle: {}\nAuthor: {}\n{RULE}",
                book.isbn, book.title, book.author
            )?;
        }
        Ok(())
    }

    fn add_user(&mut self) -> Step {
        let user_id = self.required("Please enter user id: ", "user id")?;
        let password = self.required("Please enter user password: ", "password")?;
        let name = self.required("Please enter your name: ", "name")?;
        let done = format!("User {user_id} added.");
        let result = self.records.add_user(User::new(user_id, password, name));
        self.outcome(result, &done)
    }

    fn update_user(&mut self) -> Step {
        let user_id = self.required("Please enter user id: ", "user id")?;
        let password = self.required("Please enter new password: ", "password")?;
        let result = self.records.update_password(&user_id, password);
        self.outcome(result, &format!("Password of {user_id} updated."))
    }

    fn delete_user(&mut self) -> Step {
        let user_id = self.required("Please enter user id: ", "user id")?;
        let result = self.records.delete_user(&user_id).map(drop);
        self.outcome(result, &format!("User {user_id} deleted."))
    }

    fn list_users(&mut self) -> Step {
        if self.records.users().is_empty() {
            writeln!(self.out, "No users found.")?;
            return Ok(());
        }
        for user in self.records.users().list() {
            let loans = self.records.loans_of(user.user_id.as_str()).len();
            writeln!(
                self.out,
                "User ID: {}\nName: {}\nBooks held: {loans}\n{RULE}",
                user.user_id, user.name
            )?;
        }
        Ok(())
    }

    fn search_users(&mut self) -> Step {
        let mode = self.read("Enter 1 for searching by id\nEnter 2 for searching by name: ")?;
        let query = match mode.trim() {
            "1" => UserQuery::Id(self.required("Enter user id: ", "user id")?),
            "2" => UserQuery::Name(self.required("Enter username: ", "name")?),
            _ => {
                writeln!(self.out, "Invalid input")?;
                return Ok(());
            }
        };

        let found = self.records.search_users(&query);
        if found.is_empty() {
            writeln!(self.out, "No matching users.")?;
        }
        for user in found.values() {
            writeln!(self.out, "User ID: {}\nName: {}\n{RULE}", user.user_id, user.name)?;
        }
        Ok(())
    }

    fn check_out(&mut self) -> Step {
        let (isbn, user_id) = self.loan_form()?;
        let result = self.records.checkout(&isbn, &user_id);
        self.outcome(
            result,
            &format!("Book with ISBN {isbn} assigned to user with ID {user_id}."),
        )
    }

    fn check_in(&mut self) -> Step {
        let (isbn, user_id) = self.loan_form()?;
        let result = self.records.checkin(&isbn, &user_id);
        self.outcome(result, &format!("Assignment of book with ISBN {isbn} removed."))
    }

    fn track_availability(&mut self) -> Step {
        let isbn = self.required("Enter isbn to check availability: ", "ISBN")?;
        match self.records.availability(&isbn) {
            Availability::Available => writeln!(self.out, "Available!")?,
            Availability::CheckedOut(holder) => {
                writeln!(self.out, "Not available (checked out to {holder})")?;
            }
            Availability::Unknown => writeln!(self.out, "Not available (no book with ISBN {isbn})")?,
        }
        Ok(())
    }

    fn verify_user(&mut self) -> Step {
        let user_id = self.required("Please enter user id: ", "user id")?;
        let password = self.read("Please enter user password: ")?;
        if self.records.verify_user(&user_id, password.trim()) {
            writeln!(self.out, "User verified successfully")?;
        } else {
            writeln!(self.out, "Either password or login id is incorrect")?;
        }
        Ok(())
    }
}

/// Prints what was found on disk at session start.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn print_load_report(out: &mut impl Write, report: &LoadReport) -> io::Result<()> {
    for (collection, status) in report.statuses() {
        match status {
            LoadStatus::Loaded { .. } | LoadStatus::Empty => {}
            LoadStatus::Missing => {
                writeln!(out, "No {collection} file found. Creating new data store.")?;
            }
            LoadStatus::Failed(err) => {
                writeln!(out, "Could not load {collection} ({err}). Starting with no {collection}.")?;
            }
        }
    }
    for (isbn, user_id) in &report.dangling {
        writeln!(
            out,
            "Warning: the loan of {isbn} to {user_id} refers to a missing book or user."
        )?;
    }
    for book in &report.duplicate_books {
        writeln!(
            out,
            "Warning: skipped a second book with ISBN {} ({}); the file will be backed up.",
            book.isbn, book.title
        )?;
    }
    for user in &report.duplicate_users {
        writeln!(
            out,
            "Warning: skipped a second user with ID {} ({}); the file will be backed up.",
            user.user_id, user.name
        )?;
    }
    Ok(())
}

/// Prints the outcome of a save.
///
/// # Errors
///
/// Fails when `out` cannot be written.
pub fn print_save_report(out: &mut impl Write, report: &SaveReport) -> io::Result<()> {
    for (collection, status) in report.statuses() {
        match status {
            SaveStatus::Saved { records } => writeln!(out, "Saved {records} {collection}.")?,
            SaveStatus::Skipped => {}
            SaveStatus::Failed(err) => writeln!(out, "Unable to save {collection}: {err}")?,
        }
    }
    Ok(())
}
