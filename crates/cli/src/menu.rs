use std::fmt::{Display, Formatter, Result};
use std::str::FromStr;

/// The numbered commands of the main menu.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook = 1,
    UpdateBook,
    DeleteBook,
    ListBooks,
    SearchBooks,
    AddUser,
    UpdateUser,
    DeleteUser,
    ListUsers,
    SearchUsers,
    CheckOut,
    CheckIn,
    TrackAvailability,
    Exit,
    VerifyUser,
    Save,
}

impl MenuChoice {
    pub const ALL: [Self; 16] = [
        Self::AddBook,
        Self::UpdateBook,
        Self::DeleteBook,
        Self::ListBooks,
        Self::SearchBooks,
        Self::AddUser,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::ListUsers,
        Self::SearchUsers,
        Self::CheckOut,
        Self::CheckIn,
        Self::TrackAvailability,
        Self::Exit,
        Self::VerifyUser,
        Self::Save,
    ];

    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddBook => "Add book",
            Self::UpdateBook => "Update book",
            Self::DeleteBook => "Delete book",
            Self::ListBooks => "List books",
            Self::SearchBooks => "Search books",
            Self::AddUser => "Add user",
            Self::UpdateUser => "Update user password",
            Self::DeleteUser => "Delete user",
            Self::ListUsers => "List users",
            Self::SearchUsers => "Search users",
            Self::CheckOut => "Check out book",
            Self::CheckIn => "Check in book",
            Self::TrackAvailability => "Track availability",
            Self::Exit => "Exit",
            Self::VerifyUser => "Verify user",
            Self::Save => "Save now",
        }
    }
}

impl Display for MenuChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// Input that names no menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidChoice(pub String);

impl Display for InvalidChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "Invalid input '{}'. Please choose a valid option.", self.0)
    }
}

impl std::error::Error for InvalidChoice {}

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(input: &str) -> core::result::Result<Self, InvalidChoice> {
        let trimmed = input.trim();
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(|number| Self::ALL.into_iter().find(|choice| choice.number() == number))
            .ok_or_else(|| InvalidChoice(trimmed.to_owned()))
    }
}
