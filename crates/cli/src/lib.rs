//! shelfkeep CLI -- interactive record keeping for a small library.

use std::path::PathBuf;

use clap::Parser;
use shelfkeep_core::config::{ASSIGNMENTS_FILE, BOOKS_FILE, USERS_FILE};
use shelfkeep_core::StoreConfig;

pub mod input;
pub mod menu;
pub mod shell;

pub use input::{Editor, LineSource, ReadError};
pub use menu::MenuChoice;
pub use shell::{Outcome, Shell};

#[derive(Debug, Parser)]
#[command(
    name = "shelfkeep",
    about = "Keep track of books, members and loans"
)]
pub struct App {
    /// Directory holding the books, users and assignments files
    #[arg(long, env = "SHELFKEEP_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
    /// File name of the book catalogue inside the data directory
    #[arg(long, default_value = BOOKS_FILE)]
    pub books_file: String,
    /// File name of the user registry inside the data directory
    #[arg(long, default_value = USERS_FILE)]
    pub users_file: String,
    /// File name of the loan table inside the data directory
    #[arg(long, default_value = ASSIGNMENTS_FILE)]
    pub assignments_file: String,
    /// Log filter such as `debug` or `shelfkeep_core=trace` (default: $RUST_LOG, then `warn`)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl App {
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::builder()
            .data_dir(self.data_dir.clone())
            .books_file(self.books_file.clone())
            .users_file(self.users_file.clone())
            .assignments_file(self.assignments_file.clone())
            .build()
    }
}
