use std::fmt::{Display, Formatter, Result};
use std::io;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Why no line could be read.
#[derive(Debug)]
pub enum ReadError {
    /// Ctrl-C.
    Interrupted,
    /// Ctrl-D or the end of piped input.
    Eof,
    Io(io::Error),
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::Eof => write!(f, "end of input"),
            Self::Io(err) => write!(f, "cannot read input: {err}"),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<ReadlineError> for ReadError {
    fn from(err: ReadlineError) -> Self {
        match err {
            ReadlineError::Interrupted => Self::Interrupted,
            ReadlineError::Eof => Self::Eof,
            ReadlineError::Io(err) => Self::Io(err),
            other => Self::Io(io::Error::other(other.to_string())),
        }
    }
}

/// Where the shell gets its lines from.
pub trait LineSource {
    /// Shows `prompt` and returns the next line without its line ending.
    ///
    /// # Errors
    ///
    /// See [`ReadError`].
    fn read_line(&mut self, prompt: &str) -> core::result::Result<String, ReadError>;
}

/// Terminal line editor.
pub struct Editor {
    inner: DefaultEditor,
}

impl Editor {
    /// # Errors
    ///
    /// Fails when the terminal cannot be set up.
    pub fn new() -> core::result::Result<Self, ReadError> {
        Ok(Self {
            inner: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> core::result::Result<String, ReadError> {
        Ok(self.inner.readline(prompt)?)
    }
}
