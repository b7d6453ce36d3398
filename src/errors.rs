//! Input error types with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code for documentation lookup:
//!
//! - E001: `WrongLetterCount` (Roll does not contain exactly 12 letters)
//! - E002: `NonAlphabetic` (Input contains a non-letter character)
//! - E003: `InvalidMinWordLength` (Minimum word length below 1)
//!
//! These are *user* errors: they are rejected at the boundary and never reach
//! the search engine. Internal invariant violations (a grid cell holding two
//! contradictory letters, a ledger count going negative) are a different
//! category — see [`crate::solver::SolverError`].

use std::io;

/// Rejected user input: wrong shape of a roll or configuration.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("expected exactly {expected} letters, got {actual}")]
    WrongLetterCount { expected: usize, actual: usize },

    #[error("input must contain only letters, found '{invalid_char}'")]
    NonAlphabetic { invalid_char: char },

    #[error("minimum word length must be at least 1, got {given}")]
    InvalidMinWordLength { given: usize },
}

impl From<InputError> for io::Error {
    fn from(ie: InputError) -> Self {
        // String version is the least fragile (no Send/Sync bounds issues)
        io::Error::new(io::ErrorKind::InvalidInput, ie.to_string())
    }
}

impl InputError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            InputError::WrongLetterCount { .. } => "E001",
            InputError::NonAlphabetic { .. } => "E002",
            InputError::InvalidMinWordLength { .. } => "E003",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            InputError::WrongLetterCount { .. } => {
                Some("A Q-Less roll is 12 letters, one per die (e.g. 'tmnbrdeaioly')")
            }
            InputError::NonAlphabetic { .. } => {
                Some("Only the letters a-z (upper or lower case) are allowed")
            }
            InputError::InvalidMinWordLength { .. } => {
                Some("Use a minimum word length of 1 or more (the game default is 3)")
            }
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
