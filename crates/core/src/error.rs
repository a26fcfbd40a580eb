//! Error types for the Trigger store.
//!
//! Only construction-time misuse surfaces as an error. Runtime mutation
//! and lookup misuse is expressed through return values (`Option`, `bool`,
//! counts), never through `Err` or a panic.

use alloc::string::String;
use core::fmt;

/// Result type alias for Trigger operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for store construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A declared column uses a reserved name (`_pk`).
    ReservedColumn { table: String, column: String },
    /// The same column was declared twice.
    DuplicateColumn { table: String, column: String },
    /// A table was declared with no columns.
    EmptySchema { table: String },
    /// Seed columns of a pre-seeded table have unequal lengths.
    SeedLengthMismatch {
        table: String,
        column: String,
        expected: usize,
        got: usize,
    },
    /// Two store entries share a name.
    DuplicateEntry { name: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReservedColumn { table, column } => {
                write!(f, "Column {} in table {} is reserved", column, table)
            }
            Error::DuplicateColumn { table, column } => {
                write!(f, "Column {} declared twice in table {}", column, table)
            }
            Error::EmptySchema { table } => {
                write!(f, "Table {} declares no columns", table)
            }
            Error::SeedLengthMismatch {
                table,
                column,
                expected,
                got,
            } => write!(
                f,
                "Seed column {} in table {} has {} values, expected {}",
                column, table, got, expected
            ),
            Error::DuplicateEntry { name } => {
                write!(f, "Store entry name {} used twice", name)
            }
        }
    }
}

impl Error {
    /// Creates a reserved column error.
    pub fn reserved_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ReservedColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a duplicate column error.
    pub fn duplicate_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::DuplicateColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates an empty schema error.
    pub fn empty_schema(table: impl Into<String>) -> Self {
        Error::EmptySchema {
            table: table.into(),
        }
    }

    /// Creates a seed length mismatch error.
    pub fn seed_length_mismatch(
        table: impl Into<String>,
        column: impl Into<String>,
        expected: usize,
        got: usize,
    ) -> Self {
        Error::SeedLengthMismatch {
            table: table.into(),
            column: column.into(),
            expected,
            got,
        }
    }

    /// Creates a duplicate store entry error.
    pub fn duplicate_entry(name: impl Into<String>) -> Self {
        Error::DuplicateEntry { name: name.into() }
    }
}
