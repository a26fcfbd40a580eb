//! Column schema for Trigger tables.
//!
//! A table's column set is fixed at creation time. The engine-assigned
//! primary key column `_pk` is implicit and may not be declared by the
//! caller.

use crate::error::{Error, Result};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Name of the implicit, engine-assigned primary key column.
pub const PK_COLUMN: &str = "_pk";

/// A fixed, ordered set of column names shared by every row of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    name: String,
    columns: Vec<String>,
}

impl Schema {
    /// Creates a schema from a table name and column list.
    ///
    /// Rejects empty column lists, duplicate columns, and any attempt to
    /// declare the reserved `_pk` column.
    pub fn new(name: &str, columns: &[&str]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::empty_schema(name));
        }
        let mut out: Vec<String> = Vec::with_capacity(columns.len());
        for col in columns {
            if *col == PK_COLUMN {
                return Err(Error::reserved_column(name, *col));
            }
            if out.iter().any(|c| c == col) {
                return Err(Error::duplicate_column(name, *col));
            }
            out.push(col.to_string());
        }
        Ok(Self {
            name: name.to_string(),
            columns: out,
        })
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared columns in declaration order (excluding `_pk`).
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of declared columns (excluding `_pk`).
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema declares no columns.
    ///
    /// Construction rejects empty schemas, so this is always false for a
    /// schema obtained through `Schema::new`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolves a column name to its value slot, or None if unknown.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Returns true if the schema declares the column.
    pub fn contains(&self, column: &str) -> bool {
        self.index_of(column).is_some()
    }

    /// Returns every column name including `_pk`, alphabetically sorted.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.columns.clone();
        names.push(PK_COLUMN.to_string());
        names.sort();
        names
    }
}
