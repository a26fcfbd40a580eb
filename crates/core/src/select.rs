//! Row selection for Trigger tables.
//!
//! A `Where` is the polymorphic row selector accepted by every lookup and
//! mutation method: an exact primary key, a partial-object equality match,
//! or an arbitrary predicate. It is an explicit tagged union rather than a
//! dynamically-inspected argument, so dispatch is structural.

use crate::row::{Row, RowPk};
use crate::value::Value;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// Polymorphic row selector.
pub enum Where {
    /// Exact `_pk` lookup.
    Key(RowPk),
    /// Matches rows where every named column is strictly equal to the
    /// given value. A column unknown to the schema makes the row a
    /// non-match; an empty list matches every row.
    Fields(Vec<(String, Value)>),
    /// Arbitrary predicate, evaluated per row in iteration order.
    Predicate(Box<dyn Fn(&Row) -> bool>),
}

impl Where {
    /// Selector for an exact primary key.
    pub fn key(pk: RowPk) -> Self {
        Where::Key(pk)
    }

    /// Selector matching on equality of the given columns.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Where::Fields(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Selector from a predicate function.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Row) -> bool + 'static,
    {
        Where::Predicate(Box::new(f))
    }

    /// Evaluates this selector against a row.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Where::Key(pk) => row.pk() == *pk,
            Where::Fields(fields) => fields
                .iter()
                .all(|(column, value)| row.get(column) == Some(value)),
            Where::Predicate(f) => f(row),
        }
    }
}

impl core::fmt::Debug for Where {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Where::Key(pk) => f.debug_tuple("Key").field(pk).finish(),
            Where::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Where::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<RowPk> for Where {
    fn from(pk: RowPk) -> Self {
        Where::Key(pk)
    }
}

impl From<Vec<(String, Value)>> for Where {
    fn from(fields: Vec<(String, Value)>) -> Self {
        Where::Fields(fields)
    }
}
