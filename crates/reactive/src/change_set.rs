//! Change set describing the committed effect of one table operation.
//!
//! A `ChangeSet` carries the rows touched by one mutation (or one batch of
//! mutations), split into inserted, updated, and deleted categories. It is
//! what the dispatcher matches subscriptions against and what refresh
//! callbacks receive.

use crate::event::{EventKind, EventSet};
use alloc::vec::Vec;
use trigger_core::{Row, RowPk};

/// The committed effect of one table operation.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    /// Rows that were inserted.
    pub inserted: Vec<Row>,
    /// Rows that were updated (previous, new).
    pub updated: Vec<(Row, Row)>,
    /// Rows that were deleted.
    pub deleted: Vec<Row>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change set for a single inserted row.
    pub fn inserted_row(row: Row) -> Self {
        let mut changes = Self::new();
        changes.inserted.push(row);
        changes
    }

    /// Change set for a single updated row.
    pub fn updated_row(previous: Row, new: Row) -> Self {
        let mut changes = Self::new();
        changes.updated.push((previous, new));
        changes
    }

    /// Change set for a single deleted row.
    pub fn deleted_row(row: Row) -> Self {
        let mut changes = Self::new();
        changes.deleted.push(row);
        changes
    }

    /// Returns true if there are no changes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Returns the total number of changed rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }

    /// Merges another change set into this one.
    pub fn merge(&mut self, other: ChangeSet) {
        self.inserted.extend(other.inserted);
        self.updated.extend(other.updated);
        self.deleted.extend(other.deleted);
    }

    /// Records an inserted row.
    #[inline]
    pub fn record_insert(&mut self, row: Row) {
        self.inserted.push(row);
    }

    /// Records an updated row pair.
    #[inline]
    pub fn record_update(&mut self, previous: Row, new: Row) {
        self.updated.push((previous, new));
    }

    /// Records a deleted row.
    #[inline]
    pub fn record_delete(&mut self, row: Row) {
        self.deleted.push(row);
    }

    /// Returns the event kinds present in this change set.
    pub fn kinds(&self) -> EventSet {
        let mut kinds = EventSet::none();
        if !self.inserted.is_empty() {
            kinds = kinds.with(EventKind::RowInsert);
        }
        if !self.updated.is_empty() {
            kinds = kinds.with(EventKind::RowUpdate);
        }
        if !self.deleted.is_empty() {
            kinds = kinds.with(EventKind::RowDelete);
        }
        kinds
    }

    /// Returns true if any change touches the given pk, gated by the
    /// interest set.
    pub fn touches(&self, pk: RowPk, events: EventSet) -> bool {
        (events.contains(EventKind::RowInsert) && self.inserted.iter().any(|r| r.pk() == pk))
            || (events.contains(EventKind::RowUpdate)
                && self.updated.iter().any(|(_, new)| new.pk() == pk))
            || (events.contains(EventKind::RowDelete)
                && self.deleted.iter().any(|r| r.pk() == pk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use trigger_core::{Schema, Value};

    fn make_row(pk: RowPk, age: i64) -> Row {
        let schema = Rc::new(Schema::new("cats", &["age"]).unwrap());
        Row::new(pk, schema, vec![Value::Int64(age)])
    }

    #[test]
    fn test_change_set_new() {
        let changes = ChangeSet::new();
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
        assert!(changes.kinds().is_empty());
    }

    #[test]
    fn test_change_set_kinds() {
        let mut changes = ChangeSet::inserted_row(make_row(1, 7));
        assert!(changes.kinds().contains(EventKind::RowInsert));
        assert!(!changes.kinds().contains(EventKind::RowDelete));

        changes.record_delete(make_row(2, 6));
        assert!(changes.kinds().contains(EventKind::RowDelete));
    }

    #[test]
    fn test_change_set_merge() {
        let mut a = ChangeSet::inserted_row(make_row(1, 7));
        let mut b = ChangeSet::new();
        b.record_insert(make_row(2, 6));
        b.record_update(make_row(3, 5), make_row(3, 9));

        a.merge(b);
        assert_eq!(a.inserted.len(), 2);
        assert_eq!(a.updated.len(), 1);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_change_set_touches() {
        let changes = ChangeSet::updated_row(make_row(4, 5), make_row(4, 6));
        assert!(changes.touches(4, EventSet::all()));
        assert!(!changes.touches(5, EventSet::all()));
        assert!(!changes.touches(4, EventSet::only(&[EventKind::RowDelete])));
    }
}
