//! Row structure and primary key allocation for Trigger tables.

use crate::schema::Schema;
use crate::value::Value;
use alloc::rc::Rc;
use alloc::vec::Vec;

/// Engine-assigned primary key of a table row.
pub type RowPk = u64;

/// Sentinel pk carried by a candidate row that has not been committed yet
/// (e.g. the row handed to a before-insert trigger).
pub const PENDING_ROW_PK: RowPk = u64::MAX;

/// Issues strictly increasing primary keys for one table.
///
/// Keys start at 1 and are never reused, even after the owning row is
/// deleted. A vetoed insert does not consume a key.
#[derive(Debug)]
pub struct KeyAllocator {
    next: RowPk,
}

impl Default for KeyAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyAllocator {
    /// Creates an allocator whose first issued key is 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issues the next primary key.
    pub fn allocate(&mut self) -> RowPk {
        let pk = self.next;
        self.next += 1;
        pk
    }

    /// Returns the key the next allocation would issue.
    #[inline]
    pub fn peek(&self) -> RowPk {
        self.next
    }
}

/// A row in a table: a primary key plus one value per schema column.
#[derive(Clone, Debug)]
pub struct Row {
    pk: RowPk,
    schema: Rc<Schema>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row with the given pk and values.
    ///
    /// `values` must have one entry per schema column.
    pub fn new(pk: RowPk, schema: Rc<Schema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), schema.len());
        Self { pk, schema, values }
    }

    /// Creates an uncommitted candidate row carrying `PENDING_ROW_PK`.
    pub fn pending(schema: Rc<Schema>, values: Vec<Value>) -> Self {
        Self::new(PENDING_ROW_PK, schema, values)
    }

    /// Builds an uncommitted candidate row from `(column, value)` pairs.
    ///
    /// Pairs naming columns outside the schema are ignored; schema columns
    /// with no pair default to `Value::Null`.
    pub fn pending_from_pairs(schema: Rc<Schema>, pairs: &[(&str, Value)]) -> Self {
        let mut values = alloc::vec![Value::Null; schema.len()];
        for (column, value) in pairs {
            if let Some(index) = schema.index_of(column) {
                values[index] = value.clone();
            }
        }
        Self::pending(schema, values)
    }

    /// Returns the primary key.
    #[inline]
    pub fn pk(&self) -> RowPk {
        self.pk
    }

    /// Returns true if this row has not been committed yet.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pk == PENDING_ROW_PK
    }

    /// Returns this row rekeyed with a committed pk.
    pub fn with_pk(mut self, pk: RowPk) -> Self {
        self.pk = pk;
        self
    }

    /// Returns the schema this row belongs to.
    #[inline]
    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// Returns the values in schema column order.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value by column name, or None for unknown columns.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.schema
            .index_of(column)
            .and_then(|index| self.values.get(index))
    }

    /// Sets a value by column name. Returns false for unknown columns.
    pub fn set(&mut self, column: &str, value: Value) -> bool {
        match self.schema.index_of(column) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.pk == other.pk && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn schema() -> Rc<Schema> {
        Rc::new(Schema::new("cats", &["name", "age"]).unwrap())
    }

    #[test]
    fn test_allocator_monotonic() {
        let mut alloc = KeyAllocator::new();
        assert_eq!(alloc.allocate(), 1);
        assert_eq!(alloc.allocate(), 2);
        assert_eq!(alloc.peek(), 3);
    }

    #[test]
    fn test_row_get_set() {
        let mut row = Row::new(
            1,
            schema(),
            vec![Value::String("Cleo".into()), Value::Int64(7)],
        );
        assert_eq!(row.pk(), 1);
        assert_eq!(row.get("name"), Some(&Value::String("Cleo".into())));
        assert_eq!(row.get("color"), None);

        assert!(row.set("age", Value::Int64(8)));
        assert_eq!(row.get("age"), Some(&Value::Int64(8)));
        assert!(!row.set("color", Value::Null));
    }

    #[test]
    fn test_row_pending_from_pairs() {
        let row = Row::pending_from_pairs(
            schema(),
            &[("age", Value::Int64(7)), ("color", Value::String("grey".into()))],
        );
        assert!(row.is_pending());
        // unknown column ignored, missing column defaults to null
        assert_eq!(row.get("age"), Some(&Value::Int64(7)));
        assert_eq!(row.get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_row_with_pk() {
        let row = Row::pending(schema(), vec![Value::Null, Value::Null]).with_pk(5);
        assert_eq!(row.pk(), 5);
        assert!(!row.is_pending());
    }

    #[test]
    fn test_row_equality() {
        let a = Row::new(1, schema(), vec![Value::Int64(1), Value::Int64(2)]);
        let b = Row::new(1, schema(), vec![Value::Int64(1), Value::Int64(2)]);
        let c = Row::new(2, schema(), vec![Value::Int64(1), Value::Int64(2)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
