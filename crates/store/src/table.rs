//! Tables: schemaful row collections with triggers and subscriptions.
//!
//! A `Table` composes the row store (a `BTreeMap` keyed by pk, whose key
//! order doubles as insertion order because pks only increase), the
//! per-table key allocator, six trigger slots, and a notification
//! dispatcher.
//!
//! All methods take `&self`; the table is interior-mutable and re-entrant.
//! Every `RefCell` borrow is released before a trigger or refresh callback
//! runs, so a hook on table A may mutate table B or A itself. Cycle
//! detection is the caller's responsibility.
//!
//! Notification policy: row-scoped subscribers are refreshed immediately,
//! per mutated row, regardless of batching; table-scoped subscribers are
//! refreshed once per batch when `batch_notify` is true, once per row
//! otherwise.

use crate::hooks::{
    AfterDeleteFn, AfterInsertFn, AfterUpdateFn, BeforeDeleteFn, BeforeInsertFn, BeforeUpdateFn,
    HookAction, HookSlot,
};
use alloc::collections::BTreeMap;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::Write as _;
use trigger_core::{Error, KeyAllocator, Result, Row, RowPk, Schema, Value, Where, PK_COLUMN};
use trigger_reactive::{ChangeSet, Dispatcher, EventSet, Scope, SubscriptionId};

/// Default row cap for `render`.
const RENDER_LIMIT: usize = 50;

/// The column changes applied by an update: either a literal patch or a
/// function of the current row producing one.
pub enum SetValue {
    /// Column/value pairs to merge into the row.
    Patch(Vec<(String, Value)>),
    /// Computes the pairs from the current row.
    With(Box<dyn Fn(&Row) -> Vec<(String, Value)>>),
}

impl SetValue {
    /// A literal patch.
    pub fn patch<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        SetValue::Patch(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// A patch computed from the current row.
    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&Row) -> Vec<(String, Value)> + 'static,
    {
        SetValue::With(Box::new(f))
    }

    fn resolve(&self, current: &Row) -> Vec<(String, Value)> {
        match self {
            SetValue::Patch(pairs) => pairs.clone(),
            SetValue::With(f) => f(current),
        }
    }
}

#[derive(Default)]
struct TableHooks {
    before_insert: HookSlot<BeforeInsertFn>,
    after_insert: HookSlot<AfterInsertFn>,
    before_update: HookSlot<BeforeUpdateFn>,
    after_update: HookSlot<AfterUpdateFn>,
    before_delete: HookSlot<BeforeDeleteFn>,
    after_delete: HookSlot<AfterDeleteFn>,
}

/// An in-memory collection of rows sharing a fixed column schema and an
/// engine-assigned primary key.
pub struct Table {
    schema: Rc<Schema>,
    rows: RefCell<BTreeMap<RowPk, Row>>,
    allocator: RefCell<KeyAllocator>,
    hooks: TableHooks,
    dispatcher: Dispatcher,
}

impl core::fmt::Debug for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table").finish_non_exhaustive()
    }
}

impl Table {
    /// Creates an empty table from a column-name list.
    pub fn new(name: &str, columns: &[&str]) -> Result<Self> {
        Ok(Self::from_schema(Schema::new(name, columns)?))
    }

    /// Creates a pre-seeded table from a column-to-values mapping.
    ///
    /// Every column's value vector must have the same length; seed rows
    /// receive pks 1..=n in seed order. Seeding runs before any trigger
    /// can be attached, so no hooks or notifications fire.
    pub fn seeded(name: &str, seed: &[(&str, Vec<Value>)]) -> Result<Self> {
        let columns: Vec<&str> = seed.iter().map(|(column, _)| *column).collect();
        let schema = Schema::new(name, &columns)?;

        let expected = seed.first().map(|(_, values)| values.len()).unwrap_or(0);
        for (column, values) in seed {
            if values.len() != expected {
                return Err(Error::seed_length_mismatch(
                    name,
                    *column,
                    expected,
                    values.len(),
                ));
            }
        }

        let table = Self::from_schema(schema);
        for i in 0..expected {
            let values: Vec<Value> = seed.iter().map(|(_, column)| column[i].clone()).collect();
            let pk = table.allocator.borrow_mut().allocate();
            let row = Row::new(pk, table.schema.clone(), values);
            table.rows.borrow_mut().insert(pk, row);
        }
        Ok(table)
    }

    fn from_schema(schema: Schema) -> Self {
        Self {
            schema: Rc::new(schema),
            rows: RefCell::new(BTreeMap::new()),
            allocator: RefCell::new(KeyAllocator::new()),
            hooks: TableHooks::default(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the table schema.
    pub fn schema(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// Returns every column name including `_pk`, alphabetically sorted.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    /// Returns the number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.dispatcher.len()
    }

    // ---------------------------------------------------------------
    // Inserts
    // ---------------------------------------------------------------

    /// Inserts a row built from `(column, value)` pairs.
    ///
    /// Runs the before-insert trigger (veto returns `None`, a transformed
    /// row wins over the submitted one), allocates the next pk, appends,
    /// runs the after-insert trigger, and notifies table-scoped
    /// subscribers. Pairs naming unknown columns are ignored; missing
    /// columns default to `Value::Null`.
    pub fn insert_row(&self, values: &[(&str, Value)]) -> Option<Row> {
        let row = self.insert_one(values)?;
        self.dispatcher
            .notify_tables(&ChangeSet::inserted_row(row.clone()));
        Some(row)
    }

    /// Inserts multiple rows with `insert_row` semantics per element.
    ///
    /// Vetoed rows are omitted from the result. Table-scoped subscribers
    /// are notified once for the whole batch when `batch_notify` is true,
    /// once per inserted row otherwise. Triggers fire per row either way.
    pub fn insert_rows(&self, rows: &[Vec<(&str, Value)>], batch_notify: bool) -> Vec<Row> {
        let mut inserted = Vec::new();
        let mut batch = ChangeSet::new();
        for pairs in rows {
            if let Some(row) = self.insert_one(pairs) {
                if batch_notify {
                    batch.record_insert(row.clone());
                } else {
                    self.dispatcher
                        .notify_tables(&ChangeSet::inserted_row(row.clone()));
                }
                inserted.push(row);
            }
        }
        if batch_notify {
            self.dispatcher.notify_tables(&batch);
        }
        inserted
    }

    fn insert_one(&self, values: &[(&str, Value)]) -> Option<Row> {
        let candidate = Row::pending_from_pairs(self.schema.clone(), values);
        let candidate = match self.hooks.before_insert.get() {
            None => candidate,
            Some(hook) => match hook(candidate.clone()) {
                HookAction::Proceed => candidate,
                HookAction::Abort => return None,
                HookAction::Transform(row) => self.conform(row),
            },
        };

        // pk allocation happens only once the before-hook has committed to
        // proceeding, so a veto consumes no pk
        let pk = self.allocator.borrow_mut().allocate();
        let row = candidate.with_pk(pk);
        self.rows.borrow_mut().insert(pk, row.clone());

        if let Some(hook) = self.hooks.after_insert.get() {
            hook(&row);
        }

        self.dispatcher
            .notify_row(pk, &ChangeSet::inserted_row(row.clone()));
        Some(row)
    }

    /// Rebuilds a hook-supplied row against this table's schema.
    fn conform(&self, row: Row) -> Row {
        let values: Vec<Value> = self
            .schema
            .columns()
            .iter()
            .map(|column| row.get(column).cloned().unwrap_or(Value::Null))
            .collect();
        Row::pending(self.schema.clone(), values)
    }

    // ---------------------------------------------------------------
    // Lookups (no notification side effects)
    // ---------------------------------------------------------------

    /// Returns the first row matching the selector, in insertion order.
    pub fn get_row(&self, selector: Where) -> Option<Row> {
        if let Where::Key(pk) = selector {
            return self.rows.borrow().get(&pk).cloned();
        }
        self.snapshot()
            .into_iter()
            .find(|row| selector.matches(row))
    }

    /// Returns every matching row; `None` selects all rows.
    pub fn get_rows(&self, selector: Option<Where>) -> Vec<Row> {
        self.select(selector.as_ref())
    }

    /// Returns the number of matching rows; `None` counts all rows.
    pub fn get_row_count(&self, selector: Option<Where>) -> usize {
        match selector {
            None => self.rows.borrow().len(),
            Some(selector) => self.select(Some(&selector)).len(),
        }
    }

    fn select(&self, selector: Option<&Where>) -> Vec<Row> {
        let snapshot = self.snapshot();
        match selector {
            None => snapshot,
            Some(selector) => snapshot
                .into_iter()
                .filter(|row| selector.matches(row))
                .collect(),
        }
    }

    /// Clones the rows so predicates and callbacks run without any borrow
    /// of the row store held.
    fn snapshot(&self) -> Vec<Row> {
        self.rows.borrow().values().cloned().collect()
    }

    // ---------------------------------------------------------------
    // Updates
    // ---------------------------------------------------------------

    /// Updates the row with the given pk.
    ///
    /// Runs the before-update trigger with (current, proposed merged row);
    /// a veto returns `None`; a transformed row wins. `_pk` is always
    /// preserved. Runs the after-update trigger with (previous, new), then
    /// notifies row-scoped and table-scoped subscribers.
    pub fn update_row(&self, pk: RowPk, set: SetValue) -> Option<Row> {
        let (previous, new) = self.update_one(pk, &set)?;
        self.dispatcher
            .notify_tables(&ChangeSet::updated_row(previous, new.clone()));
        Some(new)
    }

    /// Updates every matching row; `None` selects all rows.
    ///
    /// Table-scoped subscribers are notified once per batch when
    /// `batch_notify` is true, once per row otherwise; row-scoped
    /// subscribers are always refreshed immediately per row.
    pub fn update_rows(
        &self,
        set: SetValue,
        selector: Option<Where>,
        batch_notify: bool,
    ) -> Vec<Row> {
        let targets: Vec<RowPk> = self.select(selector.as_ref()).iter().map(Row::pk).collect();

        let mut updated = Vec::new();
        let mut batch = ChangeSet::new();
        for pk in targets {
            if let Some((previous, new)) = self.update_one(pk, &set) {
                if batch_notify {
                    batch.record_update(previous, new.clone());
                } else {
                    self.dispatcher
                        .notify_tables(&ChangeSet::updated_row(previous, new.clone()));
                }
                updated.push(new);
            }
        }
        if batch_notify {
            self.dispatcher.notify_tables(&batch);
        }
        updated
    }

    fn update_one(&self, pk: RowPk, set: &SetValue) -> Option<(Row, Row)> {
        let current = self.rows.borrow().get(&pk).cloned()?;

        let patch = set.resolve(&current);
        let mut proposed = current.clone();
        for (column, value) in patch {
            // unknown columns are ignored, matching the "no match, no
            // error" posture of malformed selectors
            proposed.set(&column, value);
        }

        let new = match self.hooks.before_update.get() {
            None => proposed,
            Some(hook) => match hook(&current, proposed.clone()) {
                HookAction::Proceed => proposed,
                HookAction::Abort => return None,
                HookAction::Transform(row) => self.conform(row),
            },
        };
        let new = new.with_pk(pk);

        {
            let mut rows = self.rows.borrow_mut();
            // a re-entrant hook may have deleted the row meanwhile
            let slot = rows.get_mut(&pk)?;
            *slot = new.clone();
        }

        if let Some(hook) = self.hooks.after_update.get() {
            hook(&current, &new);
        }

        self.dispatcher
            .notify_row(pk, &ChangeSet::updated_row(current.clone(), new.clone()));
        Some((current, new))
    }

    // ---------------------------------------------------------------
    // Deletes
    // ---------------------------------------------------------------

    /// Deletes the first row matching the selector.
    ///
    /// Returns false if nothing matched or the before-delete trigger
    /// vetoed. Row-scoped subscribers on the deleted row fire immediately
    /// and are then torn down.
    pub fn delete_row(&self, selector: Where) -> bool {
        let target = match self.get_row(selector) {
            Some(row) => row.pk(),
            None => return false,
        };
        match self.delete_one(target) {
            Some(removed) => {
                self.dispatcher
                    .notify_tables(&ChangeSet::deleted_row(removed));
                true
            }
            None => false,
        }
    }

    /// Deletes every matching row and returns the deletion count; `None`
    /// selects all rows.
    pub fn delete_rows(&self, selector: Option<Where>, batch_notify: bool) -> usize {
        let targets: Vec<RowPk> = self.select(selector.as_ref()).iter().map(Row::pk).collect();

        let mut count = 0;
        let mut batch = ChangeSet::new();
        for pk in targets {
            if let Some(removed) = self.delete_one(pk) {
                if batch_notify {
                    batch.record_delete(removed);
                } else {
                    self.dispatcher
                        .notify_tables(&ChangeSet::deleted_row(removed));
                }
                count += 1;
            }
        }
        if batch_notify {
            self.dispatcher.notify_tables(&batch);
        }
        count
    }

    fn delete_one(&self, pk: RowPk) -> Option<Row> {
        let row = self.rows.borrow().get(&pk).cloned()?;

        if let Some(hook) = self.hooks.before_delete.get() {
            if !hook(&row) {
                return None;
            }
        }

        // a re-entrant hook may have deleted the row already
        let removed = self.rows.borrow_mut().remove(&pk)?;

        if let Some(hook) = self.hooks.after_delete.get() {
            hook(&removed);
        }

        let changes = ChangeSet::deleted_row(removed.clone());
        self.dispatcher.notify_row(pk, &changes);
        self.dispatcher.remove_row_subscriptions(pk);
        Some(removed)
    }

    // ---------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------

    /// Returns the current matching rows and registers a live
    /// subscription scoped to the table (optionally filtered).
    ///
    /// The callback runs on every committed mutation whose kind is in
    /// `events` and whose rows satisfy the filter before or after the
    /// mutation. Teardown via `unsubscribe` is the caller's
    /// responsibility.
    pub fn use_rows<F>(
        &self,
        selector: Option<Where>,
        events: EventSet,
        callback: F,
    ) -> (Vec<Row>, SubscriptionId)
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let current = self.select(selector.as_ref());
        let scope = match selector {
            None => Scope::All,
            Some(filter) => Scope::Filtered(filter),
        };
        let id = self.dispatcher.subscribe(scope, events, callback);
        (current, id)
    }

    /// Returns the row with the given pk and registers a live
    /// subscription scoped to it.
    ///
    /// The subscription fires immediately on every qualifying mutation of
    /// that row (batching never defers it) and is torn down automatically
    /// when the row is deleted.
    pub fn use_row<F>(
        &self,
        pk: RowPk,
        events: EventSet,
        callback: F,
    ) -> (Option<Row>, SubscriptionId)
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let current = self.rows.borrow().get(&pk).cloned();
        let id = self.dispatcher.subscribe(Scope::Row(pk), events, callback);
        (current, id)
    }

    /// Removes a subscription. Returns true if it existed. Safe to call
    /// from inside a refresh callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    // ---------------------------------------------------------------
    // Triggers (one slot per kind; attaching again replaces)
    // ---------------------------------------------------------------

    /// Attaches the before-insert trigger, replacing any previous one.
    pub fn on_before_insert<F>(&self, hook: F)
    where
        F: Fn(Row) -> HookAction + 'static,
    {
        self.hooks.before_insert.set(Rc::new(hook));
    }

    /// Attaches the after-insert trigger, replacing any previous one.
    pub fn on_after_insert<F>(&self, hook: F)
    where
        F: Fn(&Row) + 'static,
    {
        self.hooks.after_insert.set(Rc::new(hook));
    }

    /// Attaches the before-update trigger, replacing any previous one.
    pub fn on_before_update<F>(&self, hook: F)
    where
        F: Fn(&Row, Row) -> HookAction + 'static,
    {
        self.hooks.before_update.set(Rc::new(hook));
    }

    /// Attaches the after-update trigger, replacing any previous one.
    pub fn on_after_update<F>(&self, hook: F)
    where
        F: Fn(&Row, &Row) + 'static,
    {
        self.hooks.after_update.set(Rc::new(hook));
    }

    /// Attaches the before-delete trigger, replacing any previous one.
    pub fn on_before_delete<F>(&self, hook: F)
    where
        F: Fn(&Row) -> bool + 'static,
    {
        self.hooks.before_delete.set(Rc::new(hook));
    }

    /// Attaches the after-delete trigger, replacing any previous one.
    pub fn on_after_delete<F>(&self, hook: F)
    where
        F: Fn(&Row) + 'static,
    {
        self.hooks.after_delete.set(Rc::new(hook));
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    /// Renders the matching rows as a text table, capped at `limit` rows
    /// (50 by default).
    pub fn render(&self, selector: Option<Where>, limit: Option<usize>) -> String {
        let rows = self.select(selector.as_ref());
        let limit = limit.unwrap_or(RENDER_LIMIT);
        let columns = self.column_names();

        let mut out = String::new();
        let _ = writeln!(out, "{} ({} rows)", self.name(), rows.len());
        let _ = writeln!(out, "{}", columns.join(" | "));
        for row in rows.iter().take(limit) {
            let mut line = String::new();
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    line.push_str(" | ");
                }
                if column == PK_COLUMN {
                    let _ = write!(line, "{}", row.pk());
                } else if let Some(value) = row.get(column) {
                    let _ = write!(line, "{}", value);
                }
            }
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use core::cell::Cell;

    fn cats() -> Table {
        Table::new("cats", &["name", "age"]).unwrap()
    }

    fn cat(name: &str, age: i64) -> Vec<(&str, Value)> {
        vec![("name", Value::from(name)), ("age", Value::from(age))]
    }

    #[test]
    fn test_insert_assigns_pks_from_one() {
        let table = cats();
        let row = table.insert_row(&cat("Cleo", 7)).unwrap();
        assert_eq!(row.pk(), 1);
        assert_eq!(row.get("name"), Some(&Value::String("Cleo".into())));

        let row = table.insert_row(&cat("PJ", 6)).unwrap();
        assert_eq!(row.pk(), 2);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_pk_never_reused_after_delete() {
        let table = cats();
        let first = table.insert_row(&cat("Cleo", 7)).unwrap();
        assert_eq!(first.pk(), 1);
        assert_eq!(table.get_row_count(None), 1);

        assert!(table.delete_row(Where::key(1)));
        assert!(table.get_row(Where::key(1)).is_none());

        let second = table.insert_row(&cat("PJ", 6)).unwrap();
        assert_eq!(second.pk(), 2);
    }

    #[test]
    fn test_seeded_table() {
        let table = Table::seeded(
            "owners",
            &[
                ("ownerId", vec![Value::from(1i64), Value::from(2i64)]),
                ("firstName", vec![Value::from("Ada"), Value::from("Alan")]),
            ],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        let row = table.get_row(Where::key(1)).unwrap();
        assert_eq!(row.get("firstName"), Some(&Value::String("Ada".into())));
        let row = table.get_row(Where::key(2)).unwrap();
        assert_eq!(row.get("firstName"), Some(&Value::String("Alan".into())));

        // seed pks consumed, next insert continues after them
        let row = table
            .insert_row(&[("ownerId", Value::from(3i64)), ("firstName", Value::from("Bill"))])
            .unwrap();
        assert_eq!(row.pk(), 3);
    }

    #[test]
    fn test_seeded_table_ragged_seed() {
        let err = Table::seeded(
            "owners",
            &[
                ("ownerId", vec![Value::from(1i64), Value::from(2i64)]),
                ("firstName", vec![Value::from("Ada")]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::SeedLengthMismatch { .. }));
    }

    #[test]
    fn test_get_row_polymorphic_equivalence() {
        let table = cats();
        table.insert_row(&cat("Cleo", 7)).unwrap();
        table.insert_row(&cat("PJ", 6)).unwrap();

        let by_key = table.get_row(Where::key(1)).unwrap();
        let by_fields = table
            .get_row(Where::fields([("name", Value::from("Cleo"))]))
            .unwrap();
        let by_pred = table
            .get_row(Where::predicate(|r| {
                r.get("name").and_then(Value::as_str) == Some("Cleo")
            }))
            .unwrap();

        assert_eq!(by_key, by_fields);
        assert_eq!(by_key, by_pred);
    }

    #[test]
    fn test_get_rows_and_count() {
        let table = cats();
        table.insert_rows(
            &[cat("Cleo", 7), cat("PJ", 6), cat("Pickles", 7)],
            true,
        );

        assert_eq!(table.get_rows(None).len(), 3);
        assert_eq!(
            table.get_row_count(Some(Where::fields([("age", Value::from(7i64))]))),
            2
        );
        assert_eq!(
            table.get_row_count(Some(Where::fields([("color", Value::from("grey"))]))),
            0
        );
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let table = cats();
        table.insert_row(&cat("Cleo", 7)).unwrap();
        table.insert_row(&cat("PJ", 6)).unwrap();
        table.insert_row(&cat("Pickles", 5)).unwrap();

        let names: Vec<_> = table
            .get_rows(None)
            .iter()
            .map(|r| r.get("name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Cleo", "PJ", "Pickles"]);
    }

    #[test]
    fn test_before_insert_veto() {
        let table = cats();
        table.on_before_insert(|row| {
            if row.get("age").and_then(Value::as_i64).unwrap_or(0) < 0 {
                HookAction::Abort
            } else {
                HookAction::Proceed
            }
        });

        assert!(table.insert_row(&cat("Ghost", -1)).is_none());
        assert_eq!(table.row_count(), 0);

        // a vetoed insert consumes no pk
        let row = table.insert_row(&cat("Cleo", 7)).unwrap();
        assert_eq!(row.pk(), 1);
    }

    #[test]
    fn test_before_insert_transform() {
        let table = cats();
        table.on_before_insert(|mut row| {
            let name = row.get("name").and_then(Value::as_str).unwrap_or("").to_lowercase();
            row.set("name", Value::from(name.as_str()));
            HookAction::Transform(row)
        });

        let row = table.insert_row(&cat("CLEO", 7)).unwrap();
        assert_eq!(row.get("name"), Some(&Value::String("cleo".into())));
        // the transformed value is what was persisted
        let stored = table.get_row(Where::key(row.pk())).unwrap();
        assert_eq!(stored.get("name"), Some(&Value::String("cleo".into())));
    }

    #[test]
    fn test_after_insert_cross_table() {
        let cats = Rc::new(cats());
        let cool = Rc::new(Table::new("coolCats", &["name"]).unwrap());

        let cool_ref = cool.clone();
        cats.on_after_insert(move |row| {
            if row.get("age").and_then(Value::as_i64).unwrap_or(0) > 6 {
                let _ = cool_ref
                    .insert_row(&[("name", row.get("name").cloned().unwrap_or(Value::Null))]);
            }
        });

        cats.insert_row(&cat("Cleo", 7)).unwrap();
        cats.insert_row(&cat("PJ", 6)).unwrap();
        assert_eq!(cool.row_count(), 1);
    }

    #[test]
    fn test_update_row_patch_and_fn() {
        let table = cats();
        let pk = table.insert_row(&cat("Cleo", 7)).unwrap().pk();

        let row = table
            .update_row(pk, SetValue::patch([("name", Value::from("Pickles"))]))
            .unwrap();
        assert_eq!(row.get("name"), Some(&Value::String("Pickles".into())));
        assert_eq!(row.get("age"), Some(&Value::Int64(7)));
        assert_eq!(row.pk(), pk);

        let row = table
            .update_row(
                pk,
                SetValue::with(|current| {
                    let age = current.get("age").and_then(Value::as_i64).unwrap_or(0);
                    vec![("age".into(), Value::from(age + 1))]
                }),
            )
            .unwrap();
        assert_eq!(row.get("age"), Some(&Value::Int64(8)));
    }

    #[test]
    fn test_update_missing_row() {
        let table = cats();
        assert!(table
            .update_row(99, SetValue::patch([("age", Value::from(1i64))]))
            .is_none());
    }

    #[test]
    fn test_before_update_veto() {
        let table = cats();
        let pk = table.insert_row(&cat("Cleo", 7)).unwrap().pk();
        table.on_before_update(|current, _proposed| {
            if current.get("name").and_then(Value::as_str) == Some("Cleo") {
                HookAction::Abort
            } else {
                HookAction::Proceed
            }
        });

        assert!(table
            .update_row(pk, SetValue::patch([("age", Value::from(9i64))]))
            .is_none());
        let row = table.get_row(Where::key(pk)).unwrap();
        assert_eq!(row.get("age"), Some(&Value::Int64(7)));
    }

    #[test]
    fn test_update_rows_with_selector() {
        let table = cats();
        table.insert_rows(&[cat("Cleo", 7), cat("PJ", 6), cat("PJ", 8)], true);

        let updated = table.update_rows(
            SetValue::patch([("name", Value::from("Old PJ"))]),
            Some(Where::fields([("name", Value::from("PJ"))])),
            true,
        );
        assert_eq!(updated.len(), 2);
        assert_eq!(
            table.get_row_count(Some(Where::fields([("name", Value::from("Old PJ"))]))),
            2
        );
    }

    #[test]
    fn test_delete_row_veto_scenario() {
        let table = cats();
        table.insert_row(&cat("Cleo", 7)).unwrap();
        table.on_before_delete(|row| row.get("name").and_then(Value::as_str) != Some("Cleo"));

        assert!(!table.delete_row(Where::fields([("name", Value::from("Cleo"))])));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_delete_rows_all() {
        let table = cats();
        table.insert_rows(&[cat("Cleo", 7), cat("PJ", 6)], true);
        assert_eq!(table.delete_rows(None, true), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_after_delete_fires_per_row() {
        let table = cats();
        table.insert_rows(&[cat("Cleo", 7), cat("PJ", 6)], true);

        let count = Rc::new(Cell::new(0));
        let probe = count.clone();
        table.on_after_delete(move |_| probe.set(probe.get() + 1));

        table.delete_rows(None, true);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_batch_notification_counts() {
        let table = cats();
        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        table.use_rows(None, EventSet::all(), move |_| probe.set(probe.get() + 1));

        table.insert_rows(&[cat("a", 1), cat("b", 2), cat("c", 3)], true);
        assert_eq!(hits.get(), 1);

        table.insert_rows(&[cat("d", 4), cat("e", 5), cat("f", 6)], false);
        assert_eq!(hits.get(), 4);
    }

    #[test]
    fn test_vetoed_rows_fire_no_notification() {
        let table = cats();
        table.on_before_insert(|_| HookAction::Abort);

        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        table.use_rows(None, EventSet::all(), move |_| probe.set(probe.get() + 1));

        table.insert_rows(&[cat("a", 1), cat("b", 2)], true);
        assert_eq!(hits.get(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_use_rows_event_mask() {
        let table = cats();
        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        table.use_rows(
            None,
            EventSet::only(&[trigger_reactive::EventKind::RowDelete]),
            move |_| probe.set(probe.get() + 1),
        );

        let pk = table.insert_row(&cat("Cleo", 7)).unwrap().pk();
        table
            .update_row(pk, SetValue::patch([("age", Value::from(8i64))]))
            .unwrap();
        assert_eq!(hits.get(), 0);

        table.delete_row(Where::key(pk));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_use_rows_filter_row_leaving_view() {
        let table = cats();
        table.insert_rows(&[cat("Cleo", 9), cat("PJ", 5)], true);

        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        let (initial, _id) = table.use_rows(
            Some(Where::predicate(|r| {
                r.get("age").and_then(Value::as_i64).unwrap_or(0) > 7
            })),
            EventSet::all(),
            move |_| probe.set(probe.get() + 1),
        );
        assert_eq!(initial.len(), 1);

        // row moves out of the filtered view; the view must refresh
        table
            .update_row(1, SetValue::patch([("age", Value::from(2i64))]))
            .unwrap();
        assert_eq!(hits.get(), 1);

        // row moves into the view
        table
            .update_row(2, SetValue::patch([("age", Value::from(9i64))]))
            .unwrap();
        assert_eq!(hits.get(), 2);

        // irrelevant update
        table
            .update_row(1, SetValue::patch([("age", Value::from(3i64))]))
            .unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_use_row_immediate_on_delete_and_teardown() {
        let table = cats();
        let pk = table.insert_row(&cat("Cleo", 7)).unwrap().pk();

        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        let (current, _id) = table.use_row(pk, EventSet::all(), move |_| {
            probe.set(probe.get() + 1)
        });
        assert!(current.is_some());
        assert_eq!(table.subscription_count(), 1);

        // batched delete still refreshes the row subscriber immediately
        table.delete_rows(None, true);
        assert_eq!(hits.get(), 1);
        // and tears it down
        assert_eq!(table.subscription_count(), 0);
    }

    #[test]
    fn test_unsubscribe_stops_refresh() {
        let table = cats();
        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        let (_, id) = table.use_rows(None, EventSet::all(), move |_| probe.set(probe.get() + 1));

        table.insert_row(&cat("Cleo", 7));
        assert_eq!(hits.get(), 1);

        assert!(table.unsubscribe(id));
        table.insert_row(&cat("PJ", 6));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_lookups_cause_no_notifications() {
        let table = cats();
        table.insert_row(&cat("Cleo", 7)).unwrap();

        let hits = Rc::new(Cell::new(0));
        let probe = hits.clone();
        table.use_rows(None, EventSet::all(), move |_| probe.set(probe.get() + 1));

        assert!(table.get_row(Where::key(1)).is_some());
        assert_eq!(table.get_rows(None).len(), 1);
        assert_eq!(table.get_row_count(None), 1);
        assert!(!table.column_names().is_empty());
        assert!(!table.render(None, None).is_empty());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_column_names_sorted_with_pk() {
        let table = cats();
        assert_eq!(table.column_names(), vec!["_pk", "age", "name"]);
    }

    #[test]
    fn test_trigger_slot_overwrite() {
        let table = cats();
        table.on_before_insert(|_| HookAction::Abort);
        // last writer wins
        table.on_before_insert(|_| HookAction::Proceed);
        assert!(table.insert_row(&cat("Cleo", 7)).is_some());
    }

    #[test]
    fn test_render_caps_rows() {
        let table = cats();
        let rows: Vec<_> = (0..60).map(|i| cat("cat", i)).collect();
        table.insert_rows(&rows, true);

        let text = table.render(None, None);
        assert_eq!(text.lines().count(), 2 + RENDER_LIMIT);
        assert!(text.starts_with("cats (60 rows)"));

        let text = table.render(None, Some(5));
        assert_eq!(text.lines().count(), 2 + 5);
    }

    #[test]
    fn test_reentrant_update_from_after_update() {
        // after-update renames the row once; the nested update sees the
        // committed value and must not deadlock or panic
        let table = Rc::new(cats());
        let pk = table.insert_row(&cat("Cleo", 7)).unwrap().pk();

        let table_ref = table.clone();
        table.on_after_update(move |_previous, new| {
            let renamed = new.get("name").and_then(Value::as_str) == Some("Old Cat");
            if new.get("age").and_then(Value::as_i64) == Some(10) && !renamed {
                let _ = table_ref.update_row(
                    new.pk(),
                    SetValue::patch([("name", Value::from("Old Cat"))]),
                );
            }
        });

        table
            .update_row(pk, SetValue::patch([("age", Value::from(10i64))]))
            .unwrap();
        let row = table.get_row(Where::key(pk)).unwrap();
        assert_eq!(row.get("name"), Some(&Value::String("Old Cat".into())));
        assert_eq!(row.get("age"), Some(&Value::Int64(10)));
    }
}
