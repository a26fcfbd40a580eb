//! Trigger Store - tables, singles, and queues.
//!
//! This crate assembles the reactive data store on top of `trigger-core`
//! (rows, schemas, selectors) and `trigger-reactive` (change sets,
//! subscriptions, dispatch). It provides the three entity kinds and the
//! named registry that holds them:
//!
//! - `Table`: schemaful rows with engine-assigned pks, triggers on
//!   insert/update/delete, and row- or table-scoped subscriptions
//! - `Single<T>`: one reactive value with identity-based change detection
//! - `Queue<T>`: a FIFO buffer with triggers and no subscriptions
//! - `Store` / `StoreBuilder`: the uniquely-named entity registry
//!
//! Everything is single-threaded and interior-mutable: methods take
//! `&self`, borrows never outlive an internal operation, and user
//! callbacks (triggers, refresh callbacks, predicates) may re-enter the
//! store freely.
//!
//! # Example
//!
//! ```
//! use trigger_store::{HookAction, Store, Table, Value, Where};
//!
//! let store = Store::builder()
//!     .table(Table::new("cats", &["name", "age"]).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let cats = store.table("cats").unwrap();
//! cats.on_before_insert(|row| {
//!     match row.get("age").and_then(Value::as_i64) {
//!         Some(age) if age >= 0 => HookAction::Proceed,
//!         _ => HookAction::Abort,
//!     }
//! });
//!
//! let cleo = cats
//!     .insert_row(&[("name", Value::from("Cleo")), ("age", Value::from(7i64))])
//!     .unwrap();
//! assert_eq!(cleo.pk(), 1);
//! assert!(cats.insert_row(&[("age", Value::from(-1i64))]).is_none());
//! assert_eq!(cats.get_row_count(Some(Where::fields([("name", Value::from("Cleo"))]))), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod hooks;
pub mod queue;
pub mod single;
pub mod store;
pub mod table;

pub use hooks::{HookAction, HookSlot};
pub use queue::Queue;
pub use single::Single;
pub use store::{Store, StoreBuilder};
pub use table::{SetValue, Table};

pub use trigger_core::{Error, Result, Row, RowPk, Schema, Value, Where, PK_COLUMN};
pub use trigger_reactive::{ChangeSet, EventKind, EventSet, SubscriptionId};
