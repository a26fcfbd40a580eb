//! Trigger Core - foundational types for the Trigger reactive data store.
//!
//! This crate provides the types shared by every layer of the store:
//!
//! - `Value`: runtime values that can be stored in a table cell
//! - `Row`: a row of named values with an engine-assigned primary key
//! - `Schema`: the fixed column set of a table (plus the implicit `_pk`)
//! - `KeyAllocator`: per-table monotonic primary key issuance
//! - `Where`: the polymorphic row selector (key / fields / predicate)
//! - `Error`: construction-time error types
//!
//! # Example
//!
//! ```rust
//! use trigger_core::{Row, Schema, Value, Where};
//! use std::rc::Rc;
//!
//! let schema = Rc::new(Schema::new("cats", &["name", "age"]).unwrap());
//! let row = Row::new(1, schema, vec![
//!     Value::String("Cleo".into()),
//!     Value::Int64(7),
//! ]);
//!
//! assert_eq!(row.get("name"), Some(&Value::String("Cleo".into())));
//! assert!(Where::fields([("age", Value::from(7i64))]).matches(&row));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod row;
mod schema;
mod select;
mod value;

pub use error::{Error, Result};
pub use row::{KeyAllocator, Row, RowPk, PENDING_ROW_PK};
pub use schema::{Schema, PK_COLUMN};
pub use select::Where;
pub use value::Value;
