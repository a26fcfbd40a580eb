//! Trigger Reactive - the notification layer of the Trigger store.
//!
//! This crate decouples mutation from refresh delivery. Tables commit a
//! mutation, build a `ChangeSet`, and hand it to their `Dispatcher`; the
//! dispatcher matches it against every live subscription and invokes the
//! qualifying refresh callbacks synchronously.
//!
//! # Core Concepts
//!
//! - `EventKind` / `EventSet`: which mutations a subscriber cares about
//! - `ChangeSet`: the committed effect of one operation or batch
//! - `Subscription` / `Scope`: a registered interest (whole table,
//!   filtered view, or single row) paired with a refresh callback
//! - `Dispatcher`: the per-table registry that routes change sets
//! - `ValueDispatcher<T>`: the single-value analog used by singles
//!
//! Delivery guarantees:
//!
//! - at most one callback invocation per qualifying change set
//! - dispatch iterates a snapshot, so callbacks may subscribe and
//!   unsubscribe re-entrantly
//! - a filtered view refreshes when a row moves into it or out of it

#![no_std]

extern crate alloc;

pub mod change_set;
pub mod dispatcher;
pub mod event;
pub mod subscription;
pub mod value;

pub use change_set::ChangeSet;
pub use dispatcher::Dispatcher;
pub use event::{EventKind, EventSet};
pub use subscription::{RefreshCallback, Scope, Subscription, SubscriptionId};
pub use value::{ValueDispatcher, ValueSubscription};
