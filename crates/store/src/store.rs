//! The store: a named registry of tables, singles, and queues.
//!
//! Entities are created up front and registered under unique names via
//! `StoreBuilder`; the built `Store` is immutable in shape. Singles and
//! queues are held type-erased and recovered through typed accessors, so
//! a name paired with the wrong element type reads as absent rather than
//! panicking.

use crate::queue::Queue;
use crate::single::Single;
use crate::table::Table;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use hashbrown::HashMap;
use trigger_core::{Error, Result};

enum Entry {
    Table(Rc<Table>),
    Single(Rc<dyn Any>),
    Queue(Rc<dyn Any>),
}

/// Accumulates named entities and validates name uniqueness at build time.
#[derive(Default)]
pub struct StoreBuilder {
    entries: Vec<(String, Entry)>,
}

impl StoreBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table under its own name.
    pub fn table(mut self, table: Table) -> Self {
        self.entries
            .push((table.name().to_string(), Entry::Table(Rc::new(table))));
        self
    }

    /// Registers a single under its own name.
    pub fn single<T: 'static>(mut self, single: Single<T>) -> Self {
        self.entries
            .push((single.name().to_string(), Entry::Single(Rc::new(single))));
        self
    }

    /// Registers a queue under its own name.
    pub fn queue<T: 'static>(mut self, queue: Queue<T>) -> Self {
        self.entries
            .push((queue.name().to_string(), Entry::Queue(Rc::new(queue))));
        self
    }

    /// Builds the store, rejecting duplicate entity names. Names are
    /// shared across kinds: a table and a queue may not collide either.
    pub fn build(self) -> Result<Store> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for (name, entry) in self.entries {
            if entries.contains_key(&name) {
                return Err(Error::duplicate_entry(name));
            }
            entries.insert(name, entry);
        }
        Ok(Store { entries })
    }
}

/// An immutable registry of reactive entities, looked up by name.
pub struct Store {
    entries: HashMap<String, Entry>,
}

impl core::fmt::Debug for Store {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Starts building a store.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<Rc<Table>> {
        match self.entries.get(name) {
            Some(Entry::Table(table)) => Some(table.clone()),
            _ => None,
        }
    }

    /// Looks up a single by name and element type.
    pub fn single<T: 'static>(&self, name: &str) -> Option<Rc<Single<T>>> {
        match self.entries.get(name) {
            Some(Entry::Single(any)) => any.clone().downcast::<Single<T>>().ok(),
            _ => None,
        }
    }

    /// Looks up a queue by name and element type.
    pub fn queue<T: 'static>(&self, name: &str) -> Option<Rc<Queue<T>>> {
        match self.entries.get(name) {
            Some(Entry::Queue(any)) => any.clone().downcast::<Queue<T>>().ok(),
            _ => None,
        }
    }

    /// Returns true if any entity is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of registered entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
