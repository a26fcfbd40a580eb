//! Queues: FIFO buffers with triggers and no subscriptions.
//!
//! A `Queue<T>` never refreshes subscribers; it exists for work-item flows
//! where consumption, not observation, is the point. Its two triggers
//! observe items as they pass through: on-insert sees the item before it
//! is enqueued, on-get sees it after it is dequeued.

use crate::hooks::HookSlot;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::RefCell;

/// A named FIFO queue.
pub struct Queue<T> {
    name: String,
    items: RefCell<VecDeque<T>>,
    insert_hook: HookSlot<dyn Fn(&T)>,
    get_hook: HookSlot<dyn Fn(&T)>,
}

impl<T: 'static> Queue<T> {
    /// Creates an empty queue.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: RefCell::new(VecDeque::new()),
            insert_hook: HookSlot::new(),
            get_hook: HookSlot::new(),
        }
    }

    /// Returns the queue's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an item, firing the on-insert trigger first.
    pub fn insert(&self, item: T) {
        if let Some(hook) = self.insert_hook.get() {
            hook(&item);
        }
        self.items.borrow_mut().push_back(item);
    }

    /// Appends an item, running `callback` with it as it is enqueued
    /// (after the on-insert trigger, before any consumer can see it).
    pub fn insert_with<F>(&self, item: T, callback: F)
    where
        F: FnOnce(&T),
    {
        if let Some(hook) = self.insert_hook.get() {
            hook(&item);
        }
        callback(&item);
        self.items.borrow_mut().push_back(item);
    }

    /// Removes and returns the oldest item, firing the on-get trigger
    /// with it. Returns `None` when the queue is empty.
    pub fn get(&self) -> Option<T> {
        let item = self.items.borrow_mut().pop_front()?;
        if let Some(hook) = self.get_hook.get() {
            hook(&item);
        }
        Some(item)
    }

    /// Returns the number of queued items.
    pub fn size(&self) -> usize {
        self.items.borrow().len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Attaches the on-insert trigger, replacing any previous one.
    pub fn on_insert<F>(&self, hook: F)
    where
        F: Fn(&T) + 'static,
    {
        self.insert_hook.set(Rc::new(hook));
    }

    /// Attaches the on-get trigger, replacing any previous one.
    pub fn on_get<F>(&self, hook: F)
    where
        F: Fn(&T) + 'static,
    {
        self.get_hook.set(Rc::new(hook));
    }
}
