//! Value-level subscriptions for singles.
//!
//! A `ValueDispatcher<T>` is the single-value analog of the table
//! `Dispatcher`: no scopes and no event kinds, just refresh callbacks
//! receiving the new value. Delivery iterates over a snapshot so a
//! callback may unsubscribe re-entrantly.

use crate::subscription::SubscriptionId;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;

/// A live subscription on a single value.
pub struct ValueSubscription<T: ?Sized> {
    id: SubscriptionId,
    callback: Box<dyn Fn(&T)>,
    active: Cell<bool>,
}

impl<T: ?Sized> ValueSubscription<T> {
    fn new<F>(id: SubscriptionId, callback: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        Self {
            id,
            callback: Box::new(callback),
            active: Cell::new(true),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Invokes the callback if the subscription is still active.
    pub fn notify(&self, value: &T) {
        if self.active.get() {
            (self.callback)(value);
        }
    }
}

/// Routes committed value changes to subscribers.
pub struct ValueDispatcher<T: ?Sized> {
    subscriptions: RefCell<HashMap<SubscriptionId, Rc<ValueSubscription<T>>>>,
    next_id: Cell<SubscriptionId>,
}

impl<T: ?Sized> Default for ValueDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ValueDispatcher<T> {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Registers a subscription and returns its ID.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscriptions
            .borrow_mut()
            .insert(id, Rc::new(ValueSubscription::new(id, callback)));
        id
    }

    /// Unsubscribes by ID. Returns true if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self.subscriptions.borrow_mut().remove(&id) {
            Some(subscription) => {
                subscription.active.set(false);
                true
            }
            None => false,
        }
    }

    /// Delivers the new value to every active subscriber.
    pub fn notify_all(&self, value: &T) {
        let snapshot: Vec<Rc<ValueSubscription<T>>> =
            self.subscriptions.borrow().values().cloned().collect();
        for subscription in snapshot {
            subscription.notify(value);
        }
    }

    /// Returns the number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Returns true if there are no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.borrow().is_empty()
    }
}
