//! Notification dispatcher for one table.
//!
//! The dispatcher decouples mutation from refresh delivery: it owns the
//! live subscriptions and matches committed change sets against them.
//! Delivery always iterates over a snapshot of the registry, so a refresh
//! callback may subscribe or unsubscribe re-entrantly without invalidating
//! the iteration.

use crate::change_set::ChangeSet;
use crate::event::EventSet;
use crate::subscription::{Scope, Subscription, SubscriptionId};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use trigger_core::RowPk;

/// Routes committed table mutations to matching subscriptions.
pub struct Dispatcher {
    subscriptions: RefCell<HashMap<SubscriptionId, Rc<Subscription>>>,
    next_id: Cell<SubscriptionId>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Registers a subscription and returns its ID.
    pub fn subscribe<F>(&self, scope: Scope, events: EventSet, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeSet) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let subscription = Rc::new(Subscription::new(id, scope, events, callback));
        self.subscriptions.borrow_mut().insert(id, subscription);
        id
    }

    /// Unsubscribes by ID. Returns true if the subscription existed.
    ///
    /// Safe to call from inside a refresh callback: the subscription is
    /// deactivated first, so a dispatch snapshot still holding it will
    /// skip it.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self.subscriptions.borrow_mut().remove(&id) {
            Some(subscription) => {
                subscription.deactivate();
                true
            }
            None => false,
        }
    }

    /// Delivers a change set to table-scoped subscriptions (whole-table
    /// and filtered views). Row-scoped subscriptions are not touched.
    pub fn notify_tables(&self, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        for subscription in self.snapshot() {
            if !subscription.is_row_scoped() {
                subscription.notify(changes);
            }
        }
    }

    /// Delivers a change set to subscriptions scoped to the given row.
    pub fn notify_row(&self, pk: RowPk, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        for subscription in self.snapshot() {
            if subscription.row_pk() == Some(pk) {
                subscription.notify(changes);
            }
        }
    }

    /// Tears down every subscription scoped to the given row. Called when
    /// the row is deleted.
    pub fn remove_row_subscriptions(&self, pk: RowPk) {
        let stale: Vec<SubscriptionId> = self
            .subscriptions
            .borrow()
            .values()
            .filter(|s| s.row_pk() == Some(pk))
            .map(|s| s.id())
            .collect();
        for id in stale {
            self.unsubscribe(id);
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

    fn snapshot(&self) -> Vec<Rc<Subscription>> {
        self.subscriptions.borrow().values().cloned().collect()
    }
}
