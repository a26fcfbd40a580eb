//! Subscriptions: a registered interest paired with a refresh callback.

use crate::change_set::ChangeSet;
use crate::event::{EventKind, EventSet};
use alloc::boxed::Box;
use core::cell::Cell;
use trigger_core::{RowPk, Where};

/// Unique identifier for a subscription within one entity.
pub type SubscriptionId = u64;

/// Callback type for refresh notifications.
pub type RefreshCallback = Box<dyn Fn(&ChangeSet)>;

/// What part of a table a subscription observes.
pub enum Scope {
    /// The whole table.
    All,
    /// The rows matching a selector.
    Filtered(Where),
    /// A single row by pk.
    Row(RowPk),
}

/// A live subscription on one table.
pub struct Subscription {
    id: SubscriptionId,
    scope: Scope,
    events: EventSet,
    callback: RefreshCallback,
    active: Cell<bool>,
}

impl Subscription {
    /// Creates an active subscription.
    pub fn new<F>(id: SubscriptionId, scope: Scope, events: EventSet, callback: F) -> Self
    where
        F: Fn(&ChangeSet) + 'static,
    {
        Self {
            id,
            scope,
            events,
            callback: Box::new(callback),
            active: Cell::new(true),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether this subscription is still active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Deactivates this subscription. An inactive subscription is never
    /// invoked again, even if it is still in a dispatch snapshot.
    #[inline]
    pub fn deactivate(&self) {
        self.active.set(false);
    }

    /// Returns true if this subscription observes a single row.
    pub fn is_row_scoped(&self) -> bool {
        matches!(self.scope, Scope::Row(_))
    }

    /// Returns the observed pk for row-scoped subscriptions.
    pub fn row_pk(&self) -> Option<RowPk> {
        match self.scope {
            Scope::Row(pk) => Some(pk),
            _ => None,
        }
    }

    /// Returns true if the change set qualifies for this subscription.
    ///
    /// A category of changes counts only if its event kind is in the
    /// interest set. A filtered scope matches an updated row if the filter
    /// held before or after the mutation, so rows moving into or out of a
    /// filtered view both refresh it.
    pub fn matches(&self, changes: &ChangeSet) -> bool {
        if !self.events.intersects(changes.kinds()) {
            return false;
        }
        match &self.scope {
            Scope::All => true,
            Scope::Row(pk) => changes.touches(*pk, self.events),
            Scope::Filtered(filter) => {
                (self.events.contains(EventKind::RowInsert)
                    && changes.inserted.iter().any(|r| filter.matches(r)))
                    || (self.events.contains(EventKind::RowUpdate)
                        && changes
                            .updated
                            .iter()
                            .any(|(old, new)| filter.matches(old) || filter.matches(new)))
                    || (self.events.contains(EventKind::RowDelete)
                        && changes.deleted.iter().any(|r| filter.matches(r)))
            }
        }
    }

    /// Invokes the refresh callback if the subscription is active and the
    /// change set qualifies. At most one invocation per change set.
    pub fn notify(&self, changes: &ChangeSet) {
        if self.is_active() && self.matches(changes) {
            (self.callback)(changes);
        }
    }
}
