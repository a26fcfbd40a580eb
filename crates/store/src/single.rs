//! Singles: reactive standalone values.
//!
//! A `Single<T>` holds one value behind an `Rc` and notifies subscribers
//! when the held pointer changes identity. Change detection is strict:
//! `set` always installs a fresh allocation and therefore always notifies,
//! while `set_shared` compares with `Rc::ptr_eq` and stays silent when the
//! same allocation is set again, even if the contents compare equal.
//!
//! The on-set trigger observes every committed set; only the notification
//! is gated on identity change.

use crate::hooks::HookSlot;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::cell::RefCell;
use trigger_reactive::{SubscriptionId, ValueDispatcher};

/// A named, reactive single value.
pub struct Single<T> {
    name: String,
    value: RefCell<Rc<T>>,
    get_hook: HookSlot<dyn Fn(&T)>,
    set_hook: HookSlot<dyn Fn(&T)>,
    dispatcher: ValueDispatcher<T>,
}

impl<T: 'static> Single<T> {
    /// Creates a single holding the initial value.
    pub fn new(name: &str, initial: T) -> Self {
        Self {
            name: name.to_string(),
            value: RefCell::new(Rc::new(initial)),
            get_hook: HookSlot::new(),
            set_hook: HookSlot::new(),
            dispatcher: ValueDispatcher::new(),
        }
    }

    /// Returns the single's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current value and fires the on-get trigger.
    pub fn get(&self) -> Rc<T> {
        let current = self.value.borrow().clone();
        if let Some(hook) = self.get_hook.get() {
            hook(&current);
        }
        current
    }

    /// Returns the current value and registers a refresh callback that
    /// runs whenever the held value changes identity.
    pub fn use_value<F>(&self, callback: F) -> (Rc<T>, SubscriptionId)
    where
        F: Fn(&T) + 'static,
    {
        let current = self.value.borrow().clone();
        let id = self.dispatcher.subscribe(callback);
        (current, id)
    }

    /// Installs a new value. Always notifies: the value is wrapped in a
    /// fresh allocation, so its identity always differs from the old one.
    pub fn set(&self, value: T) -> Rc<T> {
        self.commit(Rc::new(value))
    }

    /// Installs an already-shared value. Notifies only if it is a
    /// different allocation than the currently held one.
    pub fn set_shared(&self, value: Rc<T>) -> Rc<T> {
        self.commit(value)
    }

    /// Installs the value computed from the current one.
    pub fn set_with<F>(&self, f: F) -> Rc<T>
    where
        F: FnOnce(&T) -> T,
    {
        let current = self.value.borrow().clone();
        self.commit(Rc::new(f(&current)))
    }

    fn commit(&self, new: Rc<T>) -> Rc<T> {
        let changed = {
            let mut slot = self.value.borrow_mut();
            let changed = !Rc::ptr_eq(&*slot, &new);
            *slot = new.clone();
            changed
        };

        // the on-set trigger observes every committed set
        if let Some(hook) = self.set_hook.get() {
            hook(&new);
        }
        if changed {
            self.dispatcher.notify_all(&new);
        }
        new
    }

    /// Removes a subscription. Returns true if it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Returns the number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// Attaches the on-get trigger, replacing any previous one.
    pub fn on_get<F>(&self, hook: F)
    where
        F: Fn(&T) + 'static,
    {
        self.get_hook.set(Rc::new(hook));
    }

    /// Attaches the on-set trigger, replacing any previous one.
    pub fn on_set<F>(&self, hook: F)
    where
        F: Fn(&T) + 'static,
    {
        self.set_hook.set(Rc::new(hook));
    }
}
