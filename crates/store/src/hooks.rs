//! The trigger pipeline shared by tables, singles, and queues.
//!
//! Every entity owns one `HookSlot` per trigger kind. A slot holds at most
//! one callback: attaching a second one replaces the first (last writer
//! wins). Before-hooks on tables return a `HookAction` verdict that can
//! veto or transform the pending mutation; every other hook is a plain
//! observer.

use alloc::rc::Rc;
use core::cell::RefCell;
use trigger_core::Row;

/// Verdict of a before-insert or before-update trigger.
pub enum HookAction {
    /// Commit the mutation as proposed.
    Proceed,
    /// Veto the mutation; the caller sees "no row produced".
    Abort,
    /// Commit, but persist this row instead of the proposed one.
    Transform(Row),
}

/// Before-insert trigger: receives the candidate row (pk not yet
/// assigned).
pub type BeforeInsertFn = dyn Fn(Row) -> HookAction;
/// After-insert trigger: receives the committed row.
pub type AfterInsertFn = dyn Fn(&Row);
/// Before-update trigger: receives (current, proposed merged row).
pub type BeforeUpdateFn = dyn Fn(&Row, Row) -> HookAction;
/// After-update trigger: receives (previous, new).
pub type AfterUpdateFn = dyn Fn(&Row, &Row);
/// Before-delete trigger: returning false vetoes the deletion.
pub type BeforeDeleteFn = dyn Fn(&Row) -> bool;
/// After-delete trigger: receives the removed row.
pub type AfterDeleteFn = dyn Fn(&Row);

/// One optional trigger callback. Reading the slot clones the `Rc` and
/// releases the borrow, so the callback may re-attach hooks re-entrantly.
pub struct HookSlot<F: ?Sized> {
    slot: RefCell<Option<Rc<F>>>,
}

impl<F: ?Sized> Default for HookSlot<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> HookSlot<F> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// Attaches a callback, replacing any previous one.
    pub fn set(&self, hook: Rc<F>) {
        *self.slot.borrow_mut() = Some(hook);
    }

    /// Returns the attached callback, if any.
    pub fn get(&self) -> Option<Rc<F>> {
        self.slot.borrow().clone()
    }

    /// Returns true if a callback is attached.
    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_hook_slot_empty() {
        let slot: HookSlot<dyn Fn(&i64)> = HookSlot::new();
        assert!(!slot.is_set());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_hook_slot_last_writer_wins() {
        let slot: HookSlot<dyn Fn() -> i64> = HookSlot::new();
        slot.set(Rc::new(|| 1));
        slot.set(Rc::new(|| 2));
        assert_eq!(slot.get().unwrap()(), 2);
    }

    #[test]
    fn test_hook_slot_reentrant_attach() {
        let slot: Rc<HookSlot<dyn Fn()>> = Rc::new(HookSlot::new());
        let slot_ref = slot.clone();
        let fired = Rc::new(Cell::new(false));
        let probe = fired.clone();

        slot.set(Rc::new(move || {
            // replacing the hook from inside itself must not panic
            slot_ref.set(Rc::new(|| {}));
            probe.set(true);
        }));

        let hook = slot.get().unwrap();
        hook();
        assert!(fired.get());
        assert!(slot.is_set());
    }
}
