//! Table event kinds and subscriber interest sets.

/// Kind of committed table mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A row was inserted.
    RowInsert,
    /// A row was updated.
    RowUpdate,
    /// A row was deleted.
    RowDelete,
}

impl EventKind {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            EventKind::RowInsert => 0b001,
            EventKind::RowUpdate => 0b010,
            EventKind::RowDelete => 0b100,
        }
    }
}

/// The set of event kinds a subscriber is interested in.
///
/// Subscriptions registered without an explicit interest set observe
/// every kind (`EventSet::all()` is the default).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventSet {
    bits: u8,
}

impl Default for EventSet {
    fn default() -> Self {
        Self::all()
    }
}

impl EventSet {
    /// The empty interest set.
    pub fn none() -> Self {
        Self { bits: 0 }
    }

    /// Interest in every event kind.
    pub fn all() -> Self {
        Self { bits: 0b111 }
    }

    /// Interest in exactly the given kinds.
    pub fn only(kinds: &[EventKind]) -> Self {
        kinds.iter().fold(Self::none(), |set, kind| set.with(*kind))
    }

    /// Returns this set with one more kind added.
    pub fn with(self, kind: EventKind) -> Self {
        Self {
            bits: self.bits | kind.bit(),
        }
    }

    /// Returns true if the set contains the kind.
    pub fn contains(self, kind: EventKind) -> bool {
        self.bits & kind.bit() != 0
    }

    /// Returns true if no kind is in the set.
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns true if any kind is in both sets.
    pub fn intersects(self, other: EventSet) -> bool {
        self.bits & other.bits != 0
    }
}

impl From<EventKind> for EventSet {
    fn from(kind: EventKind) -> Self {
        EventSet::none().with(kind)
    }
}
