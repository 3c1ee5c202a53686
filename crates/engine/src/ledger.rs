//! Append-only per-group ledger.
//!
//! The ledger is the source of truth: balances are always recomputed from
//! it, never stored. Entries are appended in a total order and never
//! mutated or deleted; corrections are new compensating entries. The
//! position of an entry doubles as the sync cursor handed to the
//! persistence collaborator.

use uuid::Uuid;

use crate::Entry;

/// Ordered sequence of [`Entry`] values for one group.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a ledger from entries previously streamed out with
    /// [`Ledger::entries_since`].
    ///
    /// Entries must be supplied in their original insertion order; replaying
    /// them reproduces identical balances, since balances are a pure
    /// function of the entry sequence.
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Number of entries; also the cursor pointing past the current tail.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries from `cursor` (inclusive) to the current tail, in insertion
    /// order. Restartable: feed back `cursor + consumed` to resume. A cursor
    /// past the tail yields nothing.
    pub fn entries_since(&self, cursor: usize) -> impl Iterator<Item = &Entry> {
        self.entries.iter().skip(cursor)
    }

    pub(crate) fn append(&mut self, entry: Entry) -> Uuid {
        let id = entry.id();
        tracing::debug!(group_id = %entry.group_id(), entry_id = %id, position = self.entries.len(), "ledger append");
        self.entries.push(entry);
        id
    }
}
