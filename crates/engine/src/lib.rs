//! Ledger & settlement engine for group expense splitting.
//!
//! The engine keeps one append-only [`Ledger`] per [`Group`]. Expenses are
//! divided among participants by a [`SplitStrategy`] that never loses a
//! minor unit; balances are recomputed from the ledger on demand; the
//! settlement optimizer proposes a short list of payments that zeroes the
//! group.
//!
//! The engine performs no I/O. Persistence, presentation, and identity are
//! external collaborators: the persistence side streams entries out through
//! [`Engine::entries_since`] and replays them on restart, the presentation
//! side submits user-entered decimal amounts which the engine parses into
//! [`Money`], and participant ids are trusted as already authenticated —
//! the engine only checks group membership.
//!
//! # Concurrency
//!
//! Each group sits behind its own lock: mutations of one ledger are applied
//! in a total order, while operations on different groups run in parallel.
//! Reads take a read lock, so they observe a consistent snapshot and never
//! a half-appended entry. No lock is ever held across I/O.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use uuid::Uuid;

pub use currency::Currency;
pub use entry::{Entry, Expense, Settlement, SplitMethod};
pub use error::EngineError;
pub use group::Group;
pub use ledger::Ledger;
pub use money::Money;
pub use ops::{
    GroupSummary, PairwiseDebt, SettlementProposal, net_balances, pairwise_balances,
    suggest_settlements,
};
pub use participant::Participant;
pub use split::{BPS_TOTAL, SplitStrategy};

mod currency;
mod entry;
mod error;
mod group;
mod ledger;
mod money;
mod ops;
mod participant;
mod split;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Registry of groups, each owning its ledger behind a per-group lock.
#[derive(Debug, Default)]
pub struct Engine {
    groups: RwLock<HashMap<Uuid, Arc<RwLock<Group>>>>,
}

impl Engine {
    /// Creates an engine with no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones out the handle for a group so the registry lock is released
    /// before the group lock is taken.
    pub(crate) fn group(&self, group_id: Uuid) -> ResultEngine<Arc<RwLock<Group>>> {
        self.groups
            .read()
            .get(&group_id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(group_id.to_string()))
    }
}
