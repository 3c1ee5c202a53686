//! Recording and streaming ledger entries through the engine facade.
//!
//! Mutations take the group's write lock, so all appends to one ledger are
//! applied in a total order; groups lock independently, so unrelated groups
//! never contend. Amounts arrive as user-entered decimal strings and are
//! parsed against the group currency before any validation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Engine, Entry, Money, ResultEngine, SplitStrategy};

impl Engine {
    /// Parses `amount`, computes shares with `strategy`, and appends an
    /// expense to the group's ledger. Returns the entry id.
    ///
    /// Either the whole entry is appended or nothing is: every validation
    /// runs before the append.
    #[allow(clippy::too_many_arguments)]
    pub fn record_expense(
        &self,
        group_id: Uuid,
        payer: Uuid,
        amount: &str,
        strategy: &SplitStrategy,
        participants: &[Uuid],
        description: Option<&str>,
        category: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let group = self.group(group_id)?;
        let mut group = group.write();
        let amount = Money::parse(amount, group.currency)?;
        group.record_expense(
            payer,
            amount,
            strategy,
            participants,
            description,
            category,
            occurred_at,
        )
    }

    /// Parses `amount` and appends a settlement payment from `from` to `to`.
    pub fn record_settlement(
        &self,
        group_id: Uuid,
        from: Uuid,
        to: Uuid,
        amount: &str,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let group = self.group(group_id)?;
        let mut group = group.write();
        let amount = Money::parse(amount, group.currency)?;
        group.record_settlement(from, to, amount, note, occurred_at)
    }

    /// Snapshot of the ledger from `cursor` to the current tail, in
    /// insertion order.
    ///
    /// The persistence collaborator feeds back `cursor + returned.len()` to
    /// resume; replaying everything from cursor 0 into a fresh group
    /// reproduces identical balances.
    pub fn entries_since(&self, group_id: Uuid, cursor: usize) -> ResultEngine<Vec<Entry>> {
        let group = self.group(group_id)?;
        let group = group.read();
        Ok(group.ledger().entries_since(cursor).cloned().collect())
    }
}
