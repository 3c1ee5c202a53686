//! The `Group` holds its members and owns its ledger exclusively. All
//! mutations of a group's ledger go through the group, so holding the
//! group's lock is enough to serialize them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Currency, Entry, Expense, Ledger, Money, Participant, ResultEngine, Settlement, SplitStrategy,
    error::EngineError,
    ops::net_balances,
    util::{normalize_display_name, normalize_name_key},
};

/// A set of participants sharing one expense ledger.
#[derive(Clone, Debug)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub currency: Currency,
    members: HashMap<Uuid, Participant>,
    ledger: Ledger,
}

impl Group {
    pub(crate) fn new(name: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            currency,
            members: HashMap::new(),
            ledger: Ledger::new(),
        }
    }

    /// The group's ledger, read-only. Appends go through the record methods.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.members.get(&id)
    }

    /// Active members only.
    pub fn iter_participants(&self) -> impl Iterator<Item = &Participant> {
        self.members.values().filter(|member| !member.archived)
    }

    /// Every member ever added, archived ones included.
    pub fn iter_all_participants(&self) -> impl Iterator<Item = &Participant> {
        self.members.values()
    }

    fn require_active(&self, id: Uuid, role: &str) -> ResultEngine<()> {
        match self.members.get(&id) {
            Some(member) if !member.archived => Ok(()),
            Some(_) => Err(EngineError::InvalidParticipant(format!(
                "{role} {id} has left the group"
            ))),
            None => Err(EngineError::InvalidParticipant(format!(
                "{role} {id} is not a group member"
            ))),
        }
    }

    fn ensure_group_currency(&self, amount: Money) -> ResultEngine<()> {
        if amount.currency() != self.currency {
            return Err(EngineError::CurrencyMismatch(format!(
                "group currency is {}, got {}",
                self.currency.code(),
                amount.currency().code()
            )));
        }
        Ok(())
    }

    /// Adds a member. Duplicate display names (after normalization) among
    /// active members are rejected.
    pub fn add_participant(&mut self, display_name: &str) -> ResultEngine<Uuid> {
        let display = normalize_display_name(display_name, "participant")?;
        let key = normalize_name_key(&display);
        if self
            .iter_participants()
            .any(|member| normalize_name_key(&member.display_name) == key)
        {
            return Err(EngineError::ExistingKey(display));
        }
        let participant = Participant::new(display);
        let id = participant.id;
        self.members.insert(id, participant);
        tracing::info!(group_id = %self.id, participant_id = %id, "participant added");
        Ok(id)
    }

    /// Archives a member. Only allowed once their net balance is zero, so
    /// nobody walks away from an open debt. Their historical shares stay in
    /// the ledger.
    pub fn remove_participant(&mut self, id: Uuid) -> ResultEngine<()> {
        self.require_active(id, "participant")?;
        let balances = net_balances(&self.ledger, self.currency);
        if let Some(balance) = balances.get(&id)
            && !balance.is_zero()
        {
            return Err(EngineError::UnsettledBalance(format!(
                "participant {id} still has a balance of {balance}"
            )));
        }
        if let Some(member) = self.members.get_mut(&id) {
            member.archived = true;
        }
        tracing::info!(group_id = %self.id, participant_id = %id, "participant removed");
        Ok(())
    }

    /// Returns `true` if any member's net balance is nonzero.
    #[must_use]
    pub fn has_unsettled_balances(&self) -> bool {
        net_balances(&self.ledger, self.currency)
            .values()
            .any(|balance| !balance.is_zero())
    }

    /// Total volume of recorded expenses (settlements excluded).
    #[must_use]
    pub fn total_expenses(&self) -> Money {
        let minor = self
            .ledger
            .entries()
            .iter()
            .map(|entry| match entry {
                Entry::Expense(expense) => expense.amount.minor(),
                Entry::Settlement(_) => 0,
            })
            .sum();
        Money::new(minor, self.currency)
    }

    /// Validates and appends an expense; returns the new entry's id.
    ///
    /// All validation happens before the append, so a failure leaves the
    /// ledger exactly as it was.
    #[allow(clippy::too_many_arguments)]
    pub fn record_expense(
        &mut self,
        payer: Uuid,
        amount: Money,
        strategy: &SplitStrategy,
        participants: &[Uuid],
        description: Option<&str>,
        category: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        self.ensure_group_currency(amount)?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "expense amount must be > 0".to_string(),
            ));
        }
        self.require_active(payer, "payer")?;
        for participant in participants {
            self.require_active(*participant, "participant")?;
        }

        let shares = strategy.compute(amount, participants)?;
        let expense = Expense::new(
            self.id,
            payer,
            amount,
            occurred_at,
            strategy.method(),
            shares,
            description.map(str::to_string),
            category.map(str::to_string),
        )?;
        Ok(self.ledger.append(Entry::Expense(expense)))
    }

    /// Validates and appends a settlement payment; returns the entry's id.
    pub fn record_settlement(
        &mut self,
        from: Uuid,
        to: Uuid,
        amount: Money,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        self.ensure_group_currency(amount)?;
        self.require_active(from, "from")?;
        self.require_active(to, "to")?;
        let settlement = Settlement::new(
            self.id,
            from,
            to,
            amount,
            occurred_at,
            note.map(str::to_string),
        )?;
        Ok(self.ledger.append(Entry::Settlement(settlement)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with_members(n: usize) -> (Group, Vec<Uuid>) {
        let mut group = Group::new("Weekend Trip".to_string(), Currency::Usd);
        let members = (0..n)
            .map(|i| group.add_participant(&format!("member-{i}")).unwrap())
            .collect();
        (group, members)
    }

    #[test]
    fn duplicate_display_names_are_rejected() {
        let (mut group, _) = group_with_members(1);
        assert!(matches!(
            group.add_participant(" MEMBER-0 "),
            Err(EngineError::ExistingKey(_))
        ));
    }

    #[test]
    fn non_member_payer_appends_nothing() {
        let (mut group, members) = group_with_members(2);
        let stranger = Uuid::new_v4();
        let result = group.record_expense(
            stranger,
            Money::new(1000, Currency::Usd),
            &SplitStrategy::Equal,
            &members,
            None,
            None,
            Utc::now(),
        );
        assert!(matches!(result, Err(EngineError::InvalidParticipant(_))));
        assert_eq!(group.ledger().len(), 0);
    }

    #[test]
    fn expense_in_wrong_currency_is_rejected() {
        let (mut group, members) = group_with_members(2);
        let result = group.record_expense(
            members[0],
            Money::new(1000, Currency::Eur),
            &SplitStrategy::Equal,
            &members,
            None,
            None,
            Utc::now(),
        );
        assert!(matches!(result, Err(EngineError::CurrencyMismatch(_))));
        assert_eq!(group.ledger().len(), 0);
    }

    #[test]
    fn member_with_open_balance_cannot_leave() {
        let (mut group, members) = group_with_members(2);
        group
            .record_expense(
                members[0],
                Money::new(1000, Currency::Usd),
                &SplitStrategy::Equal,
                &members,
                None,
                None,
                Utc::now(),
            )
            .unwrap();

        assert!(matches!(
            group.remove_participant(members[1]),
            Err(EngineError::UnsettledBalance(_))
        ));

        group
            .record_settlement(
                members[1],
                members[0],
                Money::new(500, Currency::Usd),
                None,
                Utc::now(),
            )
            .unwrap();
        group.remove_participant(members[1]).unwrap();

        // An archived member can no longer be part of new expenses.
        let result = group.record_expense(
            members[0],
            Money::new(100, Currency::Usd),
            &SplitStrategy::Equal,
            &members,
            None,
            None,
            Utc::now(),
        );
        assert!(matches!(result, Err(EngineError::InvalidParticipant(_))));
    }
}
