//! Ledger entry primitives.
//!
//! An `Entry` is an immutable event appended to a group's ledger: either an
//! [`Expense`] with its per-participant shares, or a [`Settlement`] payment
//! between two participants. Entries are never edited or removed;
//! corrections are new compensating entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Which strategy produced an expense's shares. Recorded for display and
/// audit; replaying an entry uses the stored shares, never the method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    Equal,
    Exact,
    Percentage,
    Shares,
}

impl SplitMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
            Self::Shares => "shares",
        }
    }
}

impl TryFrom<&str> for SplitMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" => Ok(Self::Percentage),
            "shares" => Ok(Self::Shares),
            other => Err(EngineError::ParseError(format!(
                "invalid split method: {other}"
            ))),
        }
    }
}

/// An expense paid by one participant on behalf of several.
///
/// Invariant: the shares sum to `amount` exactly. [`Expense::new`] enforces
/// it, so a constructed expense can always be replayed without drift.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub payer: Uuid,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub method: SplitMethod,
    /// Per-participant owed amounts, in the order the caller listed the
    /// participants. The order matters: it decides who absorbed rounding.
    pub shares: Vec<(Uuid, Money)>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl Expense {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        group_id: Uuid,
        payer: Uuid,
        amount: Money,
        occurred_at: DateTime<Utc>,
        method: SplitMethod,
        shares: Vec<(Uuid, Money)>,
        description: Option<String>,
        category: Option<String>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "expense amount must be > 0".to_string(),
            ));
        }
        let mut total = Money::zero(amount.currency());
        for (_, share) in &shares {
            total = total.add(*share)?;
        }
        if total != amount {
            return Err(EngineError::SplitMismatch(format!(
                "shares sum to {total}, expected {amount}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            payer,
            amount,
            occurred_at,
            method,
            shares,
            description,
            category,
        })
    }

    /// The share owed by `participant`, zero if they are not in the split.
    #[must_use]
    pub fn share_of(&self, participant: Uuid) -> Money {
        self.shares
            .iter()
            .find_map(|(id, share)| (*id == participant).then_some(*share))
            .unwrap_or(Money::zero(self.amount.currency()))
    }
}

/// A payment from one participant to another, reducing the payer's debt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Uuid,
    pub group_id: Uuid,
    pub from: Uuid,
    pub to: Uuid,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl Settlement {
    pub(crate) fn new(
        group_id: Uuid,
        from: Uuid,
        to: Uuid,
        amount: Money,
        occurred_at: DateTime<Utc>,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "settlement amount must be > 0".to_string(),
            ));
        }
        if from == to {
            return Err(EngineError::SameParticipant(
                "from and to must differ".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            from,
            to,
            amount,
            occurred_at,
            note,
        })
    }
}

/// A single immutable ledger event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Expense(Expense),
    Settlement(Settlement),
}

impl Entry {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Entry::Expense(expense) => expense.id,
            Entry::Settlement(settlement) => settlement.id,
        }
    }

    #[must_use]
    pub fn group_id(&self) -> Uuid {
        match self {
            Entry::Expense(expense) => expense.group_id,
            Entry::Settlement(settlement) => settlement.group_id,
        }
    }

    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Entry::Expense(expense) => expense.occurred_at,
            Entry::Settlement(settlement) => settlement.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn usd(minor: i64) -> Money {
        Money::new(minor, Currency::Usd)
    }

    #[test]
    fn expense_rejects_share_drift() {
        let group = Uuid::new_v4();
        let payer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let result = Expense::new(
            group,
            payer,
            usd(1000),
            Utc::now(),
            SplitMethod::Exact,
            vec![(payer, usd(500)), (other, usd(499))],
            None,
            None,
        );
        assert!(matches!(result, Err(EngineError::SplitMismatch(_))));
    }

    #[test]
    fn settlement_rejects_self_payment() {
        let group = Uuid::new_v4();
        let who = Uuid::new_v4();
        let result = Settlement::new(group, who, who, usd(100), Utc::now(), None);
        assert!(matches!(result, Err(EngineError::SameParticipant(_))));
    }

    #[test]
    fn settlement_rejects_non_positive_amount() {
        let group = Uuid::new_v4();
        let result = Settlement::new(
            group,
            Uuid::new_v4(),
            Uuid::new_v4(),
            usd(0),
            Utc::now(),
            None,
        );
        assert!(matches!(result, Err(EngineError::InvalidAmount(_))));
    }
}
