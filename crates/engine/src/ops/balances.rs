//! Balance derivation.
//!
//! Balances are never stored: they are a pure function of the ledger,
//! recomputed per query, so they cannot drift from the entries.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, Engine, Entry, Ledger, Money, ResultEngine};

/// Net balance per participant, derived in a single pass over the ledger.
///
/// Positive means "is owed", negative means "owes". For every expense the
/// payer is credited `amount - own share` and every other participant is
/// debited their share; for every settlement the payer (`from`) is credited
/// and the receiver (`to`) debited.
///
/// Invariant: the returned balances always sum to exactly zero.
#[must_use]
pub fn net_balances(ledger: &Ledger, currency: Currency) -> HashMap<Uuid, Money> {
    let mut minors: HashMap<Uuid, i64> = HashMap::new();
    for entry in ledger.entries() {
        match entry {
            Entry::Expense(expense) => {
                *minors.entry(expense.payer).or_insert(0) += expense.amount.minor();
                for (participant, share) in &expense.shares {
                    *minors.entry(*participant).or_insert(0) -= share.minor();
                }
            }
            Entry::Settlement(settlement) => {
                *minors.entry(settlement.from).or_insert(0) += settlement.amount.minor();
                *minors.entry(settlement.to).or_insert(0) -= settlement.amount.minor();
            }
        }
    }
    minors
        .into_iter()
        .map(|(participant, minor)| (participant, Money::new(minor, currency)))
        .collect()
}

/// Directed debt between two participants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PairwiseDebt {
    pub debtor: Uuid,
    pub creditor: Uuid,
    pub amount: Money,
}

/// Netted directed debt for every participant pair with a nonzero balance,
/// sorted by (debtor, creditor) id for determinism.
///
/// Expenses create debt from each share holder toward the payer;
/// settlements reduce the payer's debt toward the receiver. Opposite
/// directions cancel, so at most one direction per pair survives.
#[must_use]
pub fn pairwise_balances(ledger: &Ledger, currency: Currency) -> Vec<PairwiseDebt> {
    // Keyed by (low id, high id); the value is what `low` owes `high`,
    // signed, so the two directions net out.
    let mut pairs: HashMap<(Uuid, Uuid), i64> = HashMap::new();
    let mut add_debt = |debtor: Uuid, creditor: Uuid, minor: i64| {
        if debtor < creditor {
            *pairs.entry((debtor, creditor)).or_insert(0) += minor;
        } else {
            *pairs.entry((creditor, debtor)).or_insert(0) -= minor;
        }
    };

    for entry in ledger.entries() {
        match entry {
            Entry::Expense(expense) => {
                for (participant, share) in &expense.shares {
                    if *participant != expense.payer {
                        add_debt(*participant, expense.payer, share.minor());
                    }
                }
            }
            Entry::Settlement(settlement) => {
                add_debt(settlement.from, settlement.to, -settlement.amount.minor());
            }
        }
    }

    let mut debts: Vec<PairwiseDebt> = pairs
        .into_iter()
        .filter(|(_, minor)| *minor != 0)
        .map(|((low, high), minor)| {
            if minor > 0 {
                PairwiseDebt {
                    debtor: low,
                    creditor: high,
                    amount: Money::new(minor, currency),
                }
            } else {
                PairwiseDebt {
                    debtor: high,
                    creditor: low,
                    amount: Money::new(-minor, currency),
                }
            }
        })
        .collect();
    debts.sort_by(|a, b| (a.debtor, a.creditor).cmp(&(b.debtor, b.creditor)));
    debts
}

impl Engine {
    /// Net balance per participant of a group. See [`net_balances`].
    pub fn net_balances(&self, group_id: Uuid) -> ResultEngine<HashMap<Uuid, Money>> {
        let group = self.group(group_id)?;
        let group = group.read();
        Ok(net_balances(group.ledger(), group.currency))
    }

    /// Netted directed debt per participant pair. See [`pairwise_balances`].
    pub fn pairwise_balances(&self, group_id: Uuid) -> ResultEngine<Vec<PairwiseDebt>> {
        let group = self.group(group_id)?;
        let group = group.read();
        Ok(pairwise_balances(group.ledger(), group.currency))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{Group, SplitStrategy};

    fn usd(minor: i64) -> Money {
        Money::new(minor, Currency::Usd)
    }

    fn trip_group() -> (Group, Vec<Uuid>) {
        let mut group = Group::new("Weekend Trip".to_string(), Currency::Usd);
        let members = vec![
            group.add_participant("Alice").unwrap(),
            group.add_participant("Bob").unwrap(),
            group.add_participant("Carol").unwrap(),
        ];
        (group, members)
    }

    #[test]
    fn net_balances_conserve_money() {
        let (mut group, members) = trip_group();
        group
            .record_expense(
                members[0],
                usd(1000),
                &SplitStrategy::Equal,
                &members,
                None,
                None,
                Utc::now(),
            )
            .unwrap();
        group
            .record_expense(
                members[1],
                usd(777),
                &SplitStrategy::Shares(vec![(members[0], 2), (members[2], 3)]),
                &[members[0], members[2]],
                None,
                None,
                Utc::now(),
            )
            .unwrap();
        group
            .record_settlement(members[2], members[0], usd(250), None, Utc::now())
            .unwrap();

        let balances = net_balances(group.ledger(), group.currency);
        let total: i64 = balances.values().map(|balance| balance.minor()).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn payer_is_credited_amount_minus_own_share() {
        let (mut group, members) = trip_group();
        group
            .record_expense(
                members[0],
                usd(1000),
                &SplitStrategy::Equal,
                &members,
                None,
                None,
                Utc::now(),
            )
            .unwrap();

        let balances = net_balances(group.ledger(), group.currency);
        // Equal split of 10.00 across three: 334/333/333, remainder on Alice.
        assert_eq!(balances[&members[0]].minor(), 1000 - 334);
        assert_eq!(balances[&members[1]].minor(), -333);
        assert_eq!(balances[&members[2]].minor(), -333);
    }

    #[test]
    fn pairwise_debts_net_out_settlements() {
        let (mut group, members) = trip_group();
        group
            .record_expense(
                members[0],
                usd(900),
                &SplitStrategy::Equal,
                &members,
                None,
                None,
                Utc::now(),
            )
            .unwrap();
        group
            .record_settlement(members[1], members[0], usd(300), None, Utc::now())
            .unwrap();

        let debts = pairwise_balances(group.ledger(), group.currency);
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, members[2]);
        assert_eq!(debts[0].creditor, members[0]);
        assert_eq!(debts[0].amount, usd(300));
    }
}
