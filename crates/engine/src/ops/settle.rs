//! Settlement optimizer.
//!
//! Turns a set of net balances into a short list of proposed payments that
//! zeroes everyone out. Proposals are suggestions only: committing one
//! requires an explicit [`Engine::record_settlement`] call.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, Engine, Money, ResultEngine};

/// A proposed payment. Not a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SettlementProposal {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: Money,
}

/// Greedy minimal-transaction settlement.
///
/// Repeatedly matches the largest debtor with the largest creditor and
/// transfers the smaller of the two magnitudes; whoever reaches zero drops
/// out. Each round zeroes at least one participant, so the result has at
/// most `n - 1` payments for `n` participants with a nonzero balance.
/// Magnitude ties break toward the smaller participant id, which makes the
/// output deterministic.
#[must_use]
pub fn suggest_settlements(
    balances: &HashMap<Uuid, Money>,
    currency: Currency,
) -> Vec<SettlementProposal> {
    let mut debtors: BinaryHeap<(i64, Reverse<Uuid>)> = BinaryHeap::new();
    let mut creditors: BinaryHeap<(i64, Reverse<Uuid>)> = BinaryHeap::new();
    for (&participant, balance) in balances {
        if balance.is_positive() {
            creditors.push((balance.minor(), Reverse(participant)));
        } else if balance.is_negative() {
            debtors.push((-balance.minor(), Reverse(participant)));
        }
    }

    let mut proposals = Vec::new();
    loop {
        let (Some((debt, Reverse(from))), Some((credit, Reverse(to)))) =
            (debtors.pop(), creditors.pop())
        else {
            break;
        };
        let transfer = debt.min(credit);
        proposals.push(SettlementProposal {
            from,
            to,
            amount: Money::new(transfer, currency),
        });
        if debt > transfer {
            debtors.push((debt - transfer, Reverse(from)));
        }
        if credit > transfer {
            creditors.push((credit - transfer, Reverse(to)));
        }
    }
    proposals
}

impl Engine {
    /// Proposed payments that would zero the group's balances.
    pub fn suggest_settlements(&self, group_id: Uuid) -> ResultEngine<Vec<SettlementProposal>> {
        let group = self.group(group_id)?;
        let group = group.read();
        let balances = super::net_balances(group.ledger(), group.currency);
        let proposals = suggest_settlements(&balances, group.currency);
        tracing::debug!(group_id = %group_id, proposals = proposals.len(), "settlement suggestions computed");
        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(minor: i64) -> Money {
        Money::new(minor, Currency::Usd)
    }

    #[test]
    fn greedy_matches_largest_debtor_with_largest_creditor() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let balances = HashMap::from([(a, usd(3000)), (b, usd(-1000)), (c, usd(-2000))]);

        let proposals = suggest_settlements(&balances, Currency::Usd);
        assert_eq!(
            proposals,
            vec![
                SettlementProposal {
                    from: c,
                    to: a,
                    amount: usd(2000)
                },
                SettlementProposal {
                    from: b,
                    to: a,
                    amount: usd(1000)
                },
            ]
        );
    }

    #[test]
    fn at_most_n_minus_one_payments() {
        let participants: Vec<Uuid> = (1..=6).map(Uuid::from_u128).collect();
        let minors = [2500, -700, -300, 900, -1300, -1100];
        let balances: HashMap<Uuid, Money> = participants
            .iter()
            .zip(minors)
            .map(|(&id, minor)| (id, usd(minor)))
            .collect();

        let proposals = suggest_settlements(&balances, Currency::Usd);
        assert!(proposals.len() <= participants.len() - 1);

        // Applying the proposals must zero everyone.
        let mut after: HashMap<Uuid, i64> = participants
            .iter()
            .zip(minors)
            .map(|(&id, minor)| (id, minor))
            .collect();
        for proposal in &proposals {
            *after.get_mut(&proposal.from).unwrap() += proposal.amount.minor();
            *after.get_mut(&proposal.to).unwrap() -= proposal.amount.minor();
        }
        assert!(after.values().all(|minor| *minor == 0));
    }

    #[test]
    fn balanced_group_needs_no_payments() {
        let balances = HashMap::from([(Uuid::from_u128(1), usd(0))]);
        assert!(suggest_settlements(&balances, Currency::Usd).is_empty());
    }

    #[test]
    fn magnitude_ties_break_by_participant_id() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let d = Uuid::from_u128(4);
        // Two equal debtors and two equal creditors.
        let balances = HashMap::from([
            (a, usd(500)),
            (b, usd(500)),
            (c, usd(-500)),
            (d, usd(-500)),
        ]);

        let proposals = suggest_settlements(&balances, Currency::Usd);
        assert_eq!(
            proposals,
            vec![
                SettlementProposal {
                    from: c,
                    to: a,
                    amount: usd(500)
                },
                SettlementProposal {
                    from: d,
                    to: b,
                    amount: usd(500)
                },
            ]
        );
    }
}
