//! Split strategies.
//!
//! A strategy is a pure function from an expense amount and a participant
//! list to per-participant owed amounts. Strategies never touch the ledger;
//! [`Group::record_expense`](crate::Group::record_expense) validates
//! membership, runs the strategy, and appends the result.
//!
//! Every strategy guarantees the shares sum to the amount **exactly**.
//! Proportional variants use the largest-remainder method: each participant
//! gets the floored proportional share, then the leftover minor units go to
//! the largest fractional remainders (ties by participant order).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, SplitMethod};

/// Basis points in a whole (100%).
pub const BPS_TOTAL: u32 = 10_000;

/// How an expense is divided among its participants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "inputs", rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Even split; the first participants absorb the rounding.
    Equal,
    /// Caller-supplied amounts, one per participant, summing to the total.
    Exact(Vec<(Uuid, Money)>),
    /// Integer basis points per participant, summing to [`BPS_TOTAL`].
    Percentage(Vec<(Uuid, u32)>),
    /// Positive integer share counts per participant.
    Shares(Vec<(Uuid, u32)>),
}

impl SplitStrategy {
    /// The method tag recorded on the resulting expense.
    #[must_use]
    pub fn method(&self) -> SplitMethod {
        match self {
            Self::Equal => SplitMethod::Equal,
            Self::Exact(_) => SplitMethod::Exact,
            Self::Percentage(_) => SplitMethod::Percentage,
            Self::Shares(_) => SplitMethod::Shares,
        }
    }

    /// Computes per-participant shares for `amount`.
    ///
    /// `participants` defines both the set of valid share holders and the
    /// order that breaks rounding ties. Keyed variants must cover exactly
    /// that set.
    pub fn compute(
        &self,
        amount: Money,
        participants: &[Uuid],
    ) -> ResultEngine<Vec<(Uuid, Money)>> {
        if participants.is_empty() {
            return Err(EngineError::InvalidParticipant(
                "expense needs at least one participant".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(participants.len());
        for participant in participants {
            if !seen.insert(*participant) {
                return Err(EngineError::InvalidParticipant(format!(
                    "duplicate participant {participant}"
                )));
            }
        }

        match self {
            Self::Equal => {
                let parts = amount.distribute(participants.len())?;
                Ok(participants.iter().copied().zip(parts).collect())
            }
            Self::Exact(amounts) => {
                validate_cover(amounts, &seen)?;
                let mut total = Money::zero(amount.currency());
                for (_, share) in amounts {
                    total = total.add(*share)?;
                }
                if total != amount {
                    return Err(EngineError::SplitMismatch(format!(
                        "exact shares sum to {total}, expected {amount}"
                    )));
                }
                Ok(amounts.clone())
            }
            Self::Percentage(weights) => {
                validate_cover(weights, &seen)?;
                let total: u64 = weights.iter().map(|(_, bps)| u64::from(*bps)).sum();
                if total != u64::from(BPS_TOTAL) {
                    return Err(EngineError::SplitMismatch(format!(
                        "percentages sum to {total} basis points, expected {BPS_TOTAL}"
                    )));
                }
                largest_remainder(amount, weights)
            }
            Self::Shares(counts) => {
                validate_cover(counts, &seen)?;
                if counts.iter().any(|(_, count)| *count == 0) {
                    return Err(EngineError::InvalidAmount(
                        "share counts must be > 0".to_string(),
                    ));
                }
                largest_remainder(amount, counts)
            }
        }
    }
}

/// A keyed input must address exactly the participant set, once each.
fn validate_cover<T>(keyed: &[(Uuid, T)], participants: &HashSet<Uuid>) -> ResultEngine<()> {
    let mut covered = HashSet::with_capacity(keyed.len());
    for (participant, _) in keyed {
        if !participants.contains(participant) {
            return Err(EngineError::InvalidParticipant(format!(
                "{participant} is not an expense participant"
            )));
        }
        if !covered.insert(*participant) {
            return Err(EngineError::InvalidParticipant(format!(
                "duplicate share for {participant}"
            )));
        }
    }
    if covered.len() != participants.len() {
        return Err(EngineError::SplitMismatch(
            "shares must cover every participant".to_string(),
        ));
    }
    Ok(())
}

/// Largest-remainder allocation of `amount` by integer weights.
///
/// Each participant gets `floor(amount * weight / total)`; the minor units
/// lost to flooring are handed out one-by-one in descending order of
/// fractional remainder, ties broken by input order.
fn largest_remainder(amount: Money, weights: &[(Uuid, u32)]) -> ResultEngine<Vec<(Uuid, Money)>> {
    let total: i64 = weights.iter().map(|(_, weight)| i64::from(*weight)).sum();
    if total <= 0 {
        return Err(EngineError::InvalidAmount(
            "weights must sum to > 0".to_string(),
        ));
    }

    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    let mut allocated: i64 = 0;
    for (index, (participant, weight)) in weights.iter().enumerate() {
        let floored = amount.multiply_by_ratio(i64::from(*weight), total)?;
        let remainder =
            (i128::from(amount.minor()) * i128::from(*weight)).rem_euclid(i128::from(total));
        allocated += floored.minor();
        shares.push((*participant, floored));
        remainders.push((remainder, index));
    }

    let mut leftover = amount.minor() - allocated;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, index) in remainders {
        if leftover == 0 {
            break;
        }
        let (participant, share) = shares[index];
        shares[index] = (participant, Money::new(share.minor() + 1, amount.currency()));
        leftover -= 1;
    }

    Ok(shares)
}
