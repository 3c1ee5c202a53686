//! Engine operations, grouped by concern.
//!
//! The pure functions in [`balances`] and [`settle`] work on a ledger
//! snapshot; the `impl Engine` blocks wrap them with group lookup and
//! locking.

mod balances;
mod entries;
mod groups;
mod settle;

pub use balances::{PairwiseDebt, net_balances, pairwise_balances};
pub use groups::GroupSummary;
pub use settle::{SettlementProposal, suggest_settlements};
