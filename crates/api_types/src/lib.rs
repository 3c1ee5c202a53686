//! Wire types shared between the engine's collaborators.
//!
//! The presentation layer submits these as-is; amounts travel as the
//! user-entered decimal strings and are parsed by the engine, while
//! balances come back as integer minor units so no collaborator ever does
//! floating-point money math.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub name: String,
        pub currency: Currency,
        pub member_count: usize,
        pub total_expenses_minor: i64,
        /// Net balance of the requesting user, in minor units.
        pub your_balance_minor: Option<i64>,
    }
}

pub mod participant {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantNew {
        pub display_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub id: Uuid,
        pub display_name: String,
    }
}

pub mod expense {
    use super::*;

    /// How the submitted expense should be divided.
    ///
    /// Weights are integers: basis points for `percentage` (must sum to
    /// 10000), positive counts for `shares`, decimal amount strings for
    /// `exact`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "method", content = "inputs", rename_all = "snake_case")]
    pub enum SplitInput {
        Equal,
        Exact(Vec<ExactShare>),
        Percentage(Vec<WeightedShare>),
        Shares(Vec<WeightedShare>),
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExactShare {
        pub participant_id: Uuid,
        /// User-entered decimal amount, e.g. `"12.34"`.
        pub amount: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct WeightedShare {
        pub participant_id: Uuid,
        pub weight: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub group_id: Uuid,
        pub payer_id: Uuid,
        /// User-entered decimal amount, e.g. `"84.50"`.
        pub amount: String,
        pub split: SplitInput,
        pub participants: Vec<Uuid>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub occurred_at: DateTime<Utc>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementNew {
        pub group_id: Uuid,
        pub from_id: Uuid,
        pub to_id: Uuid,
        /// User-entered decimal amount, e.g. `"16.00"`.
        pub amount: String,
        pub note: Option<String>,
        pub occurred_at: DateTime<Utc>,
    }

    /// A payment suggested by the optimizer; committing it is a separate,
    /// explicit settlement submission.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProposalView {
        pub from_id: Uuid,
        pub to_id: Uuid,
        pub amount_minor: i64,
        pub currency: Currency,
    }
}

pub mod balance {
    use super::*;

    /// Signed net balance: positive is owed, negative owes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NetBalanceView {
        pub participant_id: Uuid,
        pub amount_minor: i64,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PairwiseDebtView {
        pub debtor_id: Uuid,
        pub creditor_id: Uuid,
        pub amount_minor: i64,
        pub currency: Currency,
    }
}

pub mod sync {
    use super::*;

    /// Request for the next slice of the append-only entry stream.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntriesSince {
        pub group_id: Uuid,
        pub cursor: u64,
    }
}
