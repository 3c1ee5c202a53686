//! The module contains the errors the engine can throw.
//!
//! Every error is recoverable at the call site: a failed mutation leaves the
//! ledger untouched, so callers can surface the message and retry.

use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("Split mismatch: {0}")]
    SplitMismatch(String),
    #[error("Same participant: {0}")]
    SameParticipant(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Unsettled balance: {0}")]
    UnsettledBalance(String),
}
