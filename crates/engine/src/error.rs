//! The module contains the errors the engine can return.
//!
//! Hard errors ([`EngineError`]) are returned by strict validation and by the
//! payment overlay when ids do not resolve. Settlement computations never fail:
//! they skip malformed records and report them as [`LedgerWarning`]s.
//!
//! - [`InvalidExpense`] an expense with no split members or a non-positive
//!   amount.
//! - [`UnknownMemberReference`] an expense naming a member missing from the
//!   snapshot.
//! - [`KeyNotFound`] an id that does not resolve.
//!
//!  [`InvalidExpense`]: EngineError::InvalidExpense
//!  [`UnknownMemberReference`]: EngineError::UnknownMemberReference
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{ExpenseId, MemberId};

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Unknown member reference: {0}")]
    UnknownMemberReference(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
}

/// A malformed record skipped (or re-routed) while deriving settlement values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerWarning {
    InvalidExpense {
        expense: ExpenseId,
        reason: String,
    },
    UnknownMemberReference {
        expense: ExpenseId,
        member: MemberId,
    },
}

impl fmt::Display for LedgerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidExpense { expense, reason } => {
                write!(f, "expense {expense} skipped: {reason}")
            }
            Self::UnknownMemberReference { expense, member } => {
                write!(f, "expense {expense} references unknown member {member}")
            }
        }
    }
}

impl From<LedgerWarning> for EngineError {
    fn from(value: LedgerWarning) -> Self {
        match value {
            LedgerWarning::InvalidExpense { .. } => Self::InvalidExpense(value.to_string()),
            LedgerWarning::UnknownMemberReference { .. } => {
                Self::UnknownMemberReference(value.to_string())
            }
        }
    }
}
