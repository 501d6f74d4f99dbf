//! Expense primitives.
//!
//! An [`Expense`] is a purchase paid by one member and split evenly among a
//! set of members. Shares are computed in minor units with a single policy:
//! `amount / n` each, the leftover cents going one each to the first
//! participants in `split_with` order, so shares always sum to `amount`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ExpenseId, MemberId, Money, PaymentStatus, ResultEngine,
    util::{dedup_members, normalize_optional_text},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(default)]
    pub description: String,
    /// Total paid, in minor units. Must be positive.
    pub amount: Money,
    pub payer: MemberId,
    /// Members sharing the cost. Order matters only for the leftover cents;
    /// duplicates are ignored.
    pub split_with: Vec<MemberId>,
    #[serde(default = "chrono::Utc::now")]
    pub date: DateTime<Utc>,
    /// Sparse payment overlay: no entry means the share is outstanding.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub payments: BTreeMap<MemberId, PaymentStatus>,
}

impl Expense {
    /// Largest accepted amount: ten billion in major units. Keeps every sum a
    /// ledger can realistically hold far away from the `i64` bounds.
    pub const MAX_AMOUNT: Money = Money::new(1_000_000_000_000);

    /// Build a validated expense with a fresh id, dated now.
    pub fn new(
        description: Option<&str>,
        amount: Money,
        payer: MemberId,
        split_with: Vec<MemberId>,
    ) -> ResultEngine<Self> {
        let expense = Self {
            id: ExpenseId::generate(),
            description: normalize_optional_text(description),
            amount,
            payer,
            split_with,
            date: Utc::now(),
            payments: BTreeMap::new(),
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Members sharing this expense, first occurrence order, without
    /// duplicates.
    pub fn participants(&self) -> Vec<&MemberId> {
        dedup_members(&self.split_with)
    }

    /// Checks the preconditions share computation relies on.
    pub fn validate(&self) -> ResultEngine<()> {
        if let Some(reason) = self.invalid_reason() {
            return Err(EngineError::InvalidExpense(format!(
                "expense {}: {reason}",
                self.id
            )));
        }
        Ok(())
    }

    pub(crate) fn invalid_reason(&self) -> Option<&'static str> {
        if self.split_with.is_empty() {
            Some("split_with must not be empty")
        } else if !self.amount.is_positive() {
            Some("amount must be > 0")
        } else if self.amount > Self::MAX_AMOUNT {
            Some("amount exceeds the maximum")
        } else {
            None
        }
    }

    /// Every participant's share, in participant order.
    pub fn shares(&self) -> ResultEngine<Vec<(&MemberId, Money)>> {
        self.validate()?;
        let participants = self.participants();
        let shares = self
            .amount
            .split_evenly(participants.len())
            .ok_or_else(|| EngineError::InvalidExpense(format!("expense {}", self.id)))?;
        Ok(participants.into_iter().zip(shares).collect())
    }

    /// Share owed by `member`, `None` if they do not take part.
    pub fn share_of(&self, member: &MemberId) -> Option<Money> {
        self.shares()
            .ok()?
            .into_iter()
            .find_map(|(id, share)| (id == member).then_some(share))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<MemberId> {
        raw.iter().copied().map(MemberId::from).collect()
    }

    #[test]
    fn new_rejects_empty_split_and_non_positive_amount() {
        let err = Expense::new(None, Money::new(100), "a".into(), vec![]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidExpense(_)));

        let err = Expense::new(None, Money::ZERO, "a".into(), ids(&["a"])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidExpense(_)));
    }

    #[test]
    fn amounts_above_the_cap_are_invalid() {
        assert!(Expense::new(None, Expense::MAX_AMOUNT, "a".into(), ids(&["a", "b"])).is_ok());
        let over = Expense::MAX_AMOUNT + Money::new(1);
        let err = Expense::new(None, over, "a".into(), ids(&["a", "b"])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidExpense(msg) if msg.contains("maximum")));
    }

    #[test]
    fn leftover_cents_go_to_first_participants() {
        let expense =
            Expense::new(Some("taxi"), Money::new(1_000), "a".into(), ids(&["c", "a", "b"]))
                .unwrap();
        let shares: Vec<(&str, i64)> = expense
            .shares()
            .unwrap()
            .into_iter()
            .map(|(id, share)| (id.as_str(), share.cents()))
            .collect();
        assert_eq!(shares, vec![("c", 334), ("a", 333), ("b", 333)]);
    }

    #[test]
    fn duplicated_participants_count_once() {
        let expense =
            Expense::new(None, Money::new(100), "a".into(), ids(&["a", "b", "a"])).unwrap();
        assert_eq!(expense.participants().len(), 2);
        assert_eq!(expense.share_of(&"a".into()), Some(Money::new(50)));
        assert_eq!(expense.share_of(&"z".into()), None);
    }

    #[test]
    fn description_is_trimmed() {
        let expense = Expense::new(Some("  pizza "), Money::new(100), "a".into(), ids(&["a"]))
            .unwrap();
        assert_eq!(expense.description, "pizza");
    }
}
