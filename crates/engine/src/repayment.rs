//! Settling up with one member.
//!
//! A debtor pays a creditor either everything they owe or a smaller amount.
//! The money is applied to the creditor's expenses oldest first; a share is
//! marked paid only when what is left of the amount covers it entirely.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{EngineError, ExpenseId, Ledger, MemberId, Money, ResultEngine};

/// Outcome of [`Ledger::settle_with`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Repayment {
    pub debtor: MemberId,
    pub creditor: MemberId,
    /// Outstanding debt towards the creditor before the repayment.
    pub owed: Money,
    /// Amount handed over; the whole debt when none was given.
    pub offered: Money,
    /// Sum of the shares marked paid.
    pub applied: Money,
    /// Expenses whose share was marked paid, oldest first.
    pub expenses: Vec<ExpenseId>,
}

impl Repayment {
    /// Part of the offered amount too small to cover any remaining share.
    pub fn unapplied(&self) -> Money {
        self.offered - self.applied
    }
}

impl Ledger {
    /// Outstanding shares `debtor` owes `creditor`, oldest expense first, as
    /// `(index into expenses, share)`.
    fn owed_shares(&self, debtor: &MemberId, creditor: &MemberId) -> Vec<(usize, Money)> {
        let mut owed: Vec<_> = self
            .expenses
            .iter()
            .enumerate()
            .filter(|(_, expense)| expense.payer == *creditor && !expense.is_settled(debtor))
            .filter_map(|(idx, expense)| {
                expense
                    .share_of(debtor)
                    .map(|share| (idx, expense.date, share))
            })
            .collect();
        owed.sort_by_key(|(_, date, _)| *date);
        owed.into_iter().map(|(idx, _, share)| (idx, share)).collect()
    }

    /// What `debtor` still owes `creditor` across all expenses.
    pub fn owed_between(&self, debtor: &MemberId, creditor: &MemberId) -> Money {
        self.owed_shares(debtor, creditor)
            .into_iter()
            .map(|(_, share)| share)
            .sum()
    }

    /// Pay `creditor` back. `amount: None` settles the whole debt; a given
    /// amount must be positive and at most the debt.
    pub fn settle_with(
        &mut self,
        debtor: &MemberId,
        creditor: &MemberId,
        amount: Option<Money>,
        when: DateTime<Utc>,
    ) -> ResultEngine<Repayment> {
        for id in [debtor, creditor] {
            if self.member(id).is_none() {
                return Err(EngineError::KeyNotFound(format!("member {id}")));
            }
        }
        if debtor == creditor {
            return Err(EngineError::InvalidId(format!(
                "member {debtor} cannot settle with themselves"
            )));
        }

        let owed_shares = self.owed_shares(debtor, creditor);
        let owed: Money = owed_shares.iter().map(|(_, share)| *share).sum();
        let offered = match amount {
            None => owed,
            Some(amount) if amount.is_positive() && amount <= owed => amount,
            Some(amount) => {
                return Err(EngineError::InvalidAmount(format!(
                    "{amount} is not between 0.01 and the {owed} owed"
                )));
            }
        };

        let mut remaining = offered;
        let mut expenses = Vec::new();
        for (idx, share) in owed_shares {
            if remaining.is_zero() {
                break;
            }
            if remaining < share {
                continue;
            }
            let expense = &mut self.expenses[idx];
            expense.record_payment(debtor, true, when);
            remaining -= share;
            expenses.push(expense.id.clone());
        }

        let repayment = Repayment {
            debtor: debtor.clone(),
            creditor: creditor.clone(),
            owed,
            offered,
            applied: offered - remaining,
            expenses,
        };
        tracing::info!(
            %debtor,
            %creditor,
            applied = %repayment.applied,
            shares = repayment.expenses.len(),
            "repayment recorded"
        );
        Ok(repayment)
    }
}
