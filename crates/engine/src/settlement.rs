//! Settlement simplifier.
//!
//! Collapses the web of debts behind a set of balances into a short list of
//! payments that, once all executed, zero every balance.
//!
//! The algorithm is a deterministic greedy two-pointer match between debtors
//! and creditors, both taken in balance order (member-list order). It yields at
//! most `n - 1` transfers for `n` members with a non-zero balance; it does not
//! search for the global minimum, which is NP-hard in general. Different input
//! orders can produce different, equally valid plans, so the order of the
//! balances is part of the contract.

use serde::{Deserialize, Serialize};

use crate::{Balances, MemberId, Money, balances::EPSILON};

/// "`from` should pay `to` `amount`".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementPlan {
    transactions: Vec<SettlementTransaction>,
}

impl SettlementPlan {
    pub fn transactions(&self) -> &[SettlementTransaction] {
        &self.transactions
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettlementTransaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Total money moved by the plan.
    pub fn total(&self) -> Money {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }

    /// Balances after every transfer has been executed: the payer's debt
    /// shrinks, the receiver's credit shrinks.
    pub fn replay(&self, balances: &Balances) -> Balances {
        let mut after = balances.clone();
        for tx in &self.transactions {
            after.adjust(&tx.from, tx.amount);
            after.adjust(&tx.to, -tx.amount);
        }
        after
    }
}

impl<'a> IntoIterator for &'a SettlementPlan {
    type Item = &'a SettlementTransaction;
    type IntoIter = std::slice::Iter<'a, SettlementTransaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Builds the settlement plan for `balances`. Never fails; an all-settled
/// ledger yields an empty plan.
pub fn simplify(balances: &Balances) -> SettlementPlan {
    let mut debtors: Vec<(&MemberId, Money)> = balances
        .iter()
        .filter(|entry| entry.balance < -EPSILON)
        .map(|entry| (&entry.member, -entry.balance))
        .collect();
    let mut creditors: Vec<(&MemberId, Money)> = balances
        .iter()
        .filter(|entry| entry.balance > EPSILON)
        .map(|entry| (&entry.member, entry.balance))
        .collect();

    let mut transactions = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let settle = debtors[i].1.min(creditors[j].1);
        if settle > EPSILON {
            transactions.push(SettlementTransaction {
                from: debtors[i].0.clone(),
                to: creditors[j].0.clone(),
                amount: settle,
            });
        }

        debtors[i].1 -= settle;
        creditors[j].1 -= settle;

        if debtors[i].1 <= EPSILON {
            i += 1;
        }
        if creditors[j].1 <= EPSILON {
            j += 1;
        }
    }

    let leftover: Money = debtors[i..]
        .iter()
        .chain(&creditors[j..])
        .map(|(_, amount)| *amount)
        .sum();
    if !leftover.is_zero() {
        tracing::debug!(%leftover, "unmatched residue discarded by settlement");
    }

    SettlementPlan { transactions }
}
