//! Per-member summary: what each member paid, what their shares add up to,
//! and who they still owe (or are owed by), expense by expense.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    Expense, ExpenseId, Member, MemberId, Money,
    snapshot::{PaymentView, Snapshot},
};

/// Outstanding amount towards one other member, with the expenses behind it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Counterparty {
    pub member: MemberId,
    pub name: String,
    pub amount: Money,
    pub expenses: Vec<ExpenseId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub member: MemberId,
    pub name: String,
    /// Sum of the expenses this member paid for.
    pub total_paid: Money,
    /// Sum of this member's shares, paid or not.
    pub total_share: Money,
    /// Outstanding debts of this member, per creditor.
    pub owes_to: Vec<Counterparty>,
    /// Outstanding credits of this member, per debtor.
    pub owed_by: Vec<Counterparty>,
}

impl MemberSummary {
    pub fn total_owes(&self) -> Money {
        self.owes_to.iter().map(|c| c.amount).sum()
    }

    pub fn will_collect(&self) -> Money {
        self.owed_by.iter().map(|c| c.amount).sum()
    }

    /// `will_collect - total_owes`; equals the outstanding balance.
    pub fn net_balance(&self) -> Money {
        self.will_collect() - self.total_owes()
    }

    /// Nothing outstanding in either direction.
    pub fn is_clear(&self) -> bool {
        self.owes_to.is_empty() && self.owed_by.is_empty()
    }
}

/// One summary per member, in member-list order.
pub fn member_summaries(members: &[Member], expenses: &[Expense]) -> Vec<MemberSummary> {
    summaries_from(&Snapshot::resolve(members, expenses, PaymentView::Outstanding))
}

#[derive(Default)]
struct Acc {
    total_paid: Money,
    total_share: Money,
    owes_to: BTreeMap<usize, (Money, Vec<ExpenseId>)>,
    owed_by: BTreeMap<usize, (Money, Vec<ExpenseId>)>,
}

pub(crate) fn summaries_from(snapshot: &Snapshot<'_>) -> Vec<MemberSummary> {
    let mut accs: Vec<Acc> = (0..snapshot.slots.len()).map(|_| Acc::default()).collect();

    for resolved in &snapshot.expenses {
        let id = &resolved.expense.id;
        accs[resolved.payer].total_paid += resolved.expense.amount;
        for share in &resolved.shares {
            accs[share.slot].total_share += share.amount;
            if !share.outstanding || share.slot == resolved.payer {
                continue;
            }
            let debt = accs[share.slot].owes_to.entry(resolved.payer).or_default();
            debt.0 += share.amount;
            debt.1.push(id.clone());
            let credit = accs[resolved.payer].owed_by.entry(share.slot).or_default();
            credit.0 += share.amount;
            credit.1.push(id.clone());
        }
    }

    let counterparties = |entries: BTreeMap<usize, (Money, Vec<ExpenseId>)>| {
        entries
            .into_iter()
            .map(|(slot, (amount, expenses))| Counterparty {
                member: snapshot.slots[slot].0.clone(),
                name: snapshot.slots[slot].1.clone(),
                amount,
                expenses,
            })
            .collect::<Vec<_>>()
    };

    snapshot
        .slots
        .iter()
        .zip(accs)
        .filter(|((member, _), _)| !member.is_unknown())
        .map(|((member, name), acc)| MemberSummary {
            member: member.clone(),
            name: name.clone(),
            total_paid: acc.total_paid,
            total_share: acc.total_share,
            owes_to: counterparties(acc.owes_to),
            owed_by: counterparties(acc.owed_by),
        })
        .collect()
}
