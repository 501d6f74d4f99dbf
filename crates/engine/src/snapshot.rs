//! Resolution of a members/expenses snapshot into slot-indexed shares.
//!
//! Balances, the debt matrix and member summaries all walk the same resolved
//! view, so malformed records are skipped (and reported) in exactly one place.

use std::collections::HashMap;

use crate::{Expense, LedgerWarning, Member, MemberId, Money};

/// Which shares count when deriving values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentView {
    /// Honor the payment overlay: paid shares are gone.
    #[default]
    Outstanding,
    /// Ignore the overlay: every share counts.
    Gross,
}

pub(crate) const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug)]
pub(crate) struct Share {
    pub slot: usize,
    pub amount: Money,
    pub outstanding: bool,
}

#[derive(Debug)]
pub(crate) struct ResolvedExpense<'a> {
    pub expense: &'a Expense,
    pub payer: usize,
    pub shares: Vec<Share>,
}

/// Members (plus the synthetic unknown bucket, when used) and the valid
/// expenses expressed in slot indexes.
#[derive(Debug)]
pub(crate) struct Snapshot<'a> {
    pub slots: Vec<(MemberId, String)>,
    pub expenses: Vec<ResolvedExpense<'a>>,
    pub warnings: Vec<LedgerWarning>,
}

impl<'a> Snapshot<'a> {
    pub fn resolve(members: &[Member], expenses: &'a [Expense], view: PaymentView) -> Self {
        let mut slots: Vec<(MemberId, String)> = Vec::with_capacity(members.len() + 1);
        let mut positions: HashMap<MemberId, usize> = HashMap::with_capacity(members.len());
        for member in members {
            if positions.contains_key(&member.id) {
                tracing::debug!(member = %member.id, "duplicated member in snapshot, keeping first");
                continue;
            }
            positions.insert(member.id.clone(), slots.len());
            slots.push((member.id.clone(), member.name.clone()));
        }

        let unknown_slot = slots.len();
        let mut unknown_used = false;
        let mut warnings = Vec::new();
        let mut resolved = Vec::with_capacity(expenses.len());

        for expense in expenses {
            let shares = match expense.shares() {
                Ok(shares) => shares,
                Err(_) => {
                    let reason = expense
                        .invalid_reason()
                        .unwrap_or("shares cannot be computed")
                        .to_string();
                    tracing::warn!(expense = %expense.id, %reason, "skipping invalid expense");
                    warnings.push(LedgerWarning::InvalidExpense {
                        expense: expense.id.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let mut slot_of = |id: &MemberId| -> usize {
                if let Some(slot) = positions.get(id) {
                    return *slot;
                }
                if !warnings.iter().any(|w| {
                    matches!(w, LedgerWarning::UnknownMemberReference { expense: e, member }
                        if *e == expense.id && member == id)
                }) {
                    tracing::warn!(expense = %expense.id, member = %id, "expense references unknown member");
                    warnings.push(LedgerWarning::UnknownMemberReference {
                        expense: expense.id.clone(),
                        member: id.clone(),
                    });
                }
                unknown_used = true;
                unknown_slot
            };

            let payer = slot_of(&expense.payer);
            let shares = shares
                .into_iter()
                .map(|(member, amount)| Share {
                    slot: slot_of(member),
                    amount,
                    outstanding: match view {
                        PaymentView::Outstanding => !expense.is_settled(member),
                        PaymentView::Gross => *member != expense.payer,
                    },
                })
                .collect();

            resolved.push(ResolvedExpense {
                expense,
                payer,
                shares,
            });
        }

        if unknown_used {
            slots.push((MemberId::unknown(), UNKNOWN_NAME.to_string()));
        }

        Self {
            slots,
            expenses: resolved,
            warnings,
        }
    }
}
