//! Paid-shares history.
//!
//! Every share marked paid, newest payment first. Each entry names the
//! expense and the member, so it can be reversed with [`set_paid`].
//!
//!  [`set_paid`]: crate::set_paid

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    Expense, ExpenseId, Member, MemberId, Money,
    snapshot::{PaymentView, Snapshot},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaidShare {
    pub expense: ExpenseId,
    pub description: String,
    pub expense_date: DateTime<Utc>,
    /// Who covered the expense and got reimbursed.
    pub payer: MemberId,
    pub payer_name: String,
    /// Who paid their share back.
    pub member: MemberId,
    pub member_name: String,
    pub share: Money,
    /// Payment time; falls back to the expense date for records without one.
    pub paid_at: DateTime<Utc>,
}

pub fn paid_shares(members: &[Member], expenses: &[Expense]) -> Vec<PaidShare> {
    history_from(&Snapshot::resolve(members, expenses, PaymentView::Outstanding))
}

pub(crate) fn history_from(snapshot: &Snapshot<'_>) -> Vec<PaidShare> {
    let mut history = Vec::new();

    for resolved in &snapshot.expenses {
        let expense = resolved.expense;
        let Ok(shares) = expense.shares() else {
            continue;
        };
        for ((member, amount), share) in shares.into_iter().zip(&resolved.shares) {
            if *member == expense.payer || share.outstanding {
                continue;
            }
            let status = expense.payment_status(member);
            history.push(PaidShare {
                expense: expense.id.clone(),
                description: expense.description.clone(),
                expense_date: expense.date,
                payer: expense.payer.clone(),
                payer_name: snapshot.slots[resolved.payer].1.clone(),
                member: member.clone(),
                member_name: snapshot.slots[share.slot].1.clone(),
                share: amount,
                paid_at: status.paid_at.unwrap_or(expense.date),
            });
        }
    }

    history.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
    history
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::set_paid;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn expense(id: &str, amount: i64, payer: &str, split: &[&str]) -> Expense {
        Expense {
            id: id.into(),
            description: format!("expense {id}"),
            amount: Money::new(amount),
            payer: payer.into(),
            split_with: split.iter().copied().map(MemberId::from).collect(),
            date: at(1),
            payments: Default::default(),
        }
    }

    fn members() -> Vec<Member> {
        vec![Member::new("a", "Ada"), Member::new("b", "Bob"), Member::new("c", "Cy")]
    }

    #[test]
    fn lists_paid_shares_newest_first() {
        let e1 = expense("e1", 90_00, "a", &["a", "b", "c"]);
        let e1 = set_paid(&e1, &"b".into(), true, at(3));
        let e1 = set_paid(&e1, &"c".into(), true, at(5));
        let e2 = expense("e2", 30_00, "b", &["b", "c"]);

        let history = paid_shares(&members(), &[e1, e2]);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].member_name, "Cy");
        assert_eq!(history[0].paid_at, at(5));
        assert_eq!(history[1].member_name, "Bob");
        assert_eq!(history[1].payer_name, "Ada");
        assert_eq!(history[1].share, Money::new(30_00));
    }

    #[test]
    fn reversed_payments_and_payer_shares_are_not_listed() {
        let e1 = expense("e1", 10_00, "a", &["a", "b"]);
        let e1 = set_paid(&e1, &"b".into(), true, at(2));
        let e1 = set_paid(&e1, &"b".into(), false, at(3));
        assert!(paid_shares(&members(), &[e1]).is_empty());
    }

    #[test]
    fn missing_timestamp_falls_back_to_expense_date() {
        let mut e1 = expense("e1", 10_00, "a", &["a", "b"]);
        e1.payments.insert(
            "b".into(),
            crate::PaymentStatus {
                paid: true,
                paid_at: None,
            },
        );
        let history = paid_shares(&members(), &[e1]);
        assert_eq!(history[0].paid_at, at(1));
    }
}
