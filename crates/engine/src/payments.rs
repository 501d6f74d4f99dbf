//! Payment-status overlay.
//!
//! Every component deriving balances asks this module whether a share is
//! still outstanding; nothing computes from raw amounts on its own.
//!
//! - a share is outstanding until explicitly marked paid;
//! - marking it unpaid removes the entry, restoring the never-paid state;
//! - re-applying the current state changes nothing;
//! - the payer's own share is always settled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Expense, MemberId};

/// Payment record of one member's share in one expense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Whether `member`'s share of `expense` no longer counts as outstanding.
pub fn is_settled(expense: &Expense, member: &MemberId) -> bool {
    expense.is_settled(member)
}

/// Returns a copy of `expense` with `member`'s payment flag set to `paid`.
pub fn set_paid(expense: &Expense, member: &MemberId, paid: bool, when: DateTime<Utc>) -> Expense {
    let mut updated = expense.clone();
    updated.record_payment(member, paid, when);
    updated
}

impl Expense {
    pub fn is_settled(&self, member: &MemberId) -> bool {
        if *member == self.payer {
            return true;
        }
        self.payments
            .get(member)
            .is_some_and(|status| status.paid)
    }

    pub fn payment_status(&self, member: &MemberId) -> PaymentStatus {
        self.payments.get(member).copied().unwrap_or_default()
    }

    /// In-place variant of [`set_paid`]. Returns `true` when the overlay
    /// changed.
    pub fn record_payment(&mut self, member: &MemberId, paid: bool, when: DateTime<Utc>) -> bool {
        let current = self.payments.get(member).copied();
        match (current, paid) {
            (Some(status), _) if status.paid == paid => false,
            (None, false) => false,
            (_, true) => {
                self.payments.insert(
                    member.clone(),
                    PaymentStatus {
                        paid: true,
                        paid_at: Some(when),
                    },
                );
                true
            }
            (Some(_), false) => {
                self.payments.remove(member);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::Money;

    fn expense() -> Expense {
        Expense::new(
            Some("dinner"),
            Money::new(100_00),
            "a".into(),
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn shares_are_outstanding_by_default() {
        let e = expense();
        assert!(!is_settled(&e, &"b".into()));
        assert!(!is_settled(&e, &"c".into()));
    }

    #[test]
    fn payer_is_always_settled() {
        let mut e = expense();
        assert!(is_settled(&e, &"a".into()));
        e.payments.insert(
            "a".into(),
            PaymentStatus {
                paid: false,
                paid_at: None,
            },
        );
        assert!(is_settled(&e, &"a".into()));
        let e = set_paid(&e, &"a".into(), false, at(9));
        assert!(is_settled(&e, &"a".into()));
    }

    #[test]
    fn paying_then_reversing_clears_the_timestamp() {
        let b: MemberId = "b".into();
        let paid = set_paid(&expense(), &b, true, at(9));
        assert!(is_settled(&paid, &b));
        assert_eq!(paid.payment_status(&b).paid_at, Some(at(9)));

        let reversed = set_paid(&paid, &b, false, at(10));
        assert!(!is_settled(&reversed, &b));
        assert_eq!(reversed.payment_status(&b).paid_at, None);
    }

    #[test]
    fn reversal_restores_the_unpaid_record() {
        let b: MemberId = "b".into();
        let fresh = expense();
        let reversed = set_paid(&set_paid(&fresh, &b, true, at(9)), &b, false, at(10));
        assert!(reversed.payments.is_empty());
        assert_eq!(reversed, fresh);
    }

    #[test]
    fn stored_unpaid_entries_are_cleared_on_reversal() {
        let b: MemberId = "b".into();
        let mut e = expense();
        e.payments.insert(b.clone(), PaymentStatus::default());
        assert!(!e.record_payment(&b, false, at(9)));
        assert!(e.record_payment(&b, true, at(9)));
        assert!(e.record_payment(&b, false, at(10)));
        assert!(!e.payments.contains_key(&b));
    }

    #[test]
    fn reapplying_the_same_state_is_a_no_op() {
        let b: MemberId = "b".into();
        let paid = set_paid(&expense(), &b, true, at(9));
        let paid_again = set_paid(&paid, &b, true, at(9) + Duration::hours(3));
        assert_eq!(paid, paid_again);

        let once = set_paid(&paid, &b, false, at(11));
        let twice = set_paid(&once, &b, false, at(12));
        assert_eq!(once, twice);

        let untouched = expense();
        assert_eq!(set_paid(&untouched, &b, false, at(9)).payments, untouched.payments);
    }

    #[test]
    fn set_paid_does_not_touch_other_members() {
        let paid = set_paid(&expense(), &"b".into(), true, at(9));
        assert!(!is_settled(&paid, &"c".into()));
    }
}
