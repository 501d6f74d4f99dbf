//! Balance calculator.
//!
//! Reduces a snapshot to one signed balance per member: positive when the
//! group owes the member, negative when the member owes the group.

use serde::Serialize;

use crate::{
    Expense, LedgerWarning, Member, MemberId, Money,
    snapshot::{PaymentView, Snapshot},
};

/// Below this magnitude a balance is treated as zero.
///
/// Amounts are integer cents, so the tolerance is exact zero.
pub const EPSILON: Money = Money::ZERO;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// The group owes this member.
    Owed,
    /// This member owes the group.
    Owing,
    Settled,
}

impl BalanceStatus {
    pub fn of(balance: Money) -> Self {
        if balance > EPSILON {
            Self::Owed
        } else if balance < -EPSILON {
            Self::Owing
        } else {
            Self::Settled
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    pub member: MemberId,
    pub name: String,
    pub balance: Money,
}

impl MemberBalance {
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::of(self.balance)
    }
}

/// Per-member balances in member-list order, followed by the unknown bucket
/// when some expense referenced a member outside the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Balances {
    entries: Vec<MemberBalance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<LedgerWarning>,
}

impl Balances {
    pub fn get(&self, member: &MemberId) -> Option<Money> {
        self.entries
            .iter()
            .find(|entry| entry.member == *member)
            .map(|entry| entry.balance)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero for any snapshot.
    pub fn total(&self) -> Money {
        self.entries.iter().map(|entry| entry.balance).sum()
    }

    /// Members whose balance is not zero.
    pub fn non_zero(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status() != BalanceStatus::Settled)
            .count()
    }

    pub fn warnings(&self) -> &[LedgerWarning] {
        &self.warnings
    }

    pub(crate) fn adjust(&mut self, member: &MemberId, delta: Money) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.member == *member) {
            entry.balance += delta;
        }
    }
}

impl FromIterator<(MemberId, Money)> for Balances {
    /// Build balances from raw pairs; names default to the id.
    fn from_iter<T: IntoIterator<Item = (MemberId, Money)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(member, balance)| MemberBalance {
                    name: member.to_string(),
                    member,
                    balance,
                })
                .collect(),
            warnings: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a MemberBalance;
    type IntoIter = std::slice::Iter<'a, MemberBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Outstanding balances: paid shares no longer count.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Balances {
    balances_from(&Snapshot::resolve(members, expenses, PaymentView::Outstanding))
}

/// Balances ignoring the payment overlay (every share still owed).
pub fn compute_gross_balances(members: &[Member], expenses: &[Expense]) -> Balances {
    balances_from(&Snapshot::resolve(members, expenses, PaymentView::Gross))
}

pub(crate) fn balances_from(snapshot: &Snapshot<'_>) -> Balances {
    let mut totals = vec![Money::ZERO; snapshot.slots.len()];

    for resolved in &snapshot.expenses {
        totals[resolved.payer] += resolved.expense.amount;
        for share in &resolved.shares {
            if share.outstanding {
                totals[share.slot] -= share.amount;
            } else {
                // Self-share, or a share already reimbursed to the payer.
                totals[resolved.payer] -= share.amount;
            }
        }
    }

    Balances {
        entries: snapshot
            .slots
            .iter()
            .zip(totals)
            .map(|((member, name), balance)| MemberBalance {
                member: member.clone(),
                name: name.clone(),
                balance,
            })
            .collect(),
        warnings: snapshot.warnings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::set_paid;

    fn members(ids: &[&str]) -> Vec<Member> {
        ids.iter().map(|id| Member::new(*id, id.to_uppercase())).collect()
    }

    fn expense(id: &str, amount: i64, payer: &str, split: &[&str]) -> Expense {
        Expense {
            id: id.into(),
            description: String::new(),
            amount: Money::new(amount),
            payer: payer.into(),
            split_with: split.iter().copied().map(MemberId::from).collect(),
            date: Utc::now(),
            payments: Default::default(),
        }
    }

    #[test]
    fn idle_members_are_listed_as_settled() {
        let balances = compute_balances(&members(&["a", "b", "c"]), &[expense("e", 100, "a", &["a", "b"])]);
        assert_eq!(balances.len(), 3);
        assert_eq!(balances.get(&"c".into()), Some(Money::ZERO));
        let c = balances.iter().find(|b| b.member.as_str() == "c").unwrap();
        assert_eq!(c.status(), BalanceStatus::Settled);
    }

    #[test]
    fn payer_outside_the_split_is_credited_in_full() {
        let balances = compute_balances(&members(&["a", "b", "c"]), &[expense("e", 90, "a", &["b", "c"])]);
        assert_eq!(balances.get(&"a".into()), Some(Money::new(90)));
        assert_eq!(balances.get(&"b".into()), Some(Money::new(-45)));
        assert_eq!(balances.get(&"c".into()), Some(Money::new(-45)));
    }

    #[test]
    fn paid_share_is_removed_from_both_sides() {
        let e = expense("e", 90, "a", &["a", "b", "c"]);
        let e = set_paid(&e, &"b".into(), true, Utc::now());
        let members = members(&["a", "b", "c"]);

        let outstanding = compute_balances(&members, std::slice::from_ref(&e));
        assert_eq!(outstanding.get(&"a".into()), Some(Money::new(30)));
        assert_eq!(outstanding.get(&"b".into()), Some(Money::ZERO));
        assert_eq!(outstanding.get(&"c".into()), Some(Money::new(-30)));
        assert_eq!(outstanding.total(), Money::ZERO);

        let gross = compute_gross_balances(&members, &[e]);
        assert_eq!(gross.get(&"a".into()), Some(Money::new(60)));
        assert_eq!(gross.get(&"b".into()), Some(Money::new(-30)));
    }

    #[test]
    fn invalid_expense_does_not_blank_the_ledger() {
        let balances = compute_balances(
            &members(&["a", "b"]),
            &[expense("bad", 100, "a", &[]), expense("ok", 100, "a", &["a", "b"])],
        );
        assert_eq!(balances.get(&"b".into()), Some(Money::new(-50)));
        assert_eq!(balances.warnings().len(), 1);
    }

    #[test]
    fn unknown_members_are_booked_in_a_bucket() {
        let balances = compute_balances(&members(&["a"]), &[expense("e", 100, "a", &["a", "gone"])]);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get(&MemberId::unknown()), Some(Money::new(-50)));
        assert_eq!(balances.total(), Money::ZERO);
    }

    #[test]
    fn status_follows_the_sign() {
        assert_eq!(BalanceStatus::of(Money::new(1)), BalanceStatus::Owed);
        assert_eq!(BalanceStatus::of(Money::new(-1)), BalanceStatus::Owing);
        assert_eq!(BalanceStatus::of(Money::ZERO), BalanceStatus::Settled);
    }
}
