//! In-memory storage collaborator.
//!
//! Members and expenses live per group behind a single `RwLock`. Every write
//! (including a payment toggle) is a read-modify-write of one record under the
//! write lock, so concurrent toggles on different members of the same expense
//! never lose an update.

use std::{collections::HashSet, future::Future, path::Path};

use chrono::{DateTime, Utc};
use engine::{
    EngineError, Expense, ExpenseId, Group, GroupId, Ledger, LedgerReport, Member, MemberId, Money,
    Repayment, ResultEngine,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// What the settlement engine needs from storage.
pub trait LedgerStore: Send + Sync {
    fn list_members(&self, group: &GroupId)
    -> impl Future<Output = ResultEngine<Vec<Member>>> + Send;

    fn list_expenses(
        &self,
        group: &GroupId,
    ) -> impl Future<Output = ResultEngine<Vec<Expense>>> + Send;

    /// Atomically set one member's payment flag on one expense.
    fn set_expense_payment_flag(
        &self,
        expense: &ExpenseId,
        member: &MemberId,
        paid: bool,
    ) -> impl Future<Output = ResultEngine<Expense>> + Send;
}

/// Fetch a fresh snapshot and derive the full report from it.
pub async fn settlement_report<S: LedgerStore>(
    store: &S,
    group: &GroupId,
) -> ResultEngine<LedgerReport> {
    let members = store.list_members(group).await?;
    let expenses = store.list_expenses(group).await?;
    Ok(Ledger::new(members, expenses).report())
}

/// A group with its ledger, as persisted in seed files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupLedger {
    #[serde(flatten)]
    pub group: Group,
    #[serde(flatten)]
    pub ledger: Ledger,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub groups: Vec<GroupLedger>,
}

/// Fields to change on an existing expense.
#[derive(Debug, Default)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub payer: Option<MemberId>,
    pub split_with: Option<Vec<MemberId>>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed seed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid seed: {0}")]
    Engine(#[from] EngineError),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: RwLock<Vec<GroupLedger>>,
}

fn group_mut<'a>(groups: &'a mut [GroupLedger], id: &GroupId) -> ResultEngine<&'a mut GroupLedger> {
    groups
        .iter_mut()
        .find(|g| g.group.id == *id)
        .ok_or_else(|| EngineError::KeyNotFound(format!("group {id}")))
}

fn group_ref<'a>(groups: &'a [GroupLedger], id: &GroupId) -> ResultEngine<&'a GroupLedger> {
    groups
        .iter()
        .find(|g| g.group.id == *id)
        .ok_or_else(|| EngineError::KeyNotFound(format!("group {id}")))
}

/// New expenses may only reference current members.
fn ensure_members(ledger: &Ledger, payer: &MemberId, split_with: &[MemberId]) -> ResultEngine<()> {
    for id in std::iter::once(payer).chain(split_with) {
        if ledger.member(id).is_none() {
            return Err(EngineError::UnknownMemberReference(format!(
                "member {id} is not part of the group"
            )));
        }
    }
    Ok(())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed data. Group ids and expense ids must be unique
    /// across the whole seed, so an expense id names exactly one record.
    pub fn with_seed(seed: Seed) -> ResultEngine<Self> {
        let mut groups = HashSet::new();
        let mut expenses = HashSet::new();
        for entry in &seed.groups {
            if !groups.insert(&entry.group.id) {
                return Err(EngineError::ExistingKey(format!("group {}", entry.group.id)));
            }
            for expense in &entry.ledger.expenses {
                if !expenses.insert(&expense.id) {
                    return Err(EngineError::ExistingKey(format!("expense {}", expense.id)));
                }
            }
        }
        tracing::info!(groups = seed.groups.len(), "store seeded");
        Ok(Self {
            groups: RwLock::new(seed.groups),
        })
    }

    /// Load a JSON seed file (`{"groups": [...]}`).
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&raw)?;
        Ok(Self::with_seed(seed)?)
    }

    pub async fn list_groups(&self) -> Vec<Group> {
        self.groups
            .read()
            .await
            .iter()
            .map(|g| g.group.clone())
            .collect()
    }

    pub async fn create_group(&self, name: &str) -> ResultEngine<Group> {
        let group = Group::named(name)?;
        let mut groups = self.groups.write().await;
        if groups.iter().any(|g| g.group.name == group.name) {
            return Err(EngineError::ExistingKey(group.name));
        }
        groups.push(GroupLedger {
            group: group.clone(),
            ledger: Ledger::default(),
        });
        tracing::info!(group = %group.id, "group created");
        Ok(group)
    }

    pub async fn add_member(&self, group: &GroupId, name: &str) -> ResultEngine<Member> {
        let member = Member::named(name)?;
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        entry.ledger.members.push(member.clone());
        Ok(member)
    }

    /// Removes the member; past expenses keep referencing the id.
    pub async fn remove_member(&self, group: &GroupId, member: &MemberId) -> ResultEngine<()> {
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        let before = entry.ledger.members.len();
        entry.ledger.members.retain(|m| m.id != *member);
        if entry.ledger.members.len() == before {
            return Err(EngineError::KeyNotFound(format!("member {member}")));
        }
        Ok(())
    }

    pub async fn add_expense(
        &self,
        group: &GroupId,
        mut expense: Expense,
    ) -> ResultEngine<Expense> {
        expense.validate()?;
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        ensure_members(&entry.ledger, &expense.payer, &expense.split_with)?;
        expense.payments.clear();
        entry.ledger.expenses.push(expense.clone());
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        group: &GroupId,
        id: &ExpenseId,
        changes: ExpenseChanges,
    ) -> ResultEngine<Expense> {
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        let current = entry
            .ledger
            .expense(id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;

        let mut updated = current.clone();
        if let Some(description) = changes.description {
            updated.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            updated.amount = amount;
        }
        if let Some(payer) = changes.payer {
            updated.payer = payer;
        }
        if let Some(split_with) = changes.split_with {
            updated.split_with = split_with;
        }
        if let Some(date) = changes.date {
            updated.date = date;
        }
        // Payment entries of members no longer sharing the cost are dropped.
        let participants: Vec<MemberId> =
            updated.participants().into_iter().cloned().collect();
        updated.payments.retain(|member, _| participants.contains(member));

        updated.validate()?;
        ensure_members(&entry.ledger, &updated.payer, &updated.split_with)?;

        if let Some(slot) = entry.ledger.expenses.iter_mut().find(|e| e.id == *id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_expense(&self, group: &GroupId, id: &ExpenseId) -> ResultEngine<()> {
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        let before = entry.ledger.expenses.len();
        entry.ledger.expenses.retain(|e| e.id != *id);
        if entry.ledger.expenses.len() == before {
            return Err(EngineError::KeyNotFound(format!("expense {id}")));
        }
        Ok(())
    }

    /// Payment toggle scoped to one group.
    pub async fn set_payment(
        &self,
        group: &GroupId,
        expense: &ExpenseId,
        member: &MemberId,
        paid: bool,
    ) -> ResultEngine<Expense> {
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        record_payment(&mut entry.ledger, expense, member, paid)
    }

    /// Apply a repayment from `debtor` to `creditor`; `amount: None` settles
    /// the whole debt.
    pub async fn settle_with(
        &self,
        group: &GroupId,
        debtor: &MemberId,
        creditor: &MemberId,
        amount: Option<Money>,
    ) -> ResultEngine<Repayment> {
        let mut groups = self.groups.write().await;
        let entry = group_mut(&mut groups, group)?;
        entry
            .ledger
            .settle_with(debtor, creditor, amount, Utc::now())
    }
}

fn record_payment(
    ledger: &mut Ledger,
    expense: &ExpenseId,
    member: &MemberId,
    paid: bool,
) -> ResultEngine<Expense> {
    if ledger.set_paid(expense, member, paid, Utc::now())? {
        tracing::info!(%expense, %member, paid, "payment flag updated");
    }
    ledger
        .expense(expense)
        .cloned()
        .ok_or_else(|| EngineError::KeyNotFound(format!("expense {expense}")))
}

impl LedgerStore for MemoryStore {
    async fn list_members(&self, group: &GroupId) -> ResultEngine<Vec<Member>> {
        let groups = self.groups.read().await;
        Ok(group_ref(&groups, group)?.ledger.members.clone())
    }

    /// Newest first.
    async fn list_expenses(&self, group: &GroupId) -> ResultEngine<Vec<Expense>> {
        let groups = self.groups.read().await;
        let mut expenses = group_ref(&groups, group)?.ledger.expenses.clone();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    async fn set_expense_payment_flag(
        &self,
        expense: &ExpenseId,
        member: &MemberId,
        paid: bool,
    ) -> ResultEngine<Expense> {
        let mut groups = self.groups.write().await;
        let ledger = groups
            .iter_mut()
            .map(|g| &mut g.ledger)
            .find(|ledger| ledger.expense(expense).is_some())
            .ok_or_else(|| EngineError::KeyNotFound(format!("expense {expense}")))?;
        record_payment(ledger, expense, member, paid)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    async fn store_with_trip() -> (MemoryStore, GroupId, Vec<MemberId>) {
        let store = MemoryStore::new();
        let group = store.create_group("Trip").await.unwrap();
        let mut ids = Vec::new();
        for name in ["Ada", "Bob", "Cy"] {
            ids.push(store.add_member(&group.id, name).await.unwrap().id);
        }
        (store, group.id, ids)
    }

    #[tokio::test]
    async fn expenses_must_reference_current_members() {
        let (store, group, ids) = store_with_trip().await;
        let expense = Expense::new(
            None,
            Money::new(100),
            ids[0].clone(),
            vec![ids[0].clone(), "stranger".into()],
        )
        .unwrap();
        let err = store.add_expense(&group, expense).await.unwrap_err();
        assert!(matches!(err, EngineError::UnknownMemberReference(_)));
    }

    #[tokio::test]
    async fn concurrent_toggles_on_one_expense_keep_both_updates() {
        let (store, group, ids) = store_with_trip().await;
        let expense = Expense::new(None, Money::new(90_00), ids[0].clone(), ids.clone()).unwrap();
        let expense = store.add_expense(&group, expense).await.unwrap();
        let store = Arc::new(store);

        let mut tasks = tokio::task::JoinSet::new();
        for member in [ids[1].clone(), ids[2].clone()] {
            let store = Arc::clone(&store);
            let expense = expense.id.clone();
            tasks.spawn(async move {
                store
                    .set_expense_payment_flag(&expense, &member, true)
                    .await
                    .unwrap();
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        let report = settlement_report(store.as_ref(), &group).await.unwrap();
        assert!(report.is_settled());
        let stored = store.list_expenses(&group).await.unwrap();
        assert!(stored[0].is_settled(&ids[1]) && stored[0].is_settled(&ids[2]));
    }

    #[tokio::test]
    async fn update_drops_payments_of_removed_participants() {
        let (store, group, ids) = store_with_trip().await;
        let expense = Expense::new(None, Money::new(90_00), ids[0].clone(), ids.clone()).unwrap();
        let expense = store.add_expense(&group, expense).await.unwrap();
        store
            .set_expense_payment_flag(&expense.id, &ids[2], true)
            .await
            .unwrap();

        let updated = store
            .update_expense(
                &group,
                &expense.id,
                ExpenseChanges {
                    split_with: Some(vec![ids[0].clone(), ids[1].clone()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.payments.is_empty());
        assert_eq!(updated.share_of(&ids[1]), Some(Money::new(45_00)));
    }

    #[tokio::test]
    async fn removed_member_surfaces_as_unknown() {
        let (store, group, ids) = store_with_trip().await;
        let expense = Expense::new(None, Money::new(30_00), ids[0].clone(), ids.clone()).unwrap();
        store.add_expense(&group, expense).await.unwrap();
        store.remove_member(&group, &ids[2]).await.unwrap();

        let report = settlement_report(&store, &group).await.unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.balances.get(&MemberId::unknown()), Some(Money::new(-10_00)));
    }

    #[tokio::test]
    async fn seed_groups_keep_members_and_payments() {
        let raw = r#"{"groups": [{
            "id": "flat",
            "name": "Flat",
            "members": [{"id": "a", "name": "Ada"}, {"id": "b", "name": "Bob"}],
            "expenses": [{
                "id": "e1",
                "amount": 1000,
                "payer": "a",
                "split_with": ["a", "b"],
                "payments": {"b": {"paid": true}}
            }]
        }]}"#;
        let store = MemoryStore::with_seed(serde_json::from_str(raw).unwrap()).unwrap();
        let group = GroupId::from("flat");

        assert_eq!(store.list_groups().await[0].name, "Flat");
        assert_eq!(store.list_members(&group).await.unwrap().len(), 2);
        let report = settlement_report(&store, &group).await.unwrap();
        assert!(report.is_settled());
        assert!(report.warnings.is_empty());
    }

    fn two_groups() -> Seed {
        let raw = r#"{"groups": [
            {"id": "g1", "name": "One", "members": [{"id": "a", "name": "Ada"}, {"id": "b", "name": "Bob"}],
             "expenses": [{"id": "e1", "amount": 1000, "payer": "a", "split_with": ["a", "b"]}]},
            {"id": "g2", "name": "Two", "members": [{"id": "a", "name": "Ada"}, {"id": "b", "name": "Bob"}],
             "expenses": [{"id": "e2", "amount": 1000, "payer": "a", "split_with": ["a", "b"]}]}
        ]}"#;
        serde_json::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn payment_toggle_stays_inside_its_group() {
        let mut seed = two_groups();
        let store = MemoryStore::with_seed(Seed {
            groups: seed.groups.clone(),
        })
        .unwrap();
        let (g1, g2) = (GroupId::from("g1"), GroupId::from("g2"));

        // e1 lives in g1 only, so toggling it through g2 must not reach g1.
        let err = store
            .set_payment(&g2, &"e1".into(), &"b".into(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
        assert!(!settlement_report(&store, &g1).await.unwrap().is_settled());

        store
            .set_payment(&g2, &"e2".into(), &"b".into(), true)
            .await
            .unwrap();
        assert!(settlement_report(&store, &g2).await.unwrap().is_settled());
        assert!(!settlement_report(&store, &g1).await.unwrap().is_settled());

        // Both groups carrying "e1" would make an expense id ambiguous.
        seed.groups[1].ledger.expenses[0].id = "e1".into();
        let err = MemoryStore::with_seed(seed).unwrap_err();
        assert!(matches!(err, EngineError::ExistingKey(_)));
    }

    #[tokio::test]
    async fn duplicate_group_ids_are_rejected() {
        let mut seed = two_groups();
        seed.groups[1].group.id = "g1".into();
        assert!(matches!(
            MemoryStore::with_seed(seed),
            Err(EngineError::ExistingKey(_))
        ));
    }

    #[tokio::test]
    async fn settling_with_a_member_marks_their_shares() {
        let (store, group, ids) = store_with_trip().await;
        for amount in [30_00, 60_00] {
            let expense =
                Expense::new(None, Money::new(amount), ids[0].clone(), ids.clone()).unwrap();
            store.add_expense(&group, expense).await.unwrap();
        }

        let partial = store
            .settle_with(&group, &ids[1], &ids[0], Some(Money::new(15_00)))
            .await
            .unwrap();
        assert_eq!(partial.owed, Money::new(30_00));
        assert_eq!(partial.applied, Money::new(10_00));

        let rest = store.settle_with(&group, &ids[1], &ids[0], None).await.unwrap();
        assert_eq!(rest.applied, Money::new(20_00));
        let report = settlement_report(&store, &group).await.unwrap();
        assert_eq!(report.balances.get(&ids[1]), Some(Money::ZERO));
        assert_eq!(report.history.len(), 2);

        let err = store
            .settle_with(&group, &ids[2], &ids[0], Some(Money::new(30_01)))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let store = MemoryStore::new();
        let err = store.list_members(&"missing".into()).await.unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
        assert!(store.create_group(" ").await.is_err());
    }
}
