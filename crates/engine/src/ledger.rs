//! Ledger snapshot façade.
//!
//! A [`Ledger`] is the point-in-time list of members and expenses of one
//! group, as fetched from storage. It is never authoritative: after any write
//! (payment toggle, expense edit) callers fetch a fresh one before deriving
//! values again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Balances, DebtMatrix, EngineError, Expense, ExpenseId, LedgerWarning, Member, MemberId,
    MemberSummary, ResultEngine, SettlementPlan,
    balances::balances_from,
    history::{PaidShare, history_from},
    matrix::matrix_from,
    settlement::simplify,
    snapshot::{PaymentView, Snapshot},
    summary::summaries_from,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// Everything the presentation layer renders for a group, derived from one
/// snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerReport {
    pub balances: Balances,
    pub plan: SettlementPlan,
    pub matrix: DebtMatrix,
    pub summaries: Vec<MemberSummary>,
    /// Paid shares, newest payment first.
    pub history: Vec<PaidShare>,
    pub warnings: Vec<LedgerWarning>,
}

impl LedgerReport {
    pub fn is_settled(&self) -> bool {
        self.plan.is_empty()
    }
}

impl Ledger {
    pub fn new(members: Vec<Member>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }

    fn snapshot(&self, view: PaymentView) -> Snapshot<'_> {
        Snapshot::resolve(&self.members, &self.expenses, view)
    }

    pub fn balances(&self) -> Balances {
        balances_from(&self.snapshot(PaymentView::Outstanding))
    }

    pub fn gross_balances(&self) -> Balances {
        balances_from(&self.snapshot(PaymentView::Gross))
    }

    pub fn debt_matrix(&self) -> DebtMatrix {
        matrix_from(&self.snapshot(PaymentView::Outstanding))
    }

    pub fn settlement_plan(&self) -> SettlementPlan {
        simplify(&self.balances())
    }

    pub fn summaries(&self) -> Vec<MemberSummary> {
        summaries_from(&self.snapshot(PaymentView::Outstanding))
    }

    pub fn paid_shares(&self) -> Vec<PaidShare> {
        history_from(&self.snapshot(PaymentView::Outstanding))
    }

    /// Strict check: the first malformed record as an error.
    pub fn validate(&self) -> ResultEngine<()> {
        match self.snapshot(PaymentView::Gross).warnings.into_iter().next() {
            Some(warning) => Err(warning.into()),
            None => Ok(()),
        }
    }

    pub fn report(&self) -> LedgerReport {
        let snapshot = self.snapshot(PaymentView::Outstanding);
        let balances = balances_from(&snapshot);
        let plan = simplify(&balances);
        LedgerReport {
            matrix: matrix_from(&snapshot),
            summaries: summaries_from(&snapshot),
            history: history_from(&snapshot),
            warnings: snapshot.warnings,
            balances,
            plan,
        }
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == *id)
    }

    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == *id)
    }

    /// Toggle `member`'s share of expense `id`. Returns whether anything
    /// changed.
    pub fn set_paid(
        &mut self,
        id: &ExpenseId,
        member: &MemberId,
        paid: bool,
        when: DateTime<Utc>,
    ) -> ResultEngine<bool> {
        let expense = self
            .expenses
            .iter_mut()
            .find(|expense| expense.id == *id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        if !expense.participants().contains(&member) {
            return Err(EngineError::KeyNotFound(format!(
                "member {member} in expense {id}"
            )));
        }
        Ok(expense.record_payment(member, paid, when))
    }
}
