//! Pairwise debt matrix.
//!
//! `matrix[a][b]` is what member `a` still owes member `b` across all
//! expenses. Cells are gross: if `a` owes `b` for one expense and `b` owes `a`
//! for another, both cells stay positive. [`DebtMatrix::net`] nets a single
//! pair on demand.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    Expense, LedgerWarning, Member, MemberId, Money,
    balances::EPSILON,
    snapshot::{PaymentView, Snapshot},
};

/// Net position of one member towards another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum PairwiseNet {
    /// The first member owes the second this much.
    Owes(Money),
    /// The second member owes the first this much.
    Receivable(Money),
    Settled,
}

/// A non-zero matrix cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Debt {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DebtMatrix {
    members: Vec<MemberId>,
    /// Row-major: `cells[from][to]`.
    cells: Vec<Vec<Money>>,
    #[serde(skip)]
    index: HashMap<MemberId, usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<LedgerWarning>,
}

impl DebtMatrix {
    fn with_members(members: Vec<MemberId>) -> Self {
        let index = members
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        let size = members.len();
        Self {
            members,
            cells: vec![vec![Money::ZERO; size]; size],
            index,
            warnings: Vec::new(),
        }
    }

    /// Row/column order: member-list order, unknown bucket last.
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// What `from` owes `to`; zero for unknown ids.
    pub fn get(&self, from: &MemberId, to: &MemberId) -> Money {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&row), Some(&col)) => self.cells[row][col],
            _ => Money::ZERO,
        }
    }

    /// Row total: everything `member` owes.
    pub fn total_owed_by(&self, member: &MemberId) -> Money {
        self.index
            .get(member)
            .map(|&row| self.cells[row].iter().sum())
            .unwrap_or_default()
    }

    /// Column total: everything owed to `member`.
    pub fn total_owed_to(&self, member: &MemberId) -> Money {
        self.index
            .get(member)
            .map(|&col| self.cells.iter().map(|row| row[col]).sum())
            .unwrap_or_default()
    }

    /// Net position of `a` towards `b`: `matrix[a][b] - matrix[b][a]`.
    pub fn net(&self, a: &MemberId, b: &MemberId) -> PairwiseNet {
        let net = self.get(a, b) - self.get(b, a);
        if net > EPSILON {
            PairwiseNet::Owes(net)
        } else if net < -EPSILON {
            PairwiseNet::Receivable(-net)
        } else {
            PairwiseNet::Settled
        }
    }

    /// Non-zero cells, row by row.
    pub fn debts(&self) -> impl Iterator<Item = Debt> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, amount)| amount.is_positive())
                .map(move |(col, amount)| Debt {
                    from: self.members[row].clone(),
                    to: self.members[col].clone(),
                    amount: *amount,
                })
        })
    }

    pub fn warnings(&self) -> &[LedgerWarning] {
        &self.warnings
    }
}

/// Gross who-owes-whom matrix over outstanding shares.
pub fn compute_debt_matrix(members: &[Member], expenses: &[Expense]) -> DebtMatrix {
    matrix_from(&Snapshot::resolve(members, expenses, PaymentView::Outstanding))
}

pub(crate) fn matrix_from(snapshot: &Snapshot<'_>) -> DebtMatrix {
    let mut matrix =
        DebtMatrix::with_members(snapshot.slots.iter().map(|(id, _)| id.clone()).collect());

    for resolved in &snapshot.expenses {
        for share in &resolved.shares {
            // Two unknown ids fold into the same bucket; keep the diagonal empty.
            if share.outstanding && share.slot != resolved.payer {
                matrix.cells[share.slot][resolved.payer] += share.amount;
            }
        }
    }

    matrix.warnings = snapshot.warnings.clone();
    matrix
}
