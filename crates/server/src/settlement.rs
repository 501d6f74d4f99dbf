//! Settlement summary endpoint.

use std::collections::HashMap;

use api_types::settlement::{
    BalanceStatus, BalanceView, CounterpartyView, DebtView, MemberSummaryView, PaidShareView,
    RepaymentView, SettleNew, SettlementResponse, TransferView, WarningView,
};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::{
    Counterparty, GroupId, LedgerReport, LedgerWarning, MemberId, MemberSummary, Money, PaidShare,
    Repayment,
};

use crate::{ServerError, server::ServerState, store::settlement_report};

fn status(status: engine::BalanceStatus) -> BalanceStatus {
    match status {
        engine::BalanceStatus::Owed => BalanceStatus::Owed,
        engine::BalanceStatus::Owing => BalanceStatus::Owing,
        engine::BalanceStatus::Settled => BalanceStatus::Settled,
    }
}

fn counterparty(entry: Counterparty) -> CounterpartyView {
    CounterpartyView {
        member: entry.member.to_string(),
        name: entry.name,
        amount_minor: entry.amount.cents(),
        expenses: entry.expenses.iter().map(ToString::to_string).collect(),
    }
}

fn summary(entry: MemberSummary) -> MemberSummaryView {
    MemberSummaryView {
        member: entry.member.to_string(),
        name: entry.name.clone(),
        total_paid_minor: entry.total_paid.cents(),
        total_share_minor: entry.total_share.cents(),
        total_owes_minor: entry.total_owes().cents(),
        will_collect_minor: entry.will_collect().cents(),
        net_balance_minor: entry.net_balance().cents(),
        is_clear: entry.is_clear(),
        owes_to: entry.owes_to.into_iter().map(counterparty).collect(),
        owed_by: entry.owed_by.into_iter().map(counterparty).collect(),
    }
}

fn warning(entry: &LedgerWarning) -> WarningView {
    let (expense, member) = match entry {
        LedgerWarning::InvalidExpense { expense, .. } => (expense.to_string(), None),
        LedgerWarning::UnknownMemberReference { expense, member } => {
            (expense.to_string(), Some(member.to_string()))
        }
    };
    WarningView {
        expense,
        member,
        message: entry.to_string(),
    }
}

fn paid_share(entry: PaidShare) -> PaidShareView {
    PaidShareView {
        expense: entry.expense.to_string(),
        description: entry.description,
        payer: entry.payer.to_string(),
        payer_name: entry.payer_name,
        member: entry.member.to_string(),
        member_name: entry.member_name,
        share_minor: entry.share.cents(),
        paid_at: entry.paid_at.fixed_offset(),
    }
}

fn repayment_view(repayment: Repayment) -> RepaymentView {
    RepaymentView {
        from: repayment.debtor.to_string(),
        to: repayment.creditor.to_string(),
        owed_minor: repayment.owed.cents(),
        offered_minor: repayment.offered.cents(),
        applied_minor: repayment.applied.cents(),
        expenses: repayment.expenses.iter().map(ToString::to_string).collect(),
    }
}

fn response(report: LedgerReport) -> SettlementResponse {
    let names: HashMap<String, String> = report
        .balances
        .iter()
        .map(|entry| (entry.member.to_string(), entry.name.clone()))
        .collect();
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    let settled = report.is_settled();
    let balances = report
        .balances
        .iter()
        .map(|entry| BalanceView {
            member: entry.member.to_string(),
            name: entry.name.clone(),
            balance_minor: entry.balance.cents(),
            status: status(entry.status()),
        })
        .collect();
    let plan = report
        .plan
        .iter()
        .map(|tx| TransferView {
            from: tx.from.to_string(),
            from_name: name_of(tx.from.as_str()),
            to: tx.to.to_string(),
            to_name: name_of(tx.to.as_str()),
            amount_minor: tx.amount.cents(),
        })
        .collect();
    let debts = report
        .matrix
        .debts()
        .map(|debt| DebtView {
            from: debt.from.to_string(),
            to: debt.to.to_string(),
            amount_minor: debt.amount.cents(),
        })
        .collect();
    let warnings = report.warnings.iter().map(warning).collect();

    SettlementResponse {
        settled,
        balances,
        plan,
        debts,
        summaries: report.summaries.into_iter().map(summary).collect(),
        history: report.history.into_iter().map(paid_share).collect(),
        warnings,
    }
}

/// Current balances, transfer plan and member summaries of a group.
pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<SettlementResponse>, ServerError> {
    let report = settlement_report(state.store.as_ref(), &GroupId::from(group_id)).await?;
    Ok(Json(response(report)))
}

/// `member_id` pays back `to`, in full or in part.
pub async fn settle(
    State(state): State<ServerState>,
    Path((group_id, member_id)): Path<(String, String)>,
    Json(payload): Json<SettleNew>,
) -> Result<Json<RepaymentView>, ServerError> {
    let repayment = state
        .store
        .settle_with(
            &GroupId::from(group_id),
            &MemberId::from(member_id),
            &MemberId::from(payload.to),
            payload.amount_minor.map(Money::new),
        )
        .await?;
    Ok(Json(repayment_view(repayment)))
}
