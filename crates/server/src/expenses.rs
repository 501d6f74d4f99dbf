//! Expense API endpoints

use api_types::expense::{
    ExpenseNew, ExpenseUpdate, ExpenseView, ExpensesResponse, PaymentUpdate, PaymentView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Expense, ExpenseId, GroupId, MemberId, Money};

use crate::{ExpenseChanges, LedgerStore, ServerError, server::ServerState};

fn member_ids(raw: Vec<String>) -> Vec<MemberId> {
    raw.into_iter().map(MemberId::from).collect()
}

fn expense_view(expense: Expense) -> ExpenseView {
    let shares_minor = expense
        .shares()
        .map(|shares| shares.into_iter().map(|(_, share)| share.cents()).collect())
        .unwrap_or_default();
    let payments = expense
        .payments
        .iter()
        .map(|(member, status)| PaymentView {
            member: member.to_string(),
            paid: status.paid,
            paid_at: status.paid_at.map(|at| at.fixed_offset()),
        })
        .collect();

    ExpenseView {
        id: expense.id.to_string(),
        description: expense.description,
        amount_minor: expense.amount.cents(),
        payer: expense.payer.to_string(),
        split_with: expense.split_with.iter().map(ToString::to_string).collect(),
        shares_minor,
        date: expense.date.fixed_offset(),
        payments,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .store
        .list_expenses(&GroupId::from(group_id))
        .await?
        .into_iter()
        .map(expense_view)
        .collect();
    Ok(Json(ExpensesResponse { expenses }))
}

/// Handle requests for recording a new expense
pub async fn expense_new(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let mut expense = Expense::new(
        payload.description.as_deref(),
        Money::new(payload.amount_minor),
        MemberId::from(payload.payer),
        member_ids(payload.split_with),
    )?;
    if let Some(date) = payload.date {
        expense.date = date.with_timezone(&Utc);
    }

    let expense = state
        .store
        .add_expense(&GroupId::from(group_id), expense)
        .await?;
    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, String)>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let changes = ExpenseChanges {
        description: payload.description,
        amount: payload.amount_minor.map(Money::new),
        payer: payload.payer.map(MemberId::from),
        split_with: payload.split_with.map(member_ids),
        date: payload.date.map(|date| date.with_timezone(&Utc)),
    };

    let expense = state
        .store
        .update_expense(
            &GroupId::from(group_id),
            &ExpenseId::from(expense_id),
            changes,
        )
        .await?;
    Ok(Json(expense_view(expense)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .store
        .delete_expense(&GroupId::from(group_id), &ExpenseId::from(expense_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark one member's share of an expense as paid or unpaid.
pub async fn set_payment(
    State(state): State<ServerState>,
    Path((group_id, expense_id, member_id)): Path<(String, String, String)>,
    Json(payload): Json<PaymentUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let updated = state
        .store
        .set_payment(
            &GroupId::from(group_id),
            &ExpenseId::from(expense_id),
            &MemberId::from(member_id),
            payload.paid,
        )
        .await?;
    Ok(Json(expense_view(updated)))
}

