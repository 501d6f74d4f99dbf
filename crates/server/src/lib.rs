use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};
pub use store::{
    ExpenseChanges, GroupLedger, LedgerStore, MemoryStore, Seed, SeedError, settlement_report,
};

mod expenses;
mod groups;
mod members;
mod server;
mod settlement;
mod store;

pub mod types {
    pub mod group {
        pub use api_types::group::{GroupNew, GroupView, GroupsResponse};
    }

    pub mod member {
        pub use api_types::member::{MemberNew, MemberView, MembersResponse};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseNew, ExpenseUpdate, ExpenseView, ExpensesResponse, PaymentUpdate, PaymentView,
        };
    }

    pub mod settlement {
        pub use api_types::settlement::{
            BalanceStatus, BalanceView, CounterpartyView, DebtView, MemberSummaryView,
            PaidShareView, RepaymentView, SettleNew, SettlementResponse, TransferView,
            WarningView,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidExpense(_)
        | EngineError::UnknownMemberReference(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), err.to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
