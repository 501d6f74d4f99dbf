use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupView>,
    }
}

pub mod member {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: Option<String>,
        /// Must be > 0.
        pub amount_minor: i64,
        /// Member id of whoever paid.
        pub payer: String,
        /// Member ids sharing the cost. Must not be empty.
        pub split_with: Vec<String>,
        /// RFC3339 timestamp. If absent, server uses now().
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Partial update: absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub payer: Option<String>,
        pub split_with: Option<Vec<String>>,
        pub date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentUpdate {
        pub paid: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub member: String,
        pub paid: bool,
        pub paid_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub description: String,
        pub amount_minor: i64,
        pub payer: String,
        pub split_with: Vec<String>,
        /// Per-participant share, same order as `split_with` (duplicates
        /// removed).
        pub shares_minor: Vec<i64>,
        pub date: DateTime<FixedOffset>,
        /// Only members with a recorded payment entry.
        pub payments: Vec<PaymentView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BalanceStatus {
        /// The group owes this member.
        Owed,
        /// This member owes the group.
        Owing,
        Settled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub member: String,
        pub name: String,
        pub balance_minor: i64,
        pub status: BalanceStatus,
    }

    /// "`from` pays `to`".
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferView {
        pub from: String,
        pub from_name: String,
        pub to: String,
        pub to_name: String,
        pub amount_minor: i64,
    }

    /// Gross cell of the who-owes-whom matrix.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub from: String,
        pub to: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CounterpartyView {
        pub member: String,
        pub name: String,
        pub amount_minor: i64,
        pub expenses: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberSummaryView {
        pub member: String,
        pub name: String,
        pub total_paid_minor: i64,
        pub total_share_minor: i64,
        pub total_owes_minor: i64,
        pub will_collect_minor: i64,
        pub net_balance_minor: i64,
        pub is_clear: bool,
        pub owes_to: Vec<CounterpartyView>,
        pub owed_by: Vec<CounterpartyView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WarningView {
        pub expense: String,
        pub member: Option<String>,
        pub message: String,
    }

    /// A share already paid back, reversible through the payments endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaidShareView {
        pub expense: String,
        pub description: String,
        pub payer: String,
        pub payer_name: String,
        pub member: String,
        pub member_name: String,
        pub share_minor: i64,
        pub paid_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementResponse {
        /// `true` when nobody owes anything.
        pub settled: bool,
        pub balances: Vec<BalanceView>,
        pub plan: Vec<TransferView>,
        pub debts: Vec<DebtView>,
        pub summaries: Vec<MemberSummaryView>,
        /// Newest payment first.
        #[serde(default)]
        pub history: Vec<PaidShareView>,
        pub warnings: Vec<WarningView>,
    }

    /// Repayment towards `to`; the whole debt when `amount_minor` is absent.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleNew {
        pub to: String,
        pub amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RepaymentView {
        pub from: String,
        pub to: String,
        pub owed_minor: i64,
        pub offered_minor: i64,
        pub applied_minor: i64,
        /// Expenses whose share got marked paid.
        pub expenses: Vec<String>,
    }
}
