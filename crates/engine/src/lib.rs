//! Settlement engine for shared group expenses.
//!
//! The engine turns a snapshot of members and expenses into:
//!
//! - per-member balances ([`compute_balances`]),
//! - a pairwise who-owes-whom matrix ([`compute_debt_matrix`]),
//! - a short settlement plan ([`simplify`]),
//! - per-member summaries ([`member_summaries`]),
//! - the history of paid shares ([`paid_shares`]).
//!
//! [`Ledger::settle_with`] applies a repayment from one member to another,
//! oldest expense first.
//!
//! Every derivation consults the payment overlay ([`is_settled`],
//! [`set_paid`]) to decide whether a share is still outstanding. All functions
//! are pure: they perform no I/O, keep no state and can be called concurrently.
//! Malformed records are skipped and reported as [`LedgerWarning`]s rather than
//! failing the whole computation.
//!
//! ```rust
//! use engine::{Expense, Ledger, Member, Money};
//!
//! let members = vec![Member::new("a", "Ada"), Member::new("b", "Bob")];
//! let dinner = Expense::new(
//!     Some("dinner"),
//!     Money::new(100_00),
//!     "a".into(),
//!     vec!["a".into(), "b".into()],
//! )
//! .unwrap();
//!
//! let ledger = Ledger::new(members, vec![dinner]);
//! let plan = ledger.settlement_plan();
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan.transactions()[0].amount, Money::new(50_00));
//! ```

pub use balances::{
    BalanceStatus, Balances, EPSILON, MemberBalance, compute_balances, compute_gross_balances,
};
pub use error::{EngineError, LedgerWarning};
pub use expense::Expense;
pub use history::{PaidShare, paid_shares};
pub use ids::{ExpenseId, GroupId, MemberId};
pub use ledger::{Ledger, LedgerReport};
pub use matrix::{Debt, DebtMatrix, PairwiseNet, compute_debt_matrix};
pub use member::{Group, Member};
pub use money::Money;
pub use payments::{PaymentStatus, is_settled, set_paid};
pub use repayment::Repayment;
pub use settlement::{SettlementPlan, SettlementTransaction, simplify};
pub use snapshot::PaymentView;
pub use summary::{Counterparty, MemberSummary, member_summaries};

mod balances;
mod error;
mod expense;
mod history;
mod ids;
mod ledger;
mod matrix;
mod member;
mod money;
mod payments;
mod repayment;
mod settlement;
mod snapshot;
mod summary;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
