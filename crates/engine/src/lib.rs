//! Ledger engine for the expense tracker.
//!
//! The engine owns the rules that keep the denormalized running totals
//! (`accounts.balance_minor` and `budgets.spent_minor`) consistent with the
//! set of transactions stored in the database. Every mutation runs inside a
//! single database transaction and adjusts totals with store-level
//! increments, so a failed call leaves no partial effect behind.
//!
//! Entry point is [`Engine`]; build it with [`Engine::builder`].

pub use accounts::Account;
pub use budgets::{Budget, BudgetAlert, BudgetStatus};
pub use categories::Category;
pub use commands::{
    CreateBudgetCmd, CreateTransactionCmd, DeleteTransactionCmd, UpdateBudgetCmd,
    UpdateTransactionCmd,
};
pub use currency::Currency;
pub use error::EngineError;
pub use ledger::{reverse_delta, signed_delta, spent_delta};
pub use money::Money;
pub use ops::{
    CorrectionTarget, DeleteOutcome, Engine, EngineBuilder, LedgerCorrection,
    TransactionListFilter,
};
pub use tags::Tag;
pub use transactions::{Transaction, TransactionDetail, TransactionType};

mod accounts;
mod budgets;
mod categories;
mod commands;
mod currency;
mod error;
mod ledger;
mod money;
mod ops;
mod tags;
mod transaction_tags;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
