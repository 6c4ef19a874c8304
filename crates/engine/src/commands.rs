//! Command structs for engine operations.
//!
//! These types group parameters for write operations
//! (create/update/delete of transactions and budgets), keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::TransactionType;

/// Create a transaction.
///
/// When `kind` is not set, the transaction inherits the type of its category.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub kind: Option<TransactionType>,
    pub description: Option<String>,
    pub tag_ids: Vec<Uuid>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        account_id: Uuid,
        category_id: Uuid,
        amount_minor: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            category_id,
            amount_minor,
            date,
            kind: None,
            description: None,
            tag_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tag_ids(mut self, tag_ids: Vec<Uuid>) -> Self {
        self.tag_ids = tag_ids;
        self
    }
}

/// Patch an existing transaction.
///
/// Unset fields keep their stored value. `tag_ids` replaces the whole tag set
/// when set and leaves it untouched otherwise. A description set to an empty
/// string clears it.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,

    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionType>,
    pub amount_minor: Option<i64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub tag_ids: Option<Vec<Uuid>>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            account_id: None,
            category_id: None,
            kind: None,
            amount_minor: None,
            description: None,
            date: None,
            tag_ids: None,
        }
    }

    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn tag_ids(mut self, tag_ids: Vec<Uuid>) -> Self {
        self.tag_ids = Some(tag_ids);
        self
    }
}

/// Delete a transaction, reversing its effect on the ledger.
#[derive(Clone, Debug)]
pub struct DeleteTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
}

impl DeleteTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
        }
    }
}

/// Create a budget. Without a category the budget covers all of them.
#[derive(Clone, Debug)]
pub struct CreateBudgetCmd {
    pub user_id: String,
    pub amount_minor: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category_id: Option<Uuid>,
}

impl CreateBudgetCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        amount_minor: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount_minor,
            start_date,
            end_date,
            category_id: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Patch a budget.
///
/// `category_id` is doubly optional: `Some(None)` turns the budget into a
/// global one.
#[derive(Clone, Debug)]
pub struct UpdateBudgetCmd {
    pub user_id: String,
    pub budget_id: Uuid,
    pub amount_minor: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<Option<Uuid>>,
}

impl UpdateBudgetCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, budget_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            budget_id,
            amount_minor: None,
            start_date: None,
            end_date: None,
            category_id: None,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(Some(category_id));
        self
    }

    #[must_use]
    pub fn all_categories(mut self) -> Self {
        self.category_id = Some(None);
        self
    }
}
