//! Budgets and their on-read status.
//!
//! A budget caps spending over an inclusive date range, optionally restricted
//! to one category. `spent_minor` is a denormalized total maintained by the
//! ledger: the sum of the amounts of the user's EXPENSE transactions that
//! match the budget (see [`Budget::matches`]).

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Used share of a budget (in basis points) above which it is near its limit.
const NEAR_LIMIT_BP: i64 = 8_000;
const FULL_BP: i64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: String,
    /// `None` means the budget covers every category.
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub spent_minor: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Budget {
    /// Whether a transaction on `date` in `category_id` counts against this
    /// budget.
    #[must_use]
    pub fn matches(&self, date: NaiveDate, category_id: Uuid) -> bool {
        self.start_date <= date
            && date <= self.end_date
            && self.category_id.is_none_or(|id| id == category_id)
    }

    #[must_use]
    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::from_budget(self.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetAlert {
    OverBudget,
    NearLimit,
}

/// A budget with its derived usage figures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub remaining_minor: i64,
    /// `spent / amount` in basis points (`10_000` == 100%), rounded down.
    pub percentage_used_bp: i64,
    pub is_over_budget: bool,
    pub is_near_limit: bool,
    pub alert: Option<BudgetAlert>,
}

impl BudgetStatus {
    fn from_budget(budget: Budget) -> Self {
        let spent = i128::from(budget.spent_minor);
        let amount = i128::from(budget.amount_minor);
        let percentage_used_bp = if amount > 0 {
            i64::try_from(spent * i128::from(FULL_BP) / amount).unwrap_or(i64::MAX)
        } else {
            0
        };
        let is_over_budget = spent > amount;
        // Exact comparison: 80% < spent/amount < 100%.
        let is_near_limit = spent * i128::from(FULL_BP) > amount * i128::from(NEAR_LIMIT_BP)
            && spent < amount;
        let alert = if is_over_budget {
            Some(BudgetAlert::OverBudget)
        } else if is_near_limit {
            Some(BudgetAlert::NearLimit)
        } else {
            None
        };

        Self {
            remaining_minor: budget.amount_minor.saturating_sub(budget.spent_minor),
            percentage_used_bp,
            is_over_budget,
            is_near_limit,
            alert,
            budget,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub spent_minor: i64,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id.clone()),
            category_id: ActiveValue::Set(value.category_id),
            amount_minor: ActiveValue::Set(value.amount_minor),
            spent_minor: ActiveValue::Set(value.spent_minor),
            start_date: ActiveValue::Set(value.start_date),
            end_date: ActiveValue::Set(value.end_date),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            spent_minor: model.spent_minor,
            start_date: model.start_date,
            end_date: model.end_date,
        })
    }
}
