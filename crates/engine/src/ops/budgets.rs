use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetStatus, CreateBudgetCmd, EngineError, Money, ResultEngine, TransactionType,
    UpdateBudgetCmd, budgets, transactions,
    util::require_positive_amount,
};

use super::{Engine, with_tx};

fn validate_range(start_date: NaiveDate, end_date: NaiveDate) -> ResultEngine<()> {
    if start_date > end_date {
        return Err(EngineError::Validation(
            "invalid range: start_date must be <= end_date".to_string(),
        ));
    }
    Ok(())
}

/// Sum of the caller's expenses that fall inside the budget window.
async fn spent_in_window<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    category_id: Option<Uuid>,
) -> ResultEngine<i64> {
    let mut query = transactions::Entity::find()
        .select_only()
        .column(transactions::Column::AmountMinor)
        .filter(transactions::Column::UserId.eq(user_id))
        .filter(transactions::Column::Kind.eq(TransactionType::Expense.as_str()))
        .filter(transactions::Column::Date.gte(start_date))
        .filter(transactions::Column::Date.lte(end_date));
    if let Some(category_id) = category_id {
        query = query.filter(transactions::Column::CategoryId.eq(category_id));
    }
    let amounts: Vec<i64> = query.into_tuple().all(db).await?;
    Ok(Money::checked_total(amounts)?.minor())
}

impl Engine {
    /// Create a budget.
    ///
    /// `spent` starts from the expenses already booked in the window, so the
    /// running total is consistent from the first read.
    pub async fn create_budget(&self, cmd: CreateBudgetCmd) -> ResultEngine<Budget> {
        require_positive_amount(cmd.amount_minor)?;
        validate_range(cmd.start_date, cmd.end_date)?;
        with_tx!(self, |db_tx| {
            if let Some(category_id) = cmd.category_id {
                self.require_category(&db_tx, &cmd.user_id, category_id)
                    .await?;
            }
            let spent_minor = spent_in_window(
                &db_tx,
                &cmd.user_id,
                cmd.start_date,
                cmd.end_date,
                cmd.category_id,
            )
            .await?;

            let budget = Budget {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                category_id: cmd.category_id,
                amount_minor: cmd.amount_minor,
                spent_minor,
                start_date: cmd.start_date,
                end_date: cmd.end_date,
            };
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            tracing::debug!(budget_id = %budget.id, spent_minor, "budget created");
            Ok(budget)
        })
    }

    /// Patch a budget. Changing the window or the category recomputes
    /// `spent` from the transactions.
    pub async fn update_budget(&self, cmd: UpdateBudgetCmd) -> ResultEngine<Budget> {
        if let Some(amount_minor) = cmd.amount_minor {
            require_positive_amount(amount_minor)?;
        }
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget(&db_tx, &cmd.user_id, cmd.budget_id)
                .await?;
            let mut budget = Budget::try_from(model)?;

            if let Some(Some(category_id)) = cmd.category_id {
                self.require_category(&db_tx, &cmd.user_id, category_id)
                    .await?;
            }

            let start_date = cmd.start_date.unwrap_or(budget.start_date);
            let end_date = cmd.end_date.unwrap_or(budget.end_date);
            validate_range(start_date, end_date)?;
            let category_id = cmd.category_id.unwrap_or(budget.category_id);

            let matching_changed = start_date != budget.start_date
                || end_date != budget.end_date
                || category_id != budget.category_id;

            budget.start_date = start_date;
            budget.end_date = end_date;
            budget.category_id = category_id;
            if let Some(amount_minor) = cmd.amount_minor {
                budget.amount_minor = amount_minor;
            }
            if matching_changed {
                budget.spent_minor =
                    spent_in_window(&db_tx, &cmd.user_id, start_date, end_date, category_id)
                        .await?;
            }

            budgets::ActiveModel::from(&budget).update(&db_tx).await?;
            Ok(budget)
        })
    }

    pub async fn delete_budget(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, user_id, budget_id).await?;
            budgets::Entity::delete_by_id(budget_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// List the caller's budgets, most recent window first.
    pub async fn list_budgets(&self, user_id: &str) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .order_by_desc(budgets::Column::StartDate)
                .order_by_asc(budgets::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Budget::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return a single budget with its usage figures.
    pub async fn budget_status(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<BudgetStatus> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            Ok(Budget::try_from(model)?.status())
        })
    }

    /// Every budget of the caller with remaining amount, usage and alert.
    pub async fn budget_statuses(&self, user_id: &str) -> ResultEngine<Vec<BudgetStatus>> {
        let budgets = self.list_budgets(user_id).await?;
        Ok(budgets.iter().map(Budget::status).collect())
    }

    /// Budgets that are over their cap or near it.
    pub async fn budget_alerts(&self, user_id: &str) -> ResultEngine<Vec<BudgetStatus>> {
        let statuses = self.budget_statuses(user_id).await?;
        Ok(statuses
            .into_iter()
            .filter(|status| status.alert.is_some())
            .collect())
    }
}
