use chrono::NaiveDate;
use sea_orm::{Condition, ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{ResultEngine, TransactionType, budgets};

/// Amount a transaction adds to each budget it matches.
///
/// Only expenses count as spending; income never moves a budget.
#[must_use]
pub fn spent_delta(kind: TransactionType, amount_minor: i64) -> i64 {
    match kind {
        TransactionType::Expense => amount_minor,
        TransactionType::Income => 0,
    }
}

/// Budgets of `user_id` whose inclusive range contains `date` and that are
/// either global or scoped to `category_id`.
pub(crate) async fn matching_budgets<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    date: NaiveDate,
    category_id: Uuid,
) -> ResultEngine<Vec<budgets::Model>> {
    budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(user_id))
        .filter(budgets::Column::StartDate.lte(date))
        .filter(budgets::Column::EndDate.gte(date))
        .filter(
            Condition::any()
                .add(budgets::Column::CategoryId.eq(category_id))
                .add(budgets::Column::CategoryId.is_null()),
        )
        .all(db)
        .await
        .map_err(Into::into)
}

/// Add `delta` to `spent` of every listed budget in one statement.
pub(crate) async fn adjust_spent<C: ConnectionTrait>(
    db: &C,
    budget_ids: &[Uuid],
    delta: i64,
) -> ResultEngine<()> {
    if budget_ids.is_empty() || delta == 0 {
        return Ok(());
    }
    budgets::Entity::update_many()
        .col_expr(
            budgets::Column::SpentMinor,
            Expr::col(budgets::Column::SpentMinor).add(delta),
        )
        .filter(budgets::Column::Id.is_in(budget_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(())
}
