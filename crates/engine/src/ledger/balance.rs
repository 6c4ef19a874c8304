use sea_orm::{ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, TransactionType, accounts};

/// Signed effect of a transaction on its account balance.
///
/// INCOME adds the amount, EXPENSE subtracts it.
#[must_use]
pub fn signed_delta(kind: TransactionType, amount_minor: i64) -> i64 {
    match kind {
        TransactionType::Income => amount_minor,
        TransactionType::Expense => -amount_minor,
    }
}

/// The delta that undoes [`signed_delta`].
#[must_use]
pub fn reverse_delta(kind: TransactionType, amount_minor: i64) -> i64 {
    -signed_delta(kind, amount_minor)
}

/// Add `delta` to an account balance with a single
/// `balance = balance + delta` statement.
pub(crate) async fn apply_to_account<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
    delta: i64,
) -> ResultEngine<()> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::BalanceMinor,
            Expr::col(accounts::Column::BalanceMinor).add(delta),
        )
        .filter(accounts::Column::Id.eq(account_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(EngineError::KeyNotFound("account not exists".to_string()));
    }
    Ok(())
}
