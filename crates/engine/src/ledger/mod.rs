//! Running-total maintenance.
//!
//! A transaction has two effects on the ledger: a signed delta on its account
//! balance and a spent delta on every budget it matches. Both are applied with
//! store-level increments so that concurrent writers never lose an update.
//! Updates reverse the old effect and then apply the new one; the budgets are
//! matched again on each side, with that side's date and category.

use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{ResultEngine, Transaction, TransactionType};

mod balance;
mod budget_match;

use balance::apply_to_account;
pub use balance::{reverse_delta, signed_delta};
use budget_match::{adjust_spent, matching_budgets};
pub use budget_match::spent_delta;

/// The fields of a transaction that drive its ledger effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LedgerEffect {
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub kind: TransactionType,
    pub amount_minor: i64,
    pub date: NaiveDate,
}

impl From<&Transaction> for LedgerEffect {
    fn from(tx: &Transaction) -> Self {
        Self {
            user_id: tx.user_id.clone(),
            account_id: tx.account_id,
            category_id: tx.category_id,
            kind: tx.kind,
            amount_minor: tx.amount_minor,
            date: tx.date,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Apply,
    Reverse,
}

impl LedgerEffect {
    fn deltas(&self, direction: Direction) -> (i64, i64) {
        let spent = spent_delta(self.kind, self.amount_minor);
        match direction {
            Direction::Apply => (signed_delta(self.kind, self.amount_minor), spent),
            Direction::Reverse => (reverse_delta(self.kind, self.amount_minor), -spent),
        }
    }
}

/// Post (or undo) a transaction's effect on its account and matched budgets.
pub(crate) async fn post_effect<C: ConnectionTrait>(
    db: &C,
    effect: &LedgerEffect,
    direction: Direction,
) -> ResultEngine<()> {
    let (balance_delta, spent_delta) = effect.deltas(direction);

    apply_to_account(db, effect.account_id, balance_delta).await?;

    let budget_ids: Vec<Uuid> =
        matching_budgets(db, &effect.user_id, effect.date, effect.category_id)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect();
    adjust_spent(db, &budget_ids, spent_delta).await?;

    tracing::debug!(
        account_id = %effect.account_id,
        ?direction,
        balance_delta,
        spent_delta,
        budgets = budget_ids.len(),
        "ledger effect posted"
    );
    Ok(())
}
