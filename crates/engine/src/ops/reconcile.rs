use std::collections::HashMap;

use sea_orm::{ActiveModelTrait, ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Budget, Money, ResultEngine, Transaction, accounts, budgets, ledger::signed_delta,
    ledger::spent_delta, transactions,
};

use super::{Engine, with_tx};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CorrectionTarget {
    Account(Uuid),
    Budget(Uuid),
}

/// A running total that disagreed with the transactions and was rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerCorrection {
    pub target: CorrectionTarget,
    pub stored_minor: i64,
    pub computed_minor: i64,
}

impl Engine {
    /// Recomputes the denormalized totals of the caller from the ledger.
    ///
    /// - Account balances are rebuilt as `opening_balance + Σ signed(tx)`.
    /// - Budget `spent` is rebuilt from the matching expenses.
    /// - Only totals that differ are written; each is reported back.
    pub async fn recompute_ledger(&self, user_id: &str) -> ResultEngine<Vec<LedgerCorrection>> {
        with_tx!(self, |db_tx| {
            let account_models = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?;
            let budget_models = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?;
            let ledger = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let mut deltas: HashMap<Uuid, Vec<i64>> = HashMap::new();
            for tx in &ledger {
                deltas
                    .entry(tx.account_id)
                    .or_default()
                    .push(signed_delta(tx.kind, tx.amount_minor));
            }

            let mut corrections = Vec::new();

            for model in account_models {
                let computed = Money::checked_total(
                    std::iter::once(model.opening_balance_minor)
                        .chain(deltas.remove(&model.id).unwrap_or_default()),
                )?
                .minor();
                if computed == model.balance_minor {
                    continue;
                }
                corrections.push(LedgerCorrection {
                    target: CorrectionTarget::Account(model.id),
                    stored_minor: model.balance_minor,
                    computed_minor: computed,
                });
                accounts::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    balance_minor: ActiveValue::Set(computed),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
            }

            for model in budget_models {
                let budget = Budget::try_from(model)?;
                let computed = Money::checked_total(
                    ledger
                        .iter()
                        .filter(|tx| budget.matches(tx.date, tx.category_id))
                        .map(|tx| spent_delta(tx.kind, tx.amount_minor)),
                )?
                .minor();
                if computed == budget.spent_minor {
                    continue;
                }
                corrections.push(LedgerCorrection {
                    target: CorrectionTarget::Budget(budget.id),
                    stored_minor: budget.spent_minor,
                    computed_minor: computed,
                });
                budgets::ActiveModel {
                    id: ActiveValue::Set(budget.id),
                    spent_minor: ActiveValue::Set(computed),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
            }

            if !corrections.is_empty() {
                tracing::warn!(
                    user_id,
                    corrections = corrections.len(),
                    "ledger totals drifted and were recomputed"
                );
            }
            Ok(corrections)
        })
    }
}
