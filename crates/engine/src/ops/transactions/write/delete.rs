use sea_orm::{EntityTrait, TransactionTrait};
use serde::Serialize;

use crate::{
    DeleteTransactionCmd, ResultEngine, Transaction,
    ledger::{Direction, LedgerEffect, post_effect},
    transactions,
};

use super::super::super::{Engine, with_tx};
use super::super::helpers::replace_tags;

/// Confirmation returned by [`Engine::delete_transaction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub message: String,
}

impl Engine {
    /// Delete a transaction after reversing its effect on its account and on
    /// the budgets it matched.
    pub async fn delete_transaction(&self, cmd: DeleteTransactionCmd) -> ResultEngine<DeleteOutcome> {
        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, &cmd.user_id, cmd.transaction_id)
                .await?;
            let tx = Transaction::try_from(existing)?;

            post_effect(&db_tx, &LedgerEffect::from(&tx), Direction::Reverse).await?;

            replace_tags(&db_tx, tx.id, &[]).await?;
            transactions::Entity::delete_by_id(tx.id).exec(&db_tx).await?;

            tracing::debug!(transaction_id = %tx.id, "transaction deleted");
            Ok(DeleteOutcome {
                message: "Transaction deleted successfully".to_string(),
            })
        })
    }
}
