use sea_orm::{ActiveModelTrait, TransactionTrait};

use crate::{
    ResultEngine, Transaction, TransactionDetail, UpdateTransactionCmd,
    ledger::{Direction, LedgerEffect, post_effect},
    transactions,
    util::{apply_optional_text_patch, require_id, require_positive_amount},
};

use super::super::super::{Engine, with_tx};
use super::super::helpers::{load_detail, replace_tags, resolve_kind};

impl Engine {
    /// Patch a transaction.
    ///
    /// The old effect is reversed against the old account and the budgets
    /// matching the old `(date, category)`; the new effect is then applied
    /// against the new account and the budgets matching the new pair. The
    /// type stays as stored unless `cmd.kind` is set: moving to another
    /// category does not re-inherit its type.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        if let Some(amount_minor) = cmd.amount_minor {
            require_positive_amount(amount_minor)?;
        }
        if let Some(account_id) = cmd.account_id {
            require_id(account_id, "account_id")?;
        }
        if let Some(category_id) = cmd.category_id {
            require_id(category_id, "category_id")?;
        }

        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, &cmd.user_id, cmd.transaction_id)
                .await?;
            let old = Transaction::try_from(existing)?;

            if let Some(category_id) = cmd.category_id {
                self.require_category(&db_tx, &cmd.user_id, category_id)
                    .await?;
            }
            if let Some(account_id) = cmd.account_id {
                self.require_account(&db_tx, &cmd.user_id, account_id)
                    .await?;
            }
            let tag_ids = match cmd.tag_ids.as_deref() {
                Some(ids) => Some(self.require_tags(&db_tx, &cmd.user_id, ids).await?),
                None => None,
            };

            post_effect(&db_tx, &LedgerEffect::from(&old), Direction::Reverse).await?;

            let new = Transaction {
                id: old.id,
                user_id: old.user_id.clone(),
                account_id: cmd.account_id.unwrap_or(old.account_id),
                category_id: cmd.category_id.unwrap_or(old.category_id),
                kind: resolve_kind(cmd.kind, old.kind),
                amount_minor: cmd.amount_minor.unwrap_or(old.amount_minor),
                description: apply_optional_text_patch(
                    old.description.clone(),
                    cmd.description.as_deref(),
                ),
                date: cmd.date.unwrap_or(old.date),
            };
            let model = transactions::ActiveModel::from(&new).update(&db_tx).await?;

            post_effect(&db_tx, &LedgerEffect::from(&new), Direction::Apply).await?;

            if let Some(tag_ids) = tag_ids {
                replace_tags(&db_tx, new.id, &tag_ids).await?;
            }

            tracing::debug!(
                transaction_id = %new.id,
                old_amount_minor = old.amount_minor,
                new_amount_minor = new.amount_minor,
                "transaction updated"
            );
            load_detail(&db_tx, model).await
        })
    }
}
