use sea_orm::{ActiveModelTrait, TransactionTrait};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, ResultEngine, Transaction, TransactionDetail, TransactionType,
    ledger::{Direction, LedgerEffect, post_effect},
    transactions,
    util::{normalize_optional_text, require_id, require_positive_amount},
};

use super::super::super::{Engine, with_tx};
use super::super::helpers::{load_detail, replace_tags, resolve_kind};

impl Engine {
    /// Create a transaction and post its effect on the ledger.
    ///
    /// Without an explicit type the transaction inherits its category type.
    /// The account balance moves by the signed amount and every budget
    /// matching `(date, category)` gets the spent delta, all in one database
    /// transaction.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        require_positive_amount(cmd.amount_minor)?;
        require_id(cmd.account_id, "account_id")?;
        require_id(cmd.category_id, "category_id")?;

        with_tx!(self, |db_tx| {
            let category = self
                .require_category(&db_tx, &cmd.user_id, cmd.category_id)
                .await?;
            let kind = resolve_kind(cmd.kind, TransactionType::try_from(category.kind.as_str())?);
            self.require_account(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;
            let tag_ids = self
                .require_tags(&db_tx, &cmd.user_id, &cmd.tag_ids)
                .await?;

            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                account_id: cmd.account_id,
                category_id: cmd.category_id,
                kind,
                amount_minor: cmd.amount_minor,
                description: normalize_optional_text(cmd.description.as_deref()),
                date: cmd.date,
            };
            let model = transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            replace_tags(&db_tx, tx.id, &tag_ids).await?;
            post_effect(&db_tx, &LedgerEffect::from(&tx), Direction::Apply).await?;

            tracing::debug!(
                transaction_id = %tx.id,
                kind = tx.kind.as_str(),
                amount_minor = tx.amount_minor,
                "transaction created"
            );
            load_detail(&db_tx, model).await
        })
    }
}
