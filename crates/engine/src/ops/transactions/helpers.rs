use std::collections::HashMap;

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Account, Category, EngineError, ResultEngine, Tag, Transaction, TransactionDetail,
    TransactionType, accounts, categories, tags, transaction_tags, transactions,
};

/// Effective type of a transaction: an explicit type wins over the fallback
/// (the category type on create, the stored type on update).
pub(super) fn resolve_kind(
    explicit: Option<TransactionType>,
    fallback: TransactionType,
) -> TransactionType {
    explicit.unwrap_or(fallback)
}

/// Replace the tag set of a transaction (delete-all, then insert).
pub(super) async fn replace_tags<C: ConnectionTrait>(
    db: &C,
    transaction_id: Uuid,
    tag_ids: &[Uuid],
) -> ResultEngine<()> {
    transaction_tags::Entity::delete_many()
        .filter(transaction_tags::Column::TransactionId.eq(transaction_id))
        .exec(db)
        .await?;
    if tag_ids.is_empty() {
        return Ok(());
    }
    let links = tag_ids.iter().map(|tag_id| transaction_tags::ActiveModel {
        transaction_id: sea_orm::ActiveValue::Set(transaction_id),
        tag_id: sea_orm::ActiveValue::Set(*tag_id),
    });
    transaction_tags::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Load account, category and tags for a batch of transaction rows,
/// preserving the input order.
pub(super) async fn load_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<transactions::Model>,
) -> ResultEngine<Vec<TransactionDetail>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let account_ids: Vec<Uuid> = models.iter().map(|m| m.account_id).collect();
    let category_ids: Vec<Uuid> = models.iter().map(|m| m.category_id).collect();
    let transaction_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let mut accounts_by_id = HashMap::new();
    for model in accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(account_ids))
        .all(db)
        .await?
    {
        accounts_by_id.insert(model.id, Account::try_from(model)?);
    }

    let mut categories_by_id = HashMap::new();
    for model in categories::Entity::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .all(db)
        .await?
    {
        categories_by_id.insert(model.id, Category::try_from(model)?);
    }

    let mut tags_by_tx: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (link, tag) in transaction_tags::Entity::find()
        .filter(transaction_tags::Column::TransactionId.is_in(transaction_ids))
        .find_also_related(tags::Entity)
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await?
    {
        if let Some(tag) = tag {
            tags_by_tx
                .entry(link.transaction_id)
                .or_default()
                .push(Tag::from(tag));
        }
    }

    models
        .into_iter()
        .map(|model| {
            let account = accounts_by_id
                .get(&model.account_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
            let category = categories_by_id
                .get(&model.category_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            let tags = tags_by_tx.remove(&model.id).unwrap_or_default();
            Ok(TransactionDetail {
                transaction: Transaction::try_from(model)?,
                account,
                category,
                tags,
            })
        })
        .collect()
}

pub(super) async fn load_detail<C: ConnectionTrait>(
    db: &C,
    model: transactions::Model,
) -> ResultEngine<TransactionDetail> {
    load_details(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_kind_wins_over_fallback() {
        assert_eq!(
            resolve_kind(Some(TransactionType::Income), TransactionType::Expense),
            TransactionType::Income
        );
        assert_eq!(
            resolve_kind(None, TransactionType::Expense),
            TransactionType::Expense
        );
    }
}
