use std::collections::HashSet;

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, budgets, categories, tags, transactions};

use super::Engine;

/// Generates a `require_*` method that loads a row by id and checks that it
/// belongs to the caller.
///
/// Missing rows yield `KeyNotFound`, rows owned by another user `Forbidden`.
macro_rules! impl_require_owned {
    ($fn_name:ident, $entity:path, $model:path, $label:literal) => {
        pub(super) async fn $fn_name<C: ConnectionTrait>(
            &self,
            db: &C,
            user_id: &str,
            id: Uuid,
        ) -> ResultEngine<$model> {
            let model = <$entity>::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("{} not exists", $label)))?;
            if model.user_id != user_id {
                return Err(EngineError::Forbidden(format!(
                    "{} belongs to another user",
                    $label
                )));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_require_owned!(require_account, accounts::Entity, accounts::Model, "account");
    impl_require_owned!(
        require_category,
        categories::Entity,
        categories::Model,
        "category"
    );
    impl_require_owned!(require_budget, budgets::Entity, budgets::Model, "budget");
    impl_require_owned!(
        require_transaction,
        transactions::Entity,
        transactions::Model,
        "transaction"
    );

    /// Resolve a list of tag ids, all owned by `user_id`.
    ///
    /// Duplicates are collapsed; the order of first appearance is kept.
    pub(super) async fn require_tags<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        tag_ids: &[Uuid],
    ) -> ResultEngine<Vec<Uuid>> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = tag_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if unique.is_empty() {
            return Ok(unique);
        }

        let found = tags::Entity::find()
            .filter(tags::Column::Id.is_in(unique.iter().copied()))
            .all(db)
            .await?;
        for id in &unique {
            match found.iter().find(|tag| tag.id == *id) {
                None => return Err(EngineError::KeyNotFound(format!("tag {id} not exists"))),
                Some(tag) if tag.user_id != user_id => {
                    return Err(EngineError::Forbidden(
                        "tag belongs to another user".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(unique)
    }
}
