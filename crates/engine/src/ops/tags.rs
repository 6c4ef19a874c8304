use sea_orm::{ActiveModelTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Tag, tags, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Create a tag; names are unique per user, case-insensitively.
    pub async fn create_tag(&self, user_id: &str, name: &str) -> ResultEngine<Tag> {
        let name = normalize_required_name(name, "tag")?;
        with_tx!(self, |db_tx| {
            let exists = tags::Entity::find()
                .filter(tags::Column::UserId.eq(user_id))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }
            let tag = Tag {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                name,
            };
            tags::ActiveModel::from(&tag).insert(&db_tx).await?;
            Ok(tag)
        })
    }

    pub async fn list_tags(&self, user_id: &str) -> ResultEngine<Vec<Tag>> {
        with_tx!(self, |db_tx| {
            let models = tags::Entity::find()
                .filter(tags::Column::UserId.eq(user_id))
                .order_by_asc(tags::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Tag::from).collect())
        })
    }
}
