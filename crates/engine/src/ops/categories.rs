use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, TransactionType, budgets, categories, transactions,
    util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    async fn ensure_category_name_free<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()));
        if let Some(id) = except {
            query = query.filter(categories::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }

    /// List the caller's categories ordered by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Add a category. `kind` is the type inherited by transactions created
    /// without an explicit one.
    pub async fn create_category(
        &self,
        user_id: &str,
        name: &str,
        kind: TransactionType,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.ensure_category_name_free(&db_tx, user_id, &name, None)
                .await?;
            let category = Category {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                name,
                kind,
            };
            categories::ActiveModel {
                id: ActiveValue::Set(category.id),
                user_id: ActiveValue::Set(category.user_id.clone()),
                name: ActiveValue::Set(category.name.clone()),
                kind: ActiveValue::Set(category.kind.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;
            Ok(category)
        })
    }

    /// Rename a category or change its default type.
    ///
    /// Existing transactions keep their stored type.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        name: Option<&str>,
        kind: Option<TransactionType>,
    ) -> ResultEngine<Category> {
        let name = name
            .map(|n| normalize_required_name(n, "category"))
            .transpose()?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_category(&db_tx, user_id, category_id)
                .await?;
            if name.is_none() && kind.is_none() {
                return Category::try_from(model);
            }
            let mut active: categories::ActiveModel = model.into();
            if let Some(name) = name {
                self.ensure_category_name_free(&db_tx, user_id, &name, Some(category_id))
                    .await?;
                active.name = ActiveValue::Set(name);
            }
            if let Some(kind) = kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Delete a category.
    ///
    /// Refused with `InUse` while transactions or budgets still reference it.
    pub async fn delete_category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id)
                .await?;

            let transaction_refs = transactions::Entity::find()
                .filter(transactions::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            let budget_refs = budgets::Entity::find()
                .filter(budgets::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            if transaction_refs > 0 || budget_refs > 0 {
                return Err(EngineError::InUse(format!(
                    "category is referenced by {transaction_refs} transactions and {budget_refs} budgets"
                )));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
