use sea_orm::{ActiveModelTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{Account, Currency, EngineError, ResultEngine, accounts, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Return an account snapshot from DB.
    pub async fn account(&self, user_id: &str, account_id: Uuid) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            Account::try_from(model)
        })
    }

    /// List the caller's accounts ordered by name.
    pub async fn list_accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::Name)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Add a new account.
    ///
    /// The balance starts at `opening_balance_minor`, which is kept so the
    /// balance can later be recomputed from the transactions. Names are unique
    /// per user, case-insensitively.
    pub async fn create_account(
        &self,
        user_id: &str,
        name: &str,
        opening_balance_minor: i64,
        currency: Currency,
    ) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        with_tx!(self, |db_tx| {
            let exists = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let account = Account::new(user_id.to_string(), name, opening_balance_minor, currency);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            tracing::debug!(account_id = %account.id, currency = %account.currency, "account created");
            Ok(account)
        })
    }
}
