//! The module contains `Account` struct and its storage model.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError};

/// An account.
///
/// An account is where money is kept, such as a wallet or a bank account.
/// `balance_minor` is a running total maintained by the engine:
/// `balance_minor == opening_balance_minor + Σ signed(transaction)` over the
/// transactions currently booked on the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub opening_balance_minor: i64,
    pub balance_minor: i64,
    pub currency: Currency,
}

impl Account {
    pub fn new(user_id: String, name: String, opening_balance_minor: i64, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            opening_balance_minor,
            balance_minor: opening_balance_minor,
            currency,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub opening_balance_minor: i64,
    pub balance_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            opening_balance_minor: ActiveValue::Set(value.opening_balance_minor),
            balance_minor: ActiveValue::Set(value.balance_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            opening_balance_minor: model.opening_balance_minor,
            balance_minor: model.balance_minor,
            currency: Currency::try_from(model.currency.as_str())?,
        })
    }
}
