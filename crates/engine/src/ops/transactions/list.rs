use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, TransactionDetail, TransactionType, transactions};

use super::super::{Engine, with_tx};
use super::helpers::{load_detail, load_details};

/// Filters for listing transactions.
///
/// `from`/`to` and `min_amount_minor`/`max_amount_minor` are inclusive.
/// `search` matches a case-insensitive substring of the description.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub min_amount_minor: Option<i64>,
    pub max_amount_minor: Option<i64>,
    /// Maximum number of rows returned, newest first.
    pub limit: Option<u64>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::Validation(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (filter.min_amount_minor, filter.max_amount_minor)
        && min > max
    {
        return Err(EngineError::Validation(
            "invalid range: min amount must be <= max amount".to_string(),
        ));
    }
    if filter.limit == Some(0) {
        return Err(EngineError::Validation("limit must be > 0".to_string()));
    }
    Ok(())
}

/// `LIKE` pattern for a description search; blank searches match everything.
fn search_pattern(search: &str) -> Option<String> {
    let needle = search.trim();
    if needle.is_empty() {
        return None;
    }
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(account_id) = filter.account_id {
            self = self.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::Date.lte(to));
        }
        if let Some(min) = filter.min_amount_minor {
            self = self.filter(transactions::Column::AmountMinor.gte(min));
        }
        if let Some(max) = filter.max_amount_minor {
            self = self.filter(transactions::Column::AmountMinor.lte(max));
        }
        if let Some(pattern) = filter.search.as_deref().and_then(search_pattern) {
            self = self.filter(Expr::cust_with_values(
                "LOWER(description) LIKE ? ESCAPE '\\'",
                [pattern],
            ));
        }
        self
    }
}

impl Engine {
    /// Return a transaction with its account, category and tags.
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<TransactionDetail> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            load_detail(&db_tx, model).await
        })
    }

    /// Lists the caller's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<TransactionDetail>> {
        validate_list_filter(filter)?;
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::Id);
            if let Some(limit) = filter.limit {
                query = query.limit(limit);
            }
            let models = query.all(&db_tx).await?;
            load_details(&db_tx, models).await
        })
    }
}
