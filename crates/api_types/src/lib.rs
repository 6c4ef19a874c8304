//! Wire types of the ledger HTTP API.
//!
//! Field names are camelCase. Money crosses the wire as decimal strings with
//! two fraction digits (`"200.00"`); dates as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Thb,
    Usd,
    Eur,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountNew {
        pub name: String,
        /// Opening balance, defaults to `"0"`.
        pub initial_balance: Option<String>,
        pub currency: Option<Currency>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub initial_balance: String,
        pub balance: String,
        pub currency: Currency,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
    }
}

pub mod tag {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagNew {
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TagView {
        pub id: Uuid,
        pub name: String,
    }
}

pub mod transaction {
    use super::*;
    use crate::{account::AccountView, category::CategoryView, tag::TagView};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub category_id: Uuid,
        pub amount: String,
        /// Defaults to the category type.
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
        pub description: Option<String>,
        /// Defaults to today.
        pub date: Option<NaiveDate>,
        pub tag_ids: Option<Vec<Uuid>>,
    }

    /// Partial update. `tagIds`, when present, replaces the whole tag set.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub amount: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
        pub tag_ids: Option<Vec<Uuid>>,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListQuery {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        /// Case-insensitive substring of the description.
        pub search: Option<String>,
        /// Inclusive amount bounds, as decimal strings.
        pub min_amount: Option<String>,
        pub max_amount: Option<String>,
        pub limit: Option<u64>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub amount: String,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub account: AccountView,
        pub category: CategoryView,
        pub tags: Vec<TagView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDeleted {
        pub message: String,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum AlertType {
        OverBudget,
        NearLimit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetNew {
        pub amount: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        /// Absent for a budget covering every category.
        pub category_id: Option<Uuid>,
    }

    /// Partial update. `categoryId: null` turns the budget into a global one.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetUpdate {
        pub amount: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub category_id: Option<Option<Uuid>>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub id: Uuid,
        pub category_id: Option<Uuid>,
        pub amount: String,
        pub spent: String,
        pub remaining: String,
        /// Share of the cap already spent, as a percentage with two decimals.
        pub percentage_used: String,
        pub is_over_budget: bool,
        pub is_near_limit: bool,
        pub alert_type: Option<AlertType>,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CorrectionTarget {
        Account,
        Budget,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CorrectionView {
        pub target: CorrectionTarget,
        pub id: Uuid,
        pub stored: String,
        pub computed: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecomputeResponse {
        pub corrections: Vec<CorrectionView>,
    }
}

#[cfg(test)]
mod tests {
    use super::budget::BudgetUpdate;

    #[test]
    fn budget_update_tells_null_category_from_absent() {
        let absent: BudgetUpdate = serde_json::from_str(r#"{"amount":"10.00"}"#).unwrap();
        assert_eq!(absent.category_id, None);

        let cleared: BudgetUpdate = serde_json::from_str(r#"{"categoryId":null}"#).unwrap();
        assert_eq!(cleared.category_id, Some(None));
    }
}
