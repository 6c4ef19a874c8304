//! Mapping between engine types and wire types.

use api_types::{
    Currency as ApiCurrency, TransactionType as ApiType,
    account::AccountView,
    budget::{AlertType, BudgetView},
    category::CategoryView,
    ledger::{CorrectionTarget as ApiTarget, CorrectionView},
    tag::TagView,
    transaction::TransactionView,
};
use engine::{
    Account, BudgetAlert, BudgetStatus, Category, CorrectionTarget, Currency, LedgerCorrection,
    Money, Tag, TransactionDetail, TransactionType,
};

use crate::ServerError;

pub(crate) fn map_kind(kind: TransactionType) -> ApiType {
    match kind {
        TransactionType::Income => ApiType::Income,
        TransactionType::Expense => ApiType::Expense,
    }
}

pub(crate) fn engine_kind(kind: ApiType) -> TransactionType {
    match kind {
        ApiType::Income => TransactionType::Income,
        ApiType::Expense => TransactionType::Expense,
    }
}

pub(crate) fn map_currency(currency: Currency) -> ApiCurrency {
    match currency {
        Currency::Thb => ApiCurrency::Thb,
        Currency::Usd => ApiCurrency::Usd,
        Currency::Eur => ApiCurrency::Eur,
    }
}

pub(crate) fn engine_currency(currency: ApiCurrency) -> Currency {
    match currency {
        ApiCurrency::Thb => Currency::Thb,
        ApiCurrency::Usd => Currency::Usd,
        ApiCurrency::Eur => Currency::Eur,
    }
}

/// Parse a wire amount into minor units.
pub(crate) fn parse_amount(value: &str) -> Result<i64, ServerError> {
    Ok(value.parse::<Money>()?.minor())
}

pub(crate) fn format_amount(minor: i64) -> String {
    Money::new(minor).to_string()
}

/// Basis points as a percentage with two decimals (`8333` -> `"83.33"`).
fn format_basis_points(bp: i64) -> String {
    let sign = if bp < 0 { "-" } else { "" };
    let abs = bp.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

pub(crate) fn account_view(account: Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        initial_balance: format_amount(account.opening_balance_minor),
        balance: format_amount(account.balance_minor),
        currency: map_currency(account.currency),
    }
}

pub(crate) fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
    }
}

pub(crate) fn tag_view(tag: Tag) -> TagView {
    TagView {
        id: tag.id,
        name: tag.name,
    }
}

pub(crate) fn transaction_view(detail: TransactionDetail) -> TransactionView {
    let tx = detail.transaction;
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount: format_amount(tx.amount_minor),
        description: tx.description,
        date: tx.date,
        account: account_view(detail.account),
        category: category_view(detail.category),
        tags: detail.tags.into_iter().map(tag_view).collect(),
    }
}

pub(crate) fn budget_view(status: BudgetStatus) -> BudgetView {
    let budget = status.budget;
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        amount: format_amount(budget.amount_minor),
        spent: format_amount(budget.spent_minor),
        remaining: format_amount(status.remaining_minor),
        percentage_used: format_basis_points(status.percentage_used_bp),
        is_over_budget: status.is_over_budget,
        is_near_limit: status.is_near_limit,
        alert_type: status.alert.map(|alert| match alert {
            BudgetAlert::OverBudget => AlertType::OverBudget,
            BudgetAlert::NearLimit => AlertType::NearLimit,
        }),
        start_date: budget.start_date,
        end_date: budget.end_date,
    }
}

pub(crate) fn correction_view(correction: LedgerCorrection) -> CorrectionView {
    let (target, id) = match correction.target {
        CorrectionTarget::Account(id) => (ApiTarget::Account, id),
        CorrectionTarget::Budget(id) => (ApiTarget::Budget, id),
    };
    CorrectionView {
        target,
        id,
        stored: format_amount(correction.stored_minor),
        computed: format_amount(correction.computed_minor),
    }
}
