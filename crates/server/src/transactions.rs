//! Transactions API endpoints

use api_types::transaction::{
    TransactionDeleted, TransactionListQuery, TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    CreateTransactionCmd, DeleteTransactionCmd, TransactionListFilter, UpdateTransactionCmd,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
    views::{engine_kind, parse_amount, transaction_view},
};

/// Default page size of `GET /transactions`.
const DEFAULT_LIMIT: u64 = 100;

pub async fn create(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let amount_minor = parse_amount(&payload.amount)?;
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());

    let mut cmd = CreateTransactionCmd::new(
        user_id,
        payload.account_id,
        payload.category_id,
        amount_minor,
        date,
    )
    .tag_ids(payload.tag_ids.unwrap_or_default());
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(engine_kind(kind));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let detail = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(detail))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        account_id: query.account_id,
        category_id: query.category_id,
        kind: query.kind.map(engine_kind),
        from: query.from,
        to: query.to,
        search: query.search,
        min_amount_minor: query.min_amount.as_deref().map(parse_amount).transpose()?,
        max_amount_minor: query.max_amount.as_deref().map(parse_amount).transpose()?,
        limit: Some(query.limit.unwrap_or(DEFAULT_LIMIT)),
    };
    let details = state.engine.list_transactions(&user_id, &filter).await?;
    Ok(Json(details.into_iter().map(transaction_view).collect()))
}

pub async fn get(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let detail = state.engine.transaction(&user_id, id).await?;
    Ok(Json(transaction_view(detail)))
}

pub async fn update(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(user_id, id);
    if let Some(account_id) = payload.account_id {
        cmd = cmd.account_id(account_id);
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(amount) = payload.amount.as_deref() {
        cmd = cmd.amount_minor(parse_amount(amount)?);
    }
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(engine_kind(kind));
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(date) = payload.date {
        cmd = cmd.date(date);
    }
    if let Some(tag_ids) = payload.tag_ids {
        cmd = cmd.tag_ids(tag_ids);
    }

    let detail = state.engine.update_transaction(cmd).await?;
    Ok(Json(transaction_view(detail)))
}

pub async fn delete(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDeleted>, ServerError> {
    let outcome = state
        .engine
        .delete_transaction(DeleteTransactionCmd::new(user_id, id))
        .await?;
    Ok(Json(TransactionDeleted {
        message: outcome.message,
    }))
}
