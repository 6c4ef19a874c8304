use api_types::account::{AccountNew, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
    views::{account_view, engine_currency, parse_amount},
};

pub async fn create(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let opening_balance_minor = match payload.initial_balance.as_deref() {
        Some(amount) => parse_amount(amount)?,
        None => 0,
    };
    let currency = engine_currency(payload.currency.unwrap_or_default());
    let account = state
        .engine
        .create_account(&user_id, &payload.name, opening_balance_minor, currency)
        .await?;
    Ok((StatusCode::CREATED, Json(account_view(account))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.list_accounts(&user_id).await?;
    Ok(Json(accounts.into_iter().map(account_view).collect()))
}

pub async fn get(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(&user_id, id).await?;
    Ok(Json(account_view(account)))
}
