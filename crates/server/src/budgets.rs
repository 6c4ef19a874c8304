//! Budgets API endpoints

use api_types::budget::{BudgetNew, BudgetUpdate, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CreateBudgetCmd, UpdateBudgetCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
    views::{budget_view, parse_amount},
};

pub async fn create(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let amount_minor = parse_amount(&payload.amount)?;
    let mut cmd = CreateBudgetCmd::new(user_id, amount_minor, payload.start_date, payload.end_date);
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    let budget = state.engine.create_budget(cmd).await?;
    Ok((StatusCode::CREATED, Json(budget_view(budget.status()))))
}

/// Every budget with spent, remaining and alert figures.
pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let statuses = state.engine.budget_statuses(&user_id).await?;
    Ok(Json(statuses.into_iter().map(budget_view).collect()))
}

pub async fn alerts(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let statuses = state.engine.budget_alerts(&user_id).await?;
    Ok(Json(statuses.into_iter().map(budget_view).collect()))
}

pub async fn get(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let status = state.engine.budget_status(&user_id, id).await?;
    Ok(Json(budget_view(status)))
}

pub async fn update(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let mut cmd = UpdateBudgetCmd::new(user_id, id);
    if let Some(amount) = payload.amount.as_deref() {
        cmd = cmd.amount_minor(parse_amount(amount)?);
    }
    if let Some(start_date) = payload.start_date {
        cmd = cmd.start_date(start_date);
    }
    if let Some(end_date) = payload.end_date {
        cmd = cmd.end_date(end_date);
    }
    match payload.category_id {
        Some(Some(category_id)) => cmd = cmd.category_id(category_id),
        Some(None) => cmd = cmd.all_categories(),
        None => {}
    }
    let budget = state.engine.update_budget(cmd).await?;
    Ok(Json(budget_view(budget.status())))
}

pub async fn delete(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
