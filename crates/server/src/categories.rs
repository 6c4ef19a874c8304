use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
    views::{category_view, engine_kind},
};

pub async fn create(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(&user_id, &payload.name, engine_kind(payload.kind))
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(&user_id).await?;
    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn update(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state
        .engine
        .update_category(
            &user_id,
            id,
            payload.name.as_deref(),
            payload.kind.map(engine_kind),
        )
        .await?;
    Ok(Json(category_view(category)))
}

pub async fn delete(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
