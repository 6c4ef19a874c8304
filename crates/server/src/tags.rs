use api_types::tag::{TagNew, TagView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
    views::tag_view,
};

pub async fn create(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TagNew>,
) -> Result<(StatusCode, Json<TagView>), ServerError> {
    let tag = state.engine.create_tag(&user_id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(tag_view(tag))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TagView>>, ServerError> {
    let tags = state.engine.list_tags(&user_id).await?;
    Ok(Json(tags.into_iter().map(tag_view).collect()))
}
