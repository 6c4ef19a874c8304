use api_types::ledger::RecomputeResponse;
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
    views::correction_view,
};

/// Rebuild the caller's balances and budget totals from the transactions.
pub async fn recompute(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<RecomputeResponse>, ServerError> {
    let corrections = state.engine.recompute_ledger(&user_id).await?;
    Ok(Json(RecomputeResponse {
        corrections: corrections.into_iter().map(correction_view).collect(),
    }))
}
