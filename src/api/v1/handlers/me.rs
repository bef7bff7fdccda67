use axum::{Json, extract::State};

use crate::{
    api::v1::{dto::users::UserResponse, extractors::CurrentPrincipal},
    error::AppError,
    state::AppState,
};

/// GET /auth/me: profile of the caller, re-read from the store.
pub async fn me(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<Json<UserResponse>, AppError> {
    let identity = state.identities.resolve(principal.subject()).await?;
    Ok(Json(identity.into()))
}
