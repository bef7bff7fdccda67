/*
 * Responsibility
 * - POST /auth/register, POST /auth/login
 * - body rejection → 400, DTO validation → 400 with field map, then the issuer
 * - never logs passwords or tokens
 */
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::info;

use crate::{
    api::v1::dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(req) = body?;
    req.validate()?;

    let issued = state.issuer.register(req.into_command()).await?;
    info!(email = %issued.email, role = %issued.role, "user registered");

    Ok((StatusCode::CREATED, Json(issued.into())))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let issued = state.issuer.login(&req.email, &req.password).await?;
    info!(email = %issued.email, "user logged in");

    Ok(Json(issued.into()))
}
