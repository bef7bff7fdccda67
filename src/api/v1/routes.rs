/*
 * Responsibility
 * - URL layout of v1
 * - every v1 route runs behind the authentication gate; only /auth/me
 *   demands a principal (via the CurrentPrincipal extractor)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::{login, register},
    me::me,
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me));

    middleware::auth::access::apply(router, state)
}
