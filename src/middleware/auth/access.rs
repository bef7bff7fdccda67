//! Bearer token → `Principal` in request extensions.
//!
//! Runs once per request, before handlers:
//! - no `Authorization: Bearer ...` header: pass through anonymous
//! - token fails to decode / subject unknown / token invalid or expired: pass
//!   through anonymous (never a 4xx/5xx from here)
//! - otherwise attach a `Principal` built from the freshly resolved identity
//!
//! Rejecting anonymous callers is the job of the `CurrentPrincipal` extractor
//! on the routes that need it.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::services::auth::{LookupError, Principal};
use crate::state::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Apply the authentication gate to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes::router();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authenticate))
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Own the token so no borrow of the request is held across the lookup.
    let token = bearer_token(req.headers()).map(str::to_owned);
    let already_attached = req.extensions().get::<Principal>().is_some();

    if !already_attached
        && let Some(token) = token
        && let Some(principal) = resolve_principal(&state, &token).await
    {
        // middleware → extractor
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// The raw token from `Authorization: Bearer <token>`, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

async fn resolve_principal(state: &AppState, token: &str) -> Option<Principal> {
    let subject = match state.codec.extract_subject(token) {
        Ok(subject) => subject,
        Err(err) => {
            debug!(error = %err, "bearer token ignored");
            return None;
        }
    };

    let identity = match state.identities.resolve(&subject).await {
        Ok(identity) => identity,
        Err(LookupError::NotFound) => {
            debug!("bearer token subject has no identity");
            return None;
        }
        Err(err) => {
            warn!(error = %err, "identity lookup failed; continuing anonymous");
            return None;
        }
    };

    // Cross-check against the stored subject, not the token's own claim.
    if !state.codec.is_valid(token, identity.subject()) {
        debug!("bearer token expired or invalid");
        return None;
    }

    let principal = Principal::from_identity(&identity);
    debug!(
        user_id = %identity.id,
        authorities = ?principal.authorities(),
        "principal attached"
    );

    Some(principal)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token_after_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_or_other_scheme_yields_nothing() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
    }
}
