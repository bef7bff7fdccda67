/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - Clone is cheap (everything inside is Arc / Clone)
 * - holds no per-request data; the caller's identity lives in request extensions
 */
use std::{sync::Arc, time::Duration};

use crate::repos::UserStore;
use crate::services::auth::{
    CredentialIssuer, IdentityLookup, IssueError, PasswordHasher, TokenCodec,
};

#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub identities: IdentityLookup,
    pub issuer: Arc<CredentialIssuer>,
}

impl AppState {
    pub fn new(
        codec: Arc<TokenCodec>,
        identities: IdentityLookup,
        issuer: Arc<CredentialIssuer>,
    ) -> Self {
        Self {
            codec,
            identities,
            issuer,
        }
    }

    /// Wire the auth services around a single user store.
    pub fn with_store(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Result<Self, IssueError> {
        let issuer = CredentialIssuer::new(store.clone(), hasher, codec.clone(), token_ttl)?;

        Ok(Self::new(
            codec,
            IdentityLookup::new(store),
            Arc::new(issuer),
        ))
    }
}
