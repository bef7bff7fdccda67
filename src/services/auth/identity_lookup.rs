use std::sync::Arc;

use thiserror::Error;

use crate::models::Identity;
use crate::repos::{RepoError, UserStore};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("identity not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] RepoError),
}

/// Resolves a subject (email) to the stored identity. Read-only.
#[derive(Clone)]
pub struct IdentityLookup {
    store: Arc<dyn UserStore>,
}

impl IdentityLookup {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, subject: &str) -> Result<Identity, LookupError> {
        self.store
            .find_by_email(subject)
            .await?
            .ok_or(LookupError::NotFound)
    }
}
