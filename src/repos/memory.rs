//! In-memory `UserStore`.
//!
//! Used for local development without `DATABASE_URL` and in tests. Not durable.
//! Email uniqueness is enforced under the write lock, so concurrent `save`
//! calls for the same email yield exactly one success and `Conflict` for the rest.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Identity, NewIdentity};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::UserStore;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, Identity>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn save(&self, identity: NewIdentity) -> RepoResult<Identity> {
        let mut users = self.users.write().await;
        if users.contains_key(&identity.email) {
            return Err(RepoError::Conflict);
        }

        let stored = Identity {
            id: Uuid::new_v4(),
            email: identity.email,
            password_hash: identity.password_hash,
            first_name: identity.first_name,
            last_name: identity.last_name,
            phone: identity.phone,
            role: identity.role,
            is_verified: identity.is_verified,
            created_at: Utc::now(),
        };
        users.insert(stored.email.clone(), stored.clone());

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::Role;

    fn new_identity(email: &str) -> NewIdentity {
        NewIdentity {
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            role: Role::Customer,
            is_verified: false,
        }
    }

    #[tokio::test]
    async fn save_then_find() {
        let store = InMemoryUserStore::new();
        let saved = store.save(new_identity("john@example.com")).await.unwrap();

        let found = store
            .find_by_email("john@example.com")
            .await
            .unwrap()
            .expect("stored identity");
        assert_eq!(found.id, saved.id);
        assert!(store.exists_by_email("john@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.save(new_identity("john@example.com")).await.unwrap();

        assert!(!store.exists_by_email("John@example.com").await.unwrap());
        assert!(
            store
                .find_by_email("JOHN@EXAMPLE.COM")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_save_is_a_conflict() {
        let store = InMemoryUserStore::new();
        store.save(new_identity("john@example.com")).await.unwrap();

        let err = store
            .save(new_identity("john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn racing_saves_admit_exactly_one() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.save(new_identity("race@example.com")).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.len().await, 1);
    }
}
