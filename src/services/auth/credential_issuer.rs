use std::{sync::Arc, time::Duration};

use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Identity, NewIdentity, Role};
use crate::repos::{RepoError, UserStore};
use crate::services::auth::password::{PasswordError, PasswordHasher};
use crate::services::auth::token_codec::{ExtraClaims, TokenCodec, TokenError};

// Verified against when the email is unknown, so a login miss costs one hash
// verification like a wrong password does.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("email already registered")]
    Duplicate,

    /// Unknown email and wrong password are deliberately the same error.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] RepoError),

    #[error(transparent)]
    Hash(#[from] PasswordError),
}

/// Input for registration. The plaintext password only lives here until hashing.
#[derive(Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl std::fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Issuance receipt: token plus a snapshot of the identity taken at issuance.
///
/// Handlers map this into the HTTP DTO (AuthResponse).
#[derive(Clone, Debug)]
pub struct IssuedCredential {
    pub token: String,
    pub token_type: &'static str,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Registration and login: the only places tokens are minted.
pub struct CredentialIssuer {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
    dummy_digest: String,
}

impl CredentialIssuer {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Result<Self, IssueError> {
        let dummy_digest = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            hasher,
            codec,
            token_ttl,
            dummy_digest,
        })
    }

    /// Register a new customer and mint its first token.
    ///
    /// The existence pre-check only short-circuits the common case; the store's
    /// uniqueness constraint (`RepoError::Conflict`) is what decides a race.
    pub async fn register(&self, cmd: RegisterCommand) -> Result<IssuedCredential, IssueError> {
        if self.store.exists_by_email(&cmd.email).await? {
            info!(email = %cmd.email, "registration rejected: email already registered");
            return Err(IssueError::Duplicate);
        }

        let password_hash = self.hash_blocking(cmd.password).await?;

        let identity = self
            .store
            .save(NewIdentity {
                email: cmd.email,
                password_hash,
                first_name: cmd.first_name,
                last_name: cmd.last_name,
                phone: cmd.phone,
                role: Role::Customer,
                is_verified: false,
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict => IssueError::Duplicate,
                other => IssueError::Store(other),
            })?;

        info!(user_id = %identity.id, email = %identity.email, "identity registered");

        self.mint(&identity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedCredential, IssueError> {
        let identity = self.store.find_by_email(email).await?;

        let digest = identity
            .as_ref()
            .map(|i| i.password_hash.as_str())
            .unwrap_or(self.dummy_digest.as_str());
        let matches = self.verify_blocking(password, digest).await?;

        match identity {
            Some(identity) if matches => self.mint(&identity),
            _ => {
                warn!("login rejected: invalid credentials");
                Err(IssueError::InvalidCredentials)
            }
        }
    }

    fn mint(&self, identity: &Identity) -> Result<IssuedCredential, IssueError> {
        let mut claims = ExtraClaims::new();
        claims.insert("role".into(), json!(identity.role.as_str()));

        let token = self
            .codec
            .encode(identity.subject(), &claims, self.token_ttl)?;

        Ok(IssuedCredential {
            token,
            token_type: "Bearer",
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            role: identity.role,
        })
    }

    // Argon2 is CPU-heavy; keep it off the async workers.
    async fn hash_blocking(&self, plaintext: String) -> Result<String, PasswordError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))?
    }

    async fn verify_blocking(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        let hasher = self.hasher.clone();
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::repos::{InMemoryUserStore, RepoResult};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    /// Deterministic hasher that records every call.
    #[derive(Default)]
    struct FakeHasher {
        calls: Mutex<Vec<String>>,
    }

    impl PasswordHasher for FakeHasher {
        fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
            self.calls.lock().unwrap().push("hash".into());
            Ok(format!("hashed:{}", plaintext.len()))
        }

        fn verify(&self, plaintext: &str, digest: &str) -> bool {
            self.calls.lock().unwrap().push("verify".into());
            digest == format!("hashed:{}", plaintext.len())
        }
    }

    /// Store wrapper that logs calls and the records handed to `save`.
    struct RecordingStore {
        inner: InMemoryUserStore,
        events: Arc<Mutex<Vec<String>>>,
        saved: Mutex<Vec<NewIdentity>>,
        // Pretend the pre-check missed a concurrent insert.
        hide_existing: bool,
    }

    impl RecordingStore {
        fn new(events: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                inner: InMemoryUserStore::new(),
                events,
                saved: Mutex::new(Vec::new()),
                hide_existing: false,
            }
        }
    }

    #[async_trait]
    impl UserStore for RecordingStore {
        async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
            self.events.lock().unwrap().push("exists".into());
            if self.hide_existing {
                return Ok(false);
            }
            self.inner.exists_by_email(email).await
        }

        async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
            self.events.lock().unwrap().push("find".into());
            self.inner.find_by_email(email).await
        }

        async fn save(&self, identity: NewIdentity) -> RepoResult<Identity> {
            self.events.lock().unwrap().push("save".into());
            self.saved.lock().unwrap().push(identity.clone());
            self.inner.save(identity).await
        }
    }

    /// Hasher that pushes into the shared event log so ordering can be asserted.
    struct OrderedHasher {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl PasswordHasher for OrderedHasher {
        fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
            self.events.lock().unwrap().push("hash".into());
            Ok(format!("hashed:{}", plaintext.len()))
        }

        fn verify(&self, plaintext: &str, digest: &str) -> bool {
            digest == format!("hashed:{}", plaintext.len())
        }
    }

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::from_secret(SECRET).unwrap())
    }

    fn john() -> RegisterCommand {
        RegisterCommand {
            email: "john@example.com".into(),
            password: "password123".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            phone: None,
        }
    }

    fn issuer(store: Arc<dyn UserStore>) -> CredentialIssuer {
        CredentialIssuer::new(
            store,
            Arc::new(FakeHasher::default()),
            codec(),
            Duration::from_secs(3600),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn register_returns_token_and_profile_snapshot() {
        let issuer = issuer(Arc::new(InMemoryUserStore::new()));

        let issued = issuer.register(john()).await.unwrap();

        assert!(!issued.token.is_empty());
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.email, "john@example.com");
        assert_eq!(issued.first_name, "John");
        assert_eq!(issued.last_name, "Doe");
        assert_eq!(issued.role, Role::Customer);
    }

    #[tokio::test]
    async fn registered_token_is_valid_for_the_subject() {
        let codec = codec();
        let issuer = CredentialIssuer::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(FakeHasher::default()),
            codec.clone(),
            Duration::from_secs(3600),
        )
        .unwrap();

        let issued = issuer.register(john()).await.unwrap();

        assert!(codec.is_valid(&issued.token, "john@example.com"));
        let claims = codec.decode(&issued.token).unwrap();
        assert_eq!(claims.extra.get("role"), Some(&json!("CUSTOMER")));
    }

    #[tokio::test]
    async fn register_persists_unverified_customer_with_hashed_password() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(RecordingStore::new(events.clone()));
        let issuer = CredentialIssuer::new(
            store.clone(),
            Arc::new(OrderedHasher {
                events: events.clone(),
            }),
            codec(),
            Duration::from_secs(3600),
        )
        .unwrap();
        events.lock().unwrap().clear();

        issuer.register(john()).await.unwrap();

        assert_eq!(*events.lock().unwrap(), vec!["exists", "hash", "save"]);

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].password_hash, "hashed:11");
        assert_ne!(saved[0].password_hash, "password123");
        assert_eq!(saved[0].role, Role::Customer);
        assert!(!saved[0].is_verified);
    }

    #[tokio::test]
    async fn duplicate_email_writes_nothing_and_mints_nothing() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(RecordingStore::new(events.clone()));
        let issuer = issuer(store.clone());
        issuer.register(john()).await.unwrap();
        events.lock().unwrap().clear();

        let err = issuer.register(john()).await.unwrap_err();

        assert!(matches!(err, IssueError::Duplicate));
        assert_eq!(*events.lock().unwrap(), vec!["exists"]);
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_conflict_is_the_authoritative_duplicate() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = RecordingStore::new(events);
        store.hide_existing = true;
        let store = Arc::new(store);
        let issuer = issuer(store.clone());

        issuer.register(john()).await.unwrap();
        let err = issuer.register(john()).await.unwrap_err();

        assert!(matches!(err, IssueError::Duplicate));
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn login_with_correct_password_issues_token() {
        let codec = codec();
        let issuer = CredentialIssuer::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(FakeHasher::default()),
            codec.clone(),
            Duration::from_secs(3600),
        )
        .unwrap();
        issuer.register(john()).await.unwrap();

        let issued = issuer
            .login("john@example.com", "password123")
            .await
            .unwrap();

        assert_eq!(issued.email, "john@example.com");
        assert!(codec.is_valid(&issued.token, "john@example.com"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let hasher = Arc::new(FakeHasher::default());
        let issuer = CredentialIssuer::new(
            Arc::new(InMemoryUserStore::new()),
            hasher.clone(),
            codec(),
            Duration::from_secs(3600),
        )
        .unwrap();
        issuer.register(john()).await.unwrap();
        hasher.calls.lock().unwrap().clear();

        let wrong = issuer
            .login("john@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown = issuer
            .login("nobody@example.com", "password123")
            .await
            .unwrap_err();

        assert!(matches!(wrong, IssueError::InvalidCredentials));
        assert!(matches!(unknown, IssueError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
        // both paths run exactly one verification
        assert_eq!(*hasher.calls.lock().unwrap(), vec!["verify", "verify"]);
    }
}
