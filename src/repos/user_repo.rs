/*
 * Responsibility
 * - `users` table access behind the UserStore trait
 * - unique violations come back as RepoError::Conflict (the authoritative duplicate signal)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{Identity, NewIdentity, Role};
use crate::repos::error::{RepoError, RepoResult};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> RepoResult<bool>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>>;

    /// Persist a new identity. Returns `RepoError::Conflict` when the email is taken.
    async fn save(&self, identity: NewIdentity) -> RepoResult<Identity>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    role: String,
    is_verified: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for Identity {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::InvalidRow(e.to_string()))?;

        Ok(Identity {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            role,
            is_verified: row.is_verified,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(RepoError::from_sqlx)?;

        Ok(exists)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Identity>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone,
                   role, is_verified, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(Identity::try_from).transpose()
    }

    async fn save(&self, identity: NewIdentity) -> RepoResult<Identity> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (id, email, password_hash, first_name, last_name, phone, role, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, email, password_hash, first_name, last_name, phone,
                      role, is_verified, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.phone.as_deref())
        .bind(identity.role.as_str())
        .bind(identity.is_verified)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Identity::try_from(row)
    }
}
