use serde::{Deserialize, Serialize};

use crate::api::v1::dto::validation::{Validator, is_blank, is_valid_email, null_as_empty};
use crate::error::AppError;
use crate::models::Role;
use crate::services::auth::{IssuedCredential, RegisterCommand};

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Request body for `POST /auth/register`.
///
/// Every field defaults to empty (missing or `null`) so it surfaces as a
/// field-level validation error rather than a deserialization failure.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    pub phone: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.check("email", !is_blank(&self.email), "Email is required")
            .check("email", is_valid_email(&self.email), "Email must be valid")
            .check("password", !is_blank(&self.password), "Password is required")
            .check(
                "password",
                self.password.chars().count() >= MIN_PASSWORD_CHARS,
                "Password must be at least 8 characters",
            )
            .check("firstName", !is_blank(&self.first_name), "First name is required")
            .check("lastName", !is_blank(&self.last_name), "Last name is required");
        v.finish()
    }

    pub fn into_command(self) -> RegisterCommand {
        RegisterCommand {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone.filter(|p| !is_blank(p)),
        }
    }
}

/// Request body for `POST /auth/login`.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.check("email", !is_blank(&self.email), "Email is required")
            .check("email", is_valid_email(&self.email), "Email must be valid")
            .check("password", !is_blank(&self.password), "Password is required");
        v.finish()
    }
}

/// Issuance receipt returned by register / login.
///
/// Profile fields are a snapshot taken at issuance and are not refreshed later.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    /// Always "Bearer"
    pub token_type: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<IssuedCredential> for AuthResponse {
    fn from(issued: IssuedCredential) -> Self {
        Self {
            token: issued.token,
            token_type: issued.token_type.to_string(),
            email: issued.email,
            first_name: issued.first_name,
            last_name: issued.last_name,
            role: issued.role,
        }
    }
}
