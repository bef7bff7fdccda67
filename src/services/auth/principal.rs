use crate::models::{Identity, Role};

/// Authenticated caller for the current request.
///
/// - built by the authentication gate from a freshly resolved `Identity`
/// - lives in the request extensions; read-only for handlers
/// - never persisted and never shared across requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    role: Role,
}

impl Principal {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            subject: identity.subject().to_string(),
            role: identity.role,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Authority labels in the external `ROLE_*` format.
    pub fn authorities(&self) -> Vec<&'static str> {
        vec![self.role.authority()]
    }
}
