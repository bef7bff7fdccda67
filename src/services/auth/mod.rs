pub mod credential_issuer;
pub mod factory;
pub mod identity_lookup;
pub mod password;
pub mod principal;
pub mod token_codec;

pub use credential_issuer::{CredentialIssuer, IssueError, IssuedCredential, RegisterCommand};
pub use identity_lookup::{IdentityLookup, LookupError};
pub use password::{Argon2PasswordHasher, PasswordError, PasswordHasher};
pub use principal::Principal;
pub use token_codec::{ExtraClaims, TokenClaims, TokenCodec, TokenError};
