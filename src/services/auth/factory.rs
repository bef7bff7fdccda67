/// Factory: build the process-wide auth primitives from application `Config`.
use std::{sync::Arc, time::Duration};

use crate::config::Config;
use crate::services::auth::{TokenCodec, TokenError};

/// Decode the signing secret once; the codec is then shared read-only.
pub fn build_token_codec(config: &Config) -> Result<Arc<TokenCodec>, TokenError> {
    let codec = TokenCodec::from_base64_secret(&config.jwt_secret)?;
    Ok(Arc::new(codec))
}

pub fn token_ttl(config: &Config) -> Duration {
    Duration::from_secs(config.access_token_ttl_seconds)
}
