pub mod access;

pub use access::{BEARER_PREFIX, authenticate, bearer_token};
