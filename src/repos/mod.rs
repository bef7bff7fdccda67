/*
 * Responsibility
 * - user store collaborator: trait + Postgres / in-memory backends
 */
pub mod error;
pub mod memory;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
pub use memory::InMemoryUserStore;
pub use user_repo::{PgUserStore, UserStore};
