/*
 * Responsibility
 * - domain records shared by repos / services / api
 */
mod identity;
mod role;

pub use identity::{Identity, NewIdentity};
pub use role::{Role, UnknownRole};
