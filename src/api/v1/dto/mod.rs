/*
 * Responsibility
 * - request / response DTOs for v1
 * - request DTOs validate themselves (validate()) before reaching services
 */
pub mod auth;
pub mod users;
pub mod validation;
