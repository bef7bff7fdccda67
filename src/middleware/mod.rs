/*
 * Responsibility
 * - middleware entry points (each module exposes `apply`)
 */
pub mod auth;
pub mod http;
