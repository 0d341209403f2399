/*
 * Responsibility
 * - public middleware surface
 * - auth (authorization filter), unauthorized (401 normalization), http (plumbing)
 */
pub mod auth;
pub mod http;
pub mod unauthorized;
