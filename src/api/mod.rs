/*
 * Responsibility
 * - gateway routes: local /health + one sub-router per configured upstream
 */
pub mod handlers;
mod routes;

pub use routes::routes;
