pub mod client;
pub mod routes;

pub use client::{ProxyError, ServiceClient};
pub use routes::{Route, build_routes};
