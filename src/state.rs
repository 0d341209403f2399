/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 *   - authority client, upstream client, route table
 * - cheap to clone (Arc / reqwest::Client inside)
 */
use std::sync::Arc;

use crate::services::{
    auth::Authority,
    proxy::{Route, ServiceClient},
};

#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<dyn Authority>,
    pub proxy: ServiceClient,
    pub routes: Arc<Vec<Arc<Route>>>,
}

impl AppState {
    pub fn new(
        authority: Arc<dyn Authority>,
        proxy: ServiceClient,
        routes: Vec<Arc<Route>>,
    ) -> Self {
        Self {
            authority,
            proxy,
            routes: Arc::new(routes),
        }
    }
}
