/*
 * Responsibility
 * - fixed route table (prefix -> upstream), built once at startup
 * - prefix stripping before forwarding
 * - which routes sit behind the authorization filter
 */
use std::sync::Arc;

use url::Url;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: &'static str,
    prefix: String,
    upstream: Url,
    strip_prefix: usize,
    requires_auth: bool,
}

impl Route {
    pub fn new(
        name: &'static str,
        prefix: impl Into<String>,
        upstream: Url,
        strip_prefix: usize,
        requires_auth: bool,
    ) -> Self {
        Self {
            name,
            prefix: prefix.into(),
            upstream,
            strip_prefix,
            requires_auth,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Drop the first `strip_prefix` path segments.
    ///
    /// `/api/patients/42` with `strip_prefix = 1` becomes `/patients/42`.
    pub fn rewrite_path(&self, path: &str) -> String {
        let relative = path.strip_prefix('/').unwrap_or(path);

        if self.strip_prefix == 0 {
            return format!("/{relative}");
        }

        match relative.splitn(self.strip_prefix + 1, '/').nth(self.strip_prefix) {
            Some(rest) => format!("/{rest}"),
            None => "/".to_string(),
        }
    }

    /// Absolute upstream URL for an inbound path + query.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut target = self.upstream.clone();
        target.set_path(&self.rewrite_path(path));
        target.set_query(query);
        target
    }
}

/// The gateway's route table.
///
/// - `/auth/**`         -> auth service (public: login must work without a token)
/// - `/api/patients/**` -> patient service (behind the authorization filter)
pub fn build_routes(config: &Config) -> Vec<Arc<Route>> {
    vec![
        Arc::new(Route::new(
            "auth-service",
            "/auth",
            config.auth_service_url.clone(),
            1,
            false,
        )),
        Arc::new(Route::new(
            "patient-service",
            "/api/patients",
            config.patient_service_url.clone(),
            1,
            true,
        )),
    ]
}
